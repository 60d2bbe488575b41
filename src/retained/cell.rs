//! Typed retained values.

use std::panic::Location;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::registry::{Entry, RetainedStateRegistry};
use super::value::RetainedValue;

/// A value that survives recreation of the scope it lives in.
///
/// Created by [`remember_retained`]. On creation it consumes the value
/// saved under its key, if any; while alive it is registered as a provider
/// so saving the registry captures its current value. Dropping the cell
/// keeps its last value in the registry's saved pool.
pub struct RetainedCell<T: Serialize> {
    value: Arc<Mutex<T>>,
    key: String,
    restored: bool,
    entry: Option<Entry>,
}

/// Retain a value under an explicit `key`, restoring it if one was saved.
pub fn remember_retained<T, F>(
    registry: &RetainedStateRegistry,
    key: impl Into<String>,
    init: F,
) -> RetainedCell<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
    F: FnOnce() -> T,
{
    let key = key.into();
    let restored = registry.consume_value(&key).and_then(|saved| decode::<T>(&key, saved));
    let was_restored = restored.is_some();
    let value = Arc::new(Mutex::new(restored.unwrap_or_else(init)));

    let source = Arc::clone(&value);
    let provider_key = key.clone();
    let entry = registry.register_value(key.clone(), move || encode(&provider_key, &*source.lock()));

    RetainedCell {
        value,
        key,
        restored: was_restored,
        entry: Some(entry),
    }
}

/// Retain a value keyed by the caller's source location.
#[track_caller]
pub fn remember_retained_here<T, F>(registry: &RetainedStateRegistry, init: F) -> RetainedCell<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
    F: FnOnce() -> T,
{
    let location = Location::caller();
    let key = format!("{}:{}:{}", location.file(), location.line(), location.column());
    remember_retained(registry, key, init)
}

fn encode<T: Serialize>(key: &str, value: &T) -> RetainedValue {
    match serde_json::to_value(value) {
        Ok(json) => RetainedValue::Value(json),
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to capture retained value");
            RetainedValue::Value(serde_json::Value::Null)
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, saved: RetainedValue) -> Option<T> {
    let RetainedValue::Value(json) = saved else {
        tracing::warn!(key, "Saved value is a nested scope, ignoring");
        return None;
    };
    match serde_json::from_value(json) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "Saved value has the wrong shape, ignoring");
            None
        }
    }
}

impl<T: Serialize> RetainedCell<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the value came from saved state rather than `init`.
    pub fn was_restored(&self) -> bool {
        self.restored
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.lock().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.lock() = value;
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.lock())
    }

    /// Unregister without saving; the value will not come back.
    pub fn discard(mut self) {
        if let Some(entry) = self.entry.take() {
            entry.unregister();
        }
    }
}

impl<T: Serialize> Drop for RetainedCell<T> {
    fn drop(&mut self) {
        if let Some(entry) = self.entry.take() {
            let last = encode(&self.key, &*self.value.lock());
            entry.retire(last);
        }
    }
}

impl<T: Serialize + std::fmt::Debug> std::fmt::Debug for RetainedCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetainedCell")
            .field("key", &self.key)
            .field("value", &*self.value.lock())
            .field("restored", &self.restored)
            .finish()
    }
}
