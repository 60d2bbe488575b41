//! Retained state registry node.
//!
//! A registry holds two things per key: the live value providers registered
//! under it (in registration order) and a pool of previously saved values
//! waiting to be consumed. Saving captures providers into the pool; a
//! registry created from a saved pool hands values back out through
//! [`consume_value`](RetainedStateRegistry::consume_value), first-in first-out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::value::{RetainedValue, RetainedValueProvider, SavedState};

/// Shared handle to one node of the retained state tree.
///
/// Cloning the handle shares the node.
#[derive(Clone)]
pub struct RetainedStateRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

#[derive(Default)]
struct RegistryInner {
    retained: SavedState,
    providers: HashMap<String, Vec<ProviderSlot>>,
    children: HashMap<String, ActiveChild>,
    next_id: u64,
}

struct ProviderSlot {
    id: u64,
    provider: Arc<dyn RetainedValueProvider>,
    /// False once the owner is gone and `provider` only replays its last value.
    live: bool,
}

struct Frozen(RetainedValue);

impl RetainedValueProvider for Frozen {
    fn capture(&self) -> RetainedValue {
        self.0.clone()
    }
}

struct ActiveChild {
    registry: RetainedStateRegistry,
    should_save: Arc<AtomicBool>,
}

impl Default for RetainedStateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RetainedStateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("RetainedStateRegistry")
            .field("retained_keys", &inner.retained.keys().collect::<Vec<_>>())
            .field("provider_keys", &inner.providers.keys().collect::<Vec<_>>())
            .field("active_scopes", &inner.children.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RetainedStateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::with_values(SavedState::new())
    }

    /// Create a registry seeded with previously saved values.
    pub fn with_values(values: SavedState) -> Self {
        let retained = values
            .into_iter()
            .filter(|(_, list)| !list.is_empty())
            .collect();
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                retained,
                ..RegistryInner::default()
            })),
        }
    }

    /// Take the next saved value for `key`. Each saved value is returned once.
    pub fn consume_value(&self, key: &str) -> Option<RetainedValue> {
        let mut inner = self.inner.lock();
        let list = inner.retained.get_mut(key)?;
        let value = if list.is_empty() {
            None
        } else {
            Some(list.remove(0))
        };
        if list.is_empty() {
            inner.retained.remove(key);
        }
        value
    }

    /// Register a provider under `key`.
    ///
    /// Several providers may share a key; they are saved in registration
    /// order, so after recreation the Nth consumer of `key` gets the value
    /// of the Nth provider.
    ///
    /// # Panics
    /// Panics if `key` is empty or blank.
    pub fn register_value(
        &self,
        key: impl Into<String>,
        provider: impl RetainedValueProvider + 'static,
    ) -> Entry {
        let key = key.into();
        assert!(!key.trim().is_empty(), "registered key is empty or blank");
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.providers.entry(key.clone()).or_default().push(ProviderSlot {
            id,
            provider: Arc::new(provider),
            live: true,
        });
        Entry {
            registry: Arc::downgrade(&self.inner),
            key,
            id,
        }
    }

    /// Capture every provider registered under `key` into the saved pool.
    pub fn save_value(&self, key: &str) {
        let providers: Vec<Arc<dyn RetainedValueProvider>> = {
            let inner = self.inner.lock();
            match inner.providers.get(key) {
                Some(slots) => slots.iter().map(|slot| Arc::clone(&slot.provider)).collect(),
                None => return,
            }
        };
        let values: Vec<RetainedValue> = providers.iter().map(|p| p.capture()).collect();
        self.put_retained(key, values);
    }

    /// Capture every live provider and return the full saved pool.
    ///
    /// Active child scopes are captured through their providers, so the
    /// result is a snapshot of the whole subtree.
    pub fn save_all(&self) -> SavedState {
        let providers: Vec<(String, Vec<Arc<dyn RetainedValueProvider>>)> = {
            let inner = self.inner.lock();
            inner
                .providers
                .iter()
                .map(|(key, slots)| {
                    let list = slots.iter().map(|slot| Arc::clone(&slot.provider)).collect();
                    (key.clone(), list)
                })
                .collect()
        };
        let captured: Vec<(String, Vec<RetainedValue>)> = providers
            .into_iter()
            .map(|(key, list)| (key, list.iter().map(|p| p.capture()).collect()))
            .collect();

        let mut inner = self.inner.lock();
        for (key, values) in captured {
            if values.is_empty() {
                inner.retained.remove(&key);
            } else {
                inner.retained.insert(key, values);
            }
        }
        inner.retained.clone()
    }

    /// Drop saved values whose key has no live provider, here and in every
    /// active child scope.
    pub fn forget_unclaimed_values(&self) {
        let children: Vec<RetainedStateRegistry> = {
            let mut inner = self.inner.lock();
            let RegistryInner {
                retained,
                providers,
                ..
            } = &mut *inner;
            let before = retained.len();
            retained.retain(|key, _| providers.contains_key(key));
            let forgotten = before - retained.len();
            if forgotten > 0 {
                tracing::debug!(forgotten, remaining = retained.len(), "Forgot unclaimed retained values");
            }
            inner
                .children
                .values()
                .map(|child| child.registry.clone())
                .collect()
        };
        for child in children {
            child.forget_unclaimed_values();
        }
    }

    /// Forget the state kept for `key`.
    ///
    /// If `key` is an active child scope, the scope is marked so that its
    /// exit drops its state instead of retaining it.
    pub fn remove_state(&self, key: &str) {
        let mut inner = self.inner.lock();
        match inner.children.get(key) {
            Some(child) => child.should_save.store(false, Ordering::SeqCst),
            None => {
                inner.retained.remove(key);
            }
        }
    }

    /// Whether a child scope keyed `key` is currently entered.
    pub fn is_scope_active(&self, key: &str) -> bool {
        self.inner.lock().children.contains_key(key)
    }

    /// Copy of the saved pool, without capturing providers.
    pub fn peek_retained(&self) -> SavedState {
        self.inner.lock().retained.clone()
    }

    /// Number of live providers registered under `key`.
    pub fn provider_count(&self, key: &str) -> usize {
        self.inner
            .lock()
            .providers
            .get(key)
            .map_or(0, |slots| slots.iter().filter(|slot| slot.live).count())
    }

    pub(super) fn put_retained(&self, key: &str, values: Vec<RetainedValue>) {
        let mut inner = self.inner.lock();
        if values.is_empty() {
            inner.retained.remove(key);
        } else {
            inner.retained.insert(key.to_string(), values);
        }
    }

    pub(super) fn discard_retained(&self, key: &str) {
        self.inner.lock().retained.remove(key);
    }

    pub(super) fn attach_child(
        &self,
        key: &str,
        registry: RetainedStateRegistry,
        should_save: Arc<AtomicBool>,
    ) {
        let mut inner = self.inner.lock();
        assert!(
            !inner.children.contains_key(key),
            "retained scope key '{key}' was used multiple times"
        );
        inner.children.insert(
            key.to_string(),
            ActiveChild {
                registry,
                should_save,
            },
        );
    }

    pub(super) fn detach_child(&self, key: &str) {
        self.inner.lock().children.remove(key);
    }
}

/// Handle returned by [`RetainedStateRegistry::register_value`].
#[must_use = "dropping an Entry keeps the provider registered; call unregister() to remove it"]
pub struct Entry {
    registry: Weak<Mutex<RegistryInner>>,
    key: String,
    id: u64,
}

impl Entry {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Remove the provider from its registry.
    ///
    /// The saved pool is untouched unless only retired providers of the key
    /// remain, in which case their values are written to it.
    pub fn unregister(self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut inner = registry.lock();
        let remaining = match inner.providers.get_mut(&self.key) {
            Some(slots) => {
                slots.retain(|slot| slot.id != self.id);
                slots.iter().any(|slot| slot.live)
            }
            None => return,
        };
        if !remaining {
            flush_frozen(&mut inner, &self.key);
        }
    }

    /// Unregister, keeping `last` as this provider's saved value.
    ///
    /// While other live providers share the key, the value stays in this
    /// provider's slot so the key keeps its registration order. When the
    /// last live provider retires, every slot of the key is written to the
    /// saved pool in registration order.
    pub(super) fn retire(self, last: RetainedValue) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut inner = registry.lock();
        let Some(slots) = inner.providers.get_mut(&self.key) else {
            return;
        };
        if let Some(slot) = slots.iter_mut().find(|slot| slot.id == self.id) {
            slot.provider = Arc::new(Frozen(last));
            slot.live = false;
        }
        if !slots.iter().any(|slot| slot.live) {
            flush_frozen(&mut inner, &self.key);
        }
    }
}

/// Move the remaining slots of `key`, all frozen, into the saved pool.
fn flush_frozen(inner: &mut RegistryInner, key: &str) {
    let Some(slots) = inner.providers.remove(key) else {
        return;
    };
    if slots.is_empty() {
        return;
    }
    let values = slots.iter().map(|slot| slot.provider.capture()).collect();
    inner.retained.insert(key.to_string(), values);
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}
