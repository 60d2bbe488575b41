use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Saved registry contents: key -> values in registration order.
pub type SavedState = HashMap<String, Vec<RetainedValue>>;

/// A value held by a retained registry.
///
/// Leaf values are opaque JSON; a nested scope's whole snapshot is stored
/// as a single value under the scope's key in its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RetainedValue {
    Value(serde_json::Value),
    Nested(SavedState),
}

impl RetainedValue {
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Nested(_) => None,
        }
    }

    pub fn into_nested(self) -> Option<SavedState> {
        match self {
            Self::Nested(state) => Some(state),
            Self::Value(_) => None,
        }
    }
}

impl From<serde_json::Value> for RetainedValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// Captures the current value of something registered in a registry.
pub trait RetainedValueProvider: Send + Sync {
    fn capture(&self) -> RetainedValue;
}

impl<F> RetainedValueProvider for F
where
    F: Fn() -> RetainedValue + Send + Sync,
{
    fn capture(&self) -> RetainedValue {
        self()
    }
}
