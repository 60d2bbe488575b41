//! Screen identity, pop results, and reset options.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Opaque navigation destination.
///
/// Anything cloneable, comparable and hashable can be a screen: an enum of
/// app destinations, a route string, a struct with arguments.
pub trait Screen: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Screen for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Value handed back to the previous screen when a screen is popped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopResult(serde_json::Value);

impl PopResult {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for PopResult {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Options for [`reset_root`](crate::navigation::Navigator::reset_root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateOptions {
    /// Store the current stack keyed by its root screen before clearing it.
    #[serde(default)]
    pub save: bool,
    /// Restore a stack previously saved for the new root, if any.
    #[serde(default)]
    pub restore: bool,
    /// Drop any stack saved for the new root once the reset is done.
    #[serde(default)]
    pub clear: bool,
}

impl StateOptions {
    pub const DEFAULT: StateOptions = StateOptions {
        save: false,
        restore: false,
        clear: false,
    };

    /// Save the outgoing stack and restore the incoming one (tab switching).
    pub const SAVE_AND_RESTORE: StateOptions = StateOptions {
        save: true,
        restore: true,
        clear: false,
    };

    pub fn new(save: bool, restore: bool) -> Self {
        Self {
            save,
            restore,
            clear: false,
        }
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }
}
