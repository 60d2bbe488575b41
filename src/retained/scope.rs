//! Nested retained scopes.
//!
//! Entering a scope creates a child registry seeded from whatever the parent
//! retained for the scope key. Leaving it snapshots the child and, if the
//! scope's checker allows it, stores the snapshot back in the parent so that
//! the next scope entered with the same key picks the whole subtree up again.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::checker::CanRetainChecker;
use super::registry::{Entry, RetainedStateRegistry};
use super::value::RetainedValue;

impl RetainedStateRegistry {
    /// Enter the child scope `key`.
    ///
    /// The returned guard exits the scope when dropped or when
    /// [`RetainedScope::exit`] is called, whichever comes first.
    ///
    /// # Panics
    /// Panics if `key` is blank or a scope with the same key is already
    /// active in this registry.
    pub fn enter_scope(
        &self,
        key: impl Into<String>,
        checker: impl CanRetainChecker + 'static,
    ) -> RetainedScope {
        let key = key.into();
        assert!(!key.trim().is_empty(), "retained scope key is empty or blank");
        assert!(
            !self.is_scope_active(&key),
            "retained scope key '{key}' was used multiple times"
        );

        let seed = self
            .consume_value(&key)
            .and_then(RetainedValue::into_nested)
            .unwrap_or_default();
        let restored = !seed.is_empty();
        let child = RetainedStateRegistry::with_values(seed);

        let source = child.clone();
        let entry = self.register_value(key.clone(), move || {
            RetainedValue::Nested(source.save_all())
        });
        let should_save = Arc::new(AtomicBool::new(true));
        self.attach_child(&key, child.clone(), Arc::clone(&should_save));
        tracing::debug!(scope = %key, restored, "Entered retained scope");

        RetainedScope {
            parent: self.clone(),
            child,
            key,
            checker: Box::new(checker),
            should_save,
            entry: Some(entry),
        }
    }

    /// Run `f` inside the child scope `key`; the scope exits on every path out of `f`.
    pub fn with_scope<T>(
        &self,
        key: impl Into<String>,
        checker: impl CanRetainChecker + 'static,
        f: impl FnOnce(&RetainedStateRegistry) -> T,
    ) -> T {
        let scope = self.enter_scope(key, checker);
        f(&scope)
    }
}

/// Guard for an entered child scope. Derefs to the child registry.
pub struct RetainedScope {
    parent: RetainedStateRegistry,
    child: RetainedStateRegistry,
    key: String,
    checker: Box<dyn CanRetainChecker>,
    should_save: Arc<AtomicBool>,
    /// Present until the scope has exited.
    entry: Option<Entry>,
}

impl RetainedScope {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn registry(&self) -> &RetainedStateRegistry {
        &self.child
    }

    /// Exit the scope now. Returns whether its state was retained.
    pub fn exit(mut self) -> bool {
        self.finish()
    }

    fn finish(&mut self) -> bool {
        let Some(entry) = self.entry.take() else {
            return false;
        };
        self.parent.detach_child(&self.key);
        let snapshot = self.child.save_all();
        let retain = self.should_save.load(Ordering::SeqCst) && self.checker.can_retain();
        if retain {
            tracing::debug!(scope = %self.key, keys = snapshot.len(), "Retaining scope state");
            self.parent
                .put_retained(&self.key, vec![RetainedValue::Nested(snapshot)]);
        } else {
            tracing::debug!(scope = %self.key, "Dropping scope state");
            self.parent.discard_retained(&self.key);
        }
        entry.unregister();
        retain
    }
}

impl Deref for RetainedScope {
    type Target = RetainedStateRegistry;

    fn deref(&self) -> &Self::Target {
        &self.child
    }
}

impl Drop for RetainedScope {
    fn drop(&mut self) {
        self.finish();
    }
}

impl std::fmt::Debug for RetainedScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetainedScope")
            .field("key", &self.key)
            .field("active", &self.entry.is_some())
            .finish()
    }
}
