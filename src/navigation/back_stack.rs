//! Ordered stack of navigation records with saved-stack storage.
//!
//! The top of the stack is the active record. Besides the live stack, a
//! `BackStack` keeps stacks that were saved during a root reset, keyed by the
//! root screen they were saved under, so that switching back to that root
//! can bring the whole stack back.

use super::record::Record;
use super::screen::Screen;

#[derive(Debug, Clone)]
pub struct BackStack<S: Screen> {
    /// Live records, bottom (root) first. The public API is top-first.
    entries: Vec<Record<S>>,
    /// Saved stacks in insertion order, each stored top-first.
    saved: Vec<(S, Vec<Record<S>>)>,
}

impl<S: Screen> BackStack<S> {
    /// Create a stack holding a single root screen.
    pub fn new(root: S) -> Self {
        Self::from_records(vec![Record::new(root)])
    }

    /// Create a stack from screens listed top-first.
    ///
    /// # Panics
    /// Panics if `screens` is empty.
    pub fn from_screens(screens: impl IntoIterator<Item = S>) -> Self {
        let records: Vec<Record<S>> = screens.into_iter().map(Record::new).collect();
        Self::from_records(records)
    }

    /// Create a stack from records listed top-first.
    ///
    /// # Panics
    /// Panics if `records` is empty or contains duplicate keys.
    pub fn from_records(records: Vec<Record<S>>) -> Self {
        assert!(!records.is_empty(), "back stack must not be created empty");
        let mut stack = Self {
            entries: Vec::with_capacity(records.len()),
            saved: Vec::new(),
        };
        for record in records.into_iter().rev() {
            stack.insert_top(record);
        }
        stack
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when only the root record is left.
    pub fn is_at_root(&self) -> bool {
        self.entries.len() == 1
    }

    pub fn top(&self) -> Option<&Record<S>> {
        self.entries.last()
    }

    pub fn root(&self) -> Option<&Record<S>> {
        self.entries.first()
    }

    /// Records, top-first.
    pub fn iter(&self) -> impl Iterator<Item = &Record<S>> {
        self.entries.iter().rev()
    }

    /// Screens, top-first.
    pub fn screens(&self) -> Vec<S> {
        self.iter().map(|record| record.screen().clone()).collect()
    }

    /// Push `screen` as a new record.
    ///
    /// Returns false without mutating when `screen` is already on top.
    pub fn push(&mut self, screen: S) -> bool {
        if self.top().is_some_and(|top| top.screen() == &screen) {
            tracing::debug!(screen = ?screen, "Screen already on top, push ignored");
            return false;
        }
        self.insert_top(Record::new(screen));
        true
    }

    /// Push an existing record.
    ///
    /// # Panics
    /// Panics if a record with the same key is already on the stack.
    pub fn push_record(&mut self, record: Record<S>) -> bool {
        if self.top().is_some_and(|top| top.screen() == record.screen()) {
            return false;
        }
        self.insert_top(record);
        true
    }

    /// Remove and return the top record, root included.
    pub fn pop(&mut self) -> Option<Record<S>> {
        self.entries.pop()
    }

    /// Remove every live record, returning them top-first.
    pub fn drain(&mut self) -> Vec<Record<S>> {
        let mut drained: Vec<Record<S>> = self.entries.drain(..).collect();
        drained.reverse();
        drained
    }

    /// Save the live stack keyed by its root screen, replacing an older save.
    ///
    /// # Panics
    /// Panics if the stack is empty.
    pub fn save_state(&mut self) {
        let root = self
            .root()
            .map(|record| record.screen().clone())
            .expect("cannot save the state of an empty back stack");
        let records: Vec<Record<S>> = self.iter().cloned().collect();
        tracing::debug!(root = ?root, size = records.len(), "Saved back stack");
        self.saved.retain(|(screen, _)| screen != &root);
        self.saved.push((root, records));
    }

    /// Move a stack saved for `root` back onto the live stack, below any
    /// live records. Returns false if nothing was saved for `root`.
    pub fn restore_state(&mut self, root: &S) -> bool {
        let Some(index) = self.saved.iter().position(|(screen, _)| screen == root) else {
            return false;
        };
        let (_, records) = self.saved.remove(index);
        if records.is_empty() {
            return false;
        }
        for record in &records {
            self.assert_unique_key(record);
        }
        let mut restored: Vec<Record<S>> = records.into_iter().rev().collect();
        restored.append(&mut self.entries);
        self.entries = restored;
        tracing::debug!(root = ?root, size = self.entries.len(), "Restored back stack");
        true
    }

    /// Root screens that currently have a saved stack.
    pub fn peek_state(&self) -> Vec<S> {
        self.saved.iter().map(|(screen, _)| screen.clone()).collect()
    }

    /// Drop the stack saved for `root`.
    pub fn remove_state(&mut self, root: &S) -> bool {
        let before = self.saved.len();
        self.saved.retain(|(screen, _)| screen != root);
        self.saved.len() != before
    }

    /// Whether a record with `key` is live, or saved when `include_saved`.
    pub fn contains_record(&self, key: &str, include_saved: bool) -> bool {
        if self.entries.iter().any(|record| record.key() == key) {
            return true;
        }
        include_saved
            && self
                .saved
                .iter()
                .any(|(_, records)| records.iter().any(|record| record.key() == key))
    }

    /// Whether a record with `key` is within the top `depth` live records, or
    /// at position `i` of the `i`-th saved stack for `i < depth` when `include_saved`.
    pub fn is_record_reachable(&self, key: &str, depth: usize, include_saved: bool) -> bool {
        if self.iter().take(depth).any(|record| record.key() == key) {
            return true;
        }
        include_saved
            && self
                .saved
                .iter()
                .take(depth)
                .enumerate()
                .any(|(i, (_, records))| records.get(i).is_some_and(|r| r.key() == key))
    }

    fn insert_top(&mut self, record: Record<S>) {
        self.assert_unique_key(&record);
        self.entries.push(record);
    }

    fn assert_unique_key(&self, record: &Record<S>) {
        assert!(
            !self.entries.iter().any(|existing| existing.key() == record.key()),
            "duplicate record key '{}' in back stack",
            record.key()
        );
    }
}
