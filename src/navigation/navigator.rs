//! The [`Navigator`] contract and its back-stack implementation.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use super::back_stack::BackStack;
use super::results::ResultHandler;
use super::screen::{PopResult, Screen, StateOptions};
use crate::retained::CanRetainChecker;

/// Navigation entry point handed to presenters and interceptors' owners.
pub trait Navigator<S: Screen> {
    /// Navigate to `screen`. Returns true if the back stack changed.
    fn go_to(&mut self, screen: S) -> bool;

    /// Pop the top screen, handing `result` to whoever is waiting on it.
    ///
    /// Returns the popped screen, or `None` if nothing was popped.
    fn pop(&mut self, result: Option<PopResult>) -> Option<S>;

    /// Replace the whole back stack with `new_root`.
    fn reset_root(&mut self, new_root: S, options: StateOptions) -> Vec<S>;

    /// The active screen.
    fn peek(&self) -> Option<S>;

    /// The back stack screens, top-first.
    fn peek_back_stack(&self) -> Vec<S>;

    /// Pop until `predicate` matches the top screen or a pop fails.
    ///
    /// Returns the popped screens, top-first. A pop at the root is routed
    /// like any other root pop and ends the loop.
    fn pop_until(&mut self, mut predicate: impl FnMut(&S) -> bool) -> Vec<S>
    where
        Self: Sized,
    {
        let mut popped = Vec::new();
        while let Some(top) = self.peek() {
            if predicate(&top) {
                break;
            }
            match self.pop(None) {
                Some(screen) => popped.push(screen),
                None => break,
            }
        }
        popped
    }

    /// Pop as if the current screen were the root.
    ///
    /// The active screen first becomes the only screen, so it stays visible
    /// while the root pop is handled.
    fn pop_root(&mut self, result: Option<PopResult>) -> Option<S> {
        let back_stack = self.peek_back_stack();
        if back_stack.len() > 1 {
            self.reset_root(back_stack[0].clone(), StateOptions::DEFAULT);
        }
        self.pop(result)
    }
}

/// Back stack shared between a navigator and the checkers that observe it.
pub type SharedBackStack<S> = Arc<Mutex<BackStack<S>>>;

type RootPopHandler = Box<dyn FnMut(Option<PopResult>) + Send>;

/// [`Navigator`] backed by a [`BackStack`].
///
/// Popping at the root never empties the stack; the pop is routed to the
/// root-pop handler instead (typically "close the window" or "finish the app").
pub struct StackNavigator<S: Screen> {
    back_stack: SharedBackStack<S>,
    results: ResultHandler,
    on_root_pop: RootPopHandler,
}

impl<S: Screen> StackNavigator<S> {
    /// # Panics
    /// Panics if `back_stack` is empty.
    pub fn new(
        back_stack: BackStack<S>,
        on_root_pop: impl FnMut(Option<PopResult>) + Send + 'static,
    ) -> Self {
        assert!(!back_stack.is_empty(), "back stack size must not be empty");
        Self {
            back_stack: Arc::new(Mutex::new(back_stack)),
            results: ResultHandler::new(),
            on_root_pop: Box::new(on_root_pop),
        }
    }

    /// Convenience constructor for a single root screen.
    pub fn with_root(
        root: S,
        on_root_pop: impl FnMut(Option<PopResult>) + Send + 'static,
    ) -> Self {
        Self::new(BackStack::new(root), on_root_pop)
    }

    /// Handle to the underlying back stack.
    pub fn back_stack(&self) -> SharedBackStack<S> {
        Arc::clone(&self.back_stack)
    }

    /// Key of the active record.
    pub fn top_record_key(&self) -> Option<String> {
        self.back_stack
            .lock()
            .top()
            .map(|record| record.key().to_string())
    }

    /// Navigate to `screen` and arm a result waiter for `requester_key`.
    pub fn go_to_for_result(&mut self, screen: S, requester_key: &str) -> bool {
        let mut stack = self.back_stack.lock();
        if !stack.push(screen) {
            return false;
        }
        if let Some(record) = stack.top() {
            self.results.prepare_for_result(record.key(), requester_key);
        }
        true
    }

    /// Wait for the result armed by [`go_to_for_result`](Self::go_to_for_result).
    pub fn await_result(
        &mut self,
        requester_key: &str,
    ) -> impl Future<Output = Option<PopResult>> + Send + 'static {
        self.results.await_result(requester_key)
    }

    /// A checker that allows retaining state for `record_key` while that
    /// record is live or saved in the back stack.
    pub fn retain_checker(&self, record_key: impl Into<String>) -> impl CanRetainChecker {
        let back_stack = Arc::downgrade(&self.back_stack);
        let record_key = record_key.into();
        move || {
            back_stack
                .upgrade()
                .is_some_and(|stack| stack.lock().contains_record(&record_key, true))
        }
    }
}

impl<S: Screen> Navigator<S> for StackNavigator<S> {
    fn go_to(&mut self, screen: S) -> bool {
        self.back_stack.lock().push(screen)
    }

    fn pop(&mut self, result: Option<PopResult>) -> Option<S> {
        let mut stack = self.back_stack.lock();
        assert!(!stack.is_empty(), "cannot pop an empty back stack");
        if stack.is_at_root() {
            drop(stack);
            tracing::debug!("Pop at root, routing to root-pop handler");
            (self.on_root_pop)(result);
            return None;
        }
        let record = stack.pop()?;
        drop(stack);
        self.results.deliver(record.key(), result);
        Some(record.into_screen())
    }

    fn reset_root(&mut self, new_root: S, options: StateOptions) -> Vec<S> {
        let mut stack = self.back_stack.lock();
        assert!(!stack.is_empty(), "cannot reset an empty back stack");
        if options.save {
            stack.save_state();
        }
        let removed = stack.drain();
        let restored = options.restore && stack.restore_state(&new_root);
        if !restored {
            stack.push(new_root.clone());
        }
        if options.clear {
            stack.remove_state(&new_root);
        }
        // Waiters of records kept in a saved stack stay armed until that stack is dropped.
        self.results
            .retain_records(|record_key| stack.contains_record(record_key, true));
        tracing::debug!(
            new_root = ?new_root,
            removed = removed.len(),
            restored,
            "Reset back stack root"
        );
        if restored {
            stack.screens()
        } else {
            removed.into_iter().map(|record| record.into_screen()).collect()
        }
    }

    fn peek(&self) -> Option<S> {
        self.back_stack
            .lock()
            .top()
            .map(|record| record.screen().clone())
    }

    fn peek_back_stack(&self) -> Vec<S> {
        self.back_stack.lock().screens()
    }
}
