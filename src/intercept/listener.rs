//! Navigation event listeners and panic-isolated fan-out.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use super::interceptor::NavigationContext;
use crate::navigation::{PopResult, Screen, StateOptions};

/// Observer of resolved navigation. All callbacks default to no-ops.
pub trait NavigationEventListener<S: Screen>: Send {
    /// The observable back stack changed. `back_stack` is top-first.
    fn on_back_stack_changed(&mut self, _back_stack: &[S]) {}

    /// Fired after the navigation was applied.
    fn go_to(&mut self, _screen: &S, _context: &NavigationContext<S>) {}

    /// `context` is the back stack before the pop.
    fn pop(&mut self, _result: Option<&PopResult>, _context: &NavigationContext<S>) {}

    /// Fired after the navigation was applied.
    fn reset_root(&mut self, _new_root: &S, _options: StateOptions, _context: &NavigationContext<S>) {}
}

/// A listener callback that panicked during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerPanic {
    /// Position of the listener in registration order.
    pub listener: usize,
    pub event: &'static str,
    pub message: String,
}

/// Listeners in registration order.
pub struct EventFanout<S: Screen> {
    listeners: Vec<Box<dyn NavigationEventListener<S>>>,
}

impl<S: Screen> Default for EventFanout<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Screen> EventFanout<S> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn push(&mut self, listener: impl NavigationEventListener<S> + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn back_stack_changed(&mut self, back_stack: &[S]) -> Vec<ListenerPanic> {
        self.dispatch("on_back_stack_changed", |l| l.on_back_stack_changed(back_stack))
    }

    pub fn go_to(&mut self, screen: &S, context: &NavigationContext<S>) -> Vec<ListenerPanic> {
        self.dispatch("go_to", |l| l.go_to(screen, context))
    }

    pub fn pop(
        &mut self,
        result: Option<&PopResult>,
        context: &NavigationContext<S>,
    ) -> Vec<ListenerPanic> {
        self.dispatch("pop", |l| l.pop(result, context))
    }

    pub fn reset_root(
        &mut self,
        new_root: &S,
        options: StateOptions,
        context: &NavigationContext<S>,
    ) -> Vec<ListenerPanic> {
        self.dispatch("reset_root", |l| l.reset_root(new_root, options, context))
    }

    /// Call `f` on every listener. A panicking listener is logged and
    /// reported; the rest still run.
    fn dispatch(
        &mut self,
        event: &'static str,
        mut f: impl FnMut(&mut dyn NavigationEventListener<S>),
    ) -> Vec<ListenerPanic> {
        let mut panics = Vec::new();
        for (index, listener) in self.listeners.iter_mut().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| f(listener.as_mut())));
            if let Err(payload) = outcome {
                let message = panic_message(payload.as_ref());
                tracing::error!(listener = index, event, panic = %message, "Navigation listener panicked");
                panics.push(ListenerPanic {
                    listener: index,
                    event,
                    message,
                });
            }
        }
        panics
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Logs every navigation event at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigationEventListener;

impl<S: Screen> NavigationEventListener<S> for LoggingNavigationEventListener {
    fn on_back_stack_changed(&mut self, back_stack: &[S]) {
        tracing::info!(back_stack = ?back_stack, "Back stack changed");
    }

    fn go_to(&mut self, screen: &S, context: &NavigationContext<S>) {
        tracing::info!(screen = ?screen, depth = context.peek_back_stack().len(), "Navigated to screen");
    }

    fn pop(&mut self, result: Option<&PopResult>, context: &NavigationContext<S>) {
        tracing::info!(
            top = ?context.peek(),
            has_result = result.is_some(),
            "Popped screen"
        );
    }

    fn reset_root(&mut self, new_root: &S, options: StateOptions, _context: &NavigationContext<S>) {
        tracing::info!(
            new_root = ?new_root,
            save = options.save,
            restore = options.restore,
            "Reset root"
        );
    }
}

impl<S: Screen> std::fmt::Debug for EventFanout<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFanout")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
