use super::result::InterceptedResult;
use crate::navigation::{PopResult, Screen, StateOptions};

/// Read-only view of the back stack handed to interceptors and listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext<S> {
    back_stack: Vec<S>,
}

impl<S: Screen> NavigationContext<S> {
    /// `back_stack` is top-first.
    pub fn new(back_stack: Vec<S>) -> Self {
        Self { back_stack }
    }

    pub fn peek(&self) -> Option<&S> {
        self.back_stack.first()
    }

    pub fn peek_back_stack(&self) -> &[S] {
        &self.back_stack
    }

    pub fn is_at_root(&self) -> bool {
        self.back_stack.len() == 1
    }
}

/// Observes, vetoes or rewrites navigation before it reaches the navigator.
///
/// Every method defaults to [`InterceptedResult::Skipped`], so an
/// interceptor only implements the intents it cares about.
pub trait NavigationInterceptor<S: Screen>: Send {
    fn go_to(&mut self, _screen: &S, _context: &NavigationContext<S>) -> InterceptedResult<S> {
        InterceptedResult::Skipped
    }

    /// `context` is the back stack before the pop.
    fn pop(
        &mut self,
        _result: Option<&PopResult>,
        _context: &NavigationContext<S>,
    ) -> InterceptedResult<S> {
        InterceptedResult::Skipped
    }

    fn reset_root(
        &mut self,
        _new_root: &S,
        _options: StateOptions,
        _context: &NavigationContext<S>,
    ) -> InterceptedResult<S> {
        InterceptedResult::Skipped
    }
}
