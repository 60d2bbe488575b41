use super::intent::NavigationIntent;

/// What an interceptor decided about an intent.
#[derive(Debug, Clone, PartialEq)]
pub enum InterceptedResult<S> {
    /// Defer to the next interceptor, or the navigator.
    Skipped,
    /// The interceptor performed the navigation effect itself.
    ///
    /// `consumed` stops the chain; otherwise later interceptors and the
    /// navigator still run.
    Success { consumed: bool },
    /// Navigation should not proceed.
    ///
    /// `consumed` blocks the intent; otherwise the chain continues and a
    /// later success overrides the failure.
    Failure {
        consumed: bool,
        reason: Option<String>,
    },
    /// Replace the intent and restart from the first interceptor.
    Rewrite(NavigationIntent<S>),
}

impl<S> InterceptedResult<S> {
    pub fn consumed_success() -> Self {
        Self::Success { consumed: true }
    }

    pub fn soft_success() -> Self {
        Self::Success { consumed: false }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::Failure {
            consumed: true,
            reason: Some(reason.into()),
        }
    }

    pub fn soft_failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            consumed: false,
            reason: Some(reason.into()),
        }
    }

    pub fn rewrite(intent: NavigationIntent<S>) -> Self {
        Self::Rewrite(intent)
    }
}

/// A failure reported by an interceptor, as handed to the failure notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationFailure {
    /// Position of the reporting interceptor in the chain.
    pub interceptor: usize,
    pub consumed: bool,
    pub reason: Option<String>,
}
