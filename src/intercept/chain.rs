//! Interceptor chain resolution.
//!
//! ```text
//! intent ──→ [0] ──→ [1] ──→ ... ──→ [n-1] ──→ Delegate
//!             │       │
//!             │       └─ Rewrite(next) ──→ restart at [0] with `next`
//!             └─ consumed Success / Failure ──→ Consumed / Blocked
//! ```

use super::error::InterceptError;
use super::intent::NavigationIntent;
use super::interceptor::{NavigationContext, NavigationInterceptor};
use super::result::{InterceptedResult, NavigationFailure};
use crate::navigation::Screen;

/// Upper bound on rewrites for a single intent when nothing else is configured.
pub const DEFAULT_MAX_REWRITES: usize = 16;

/// How the chain disposed of an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No interceptor consumed the intent; the navigator should apply it.
    Delegate,
    /// An interceptor performed the navigation itself.
    Consumed,
    /// An interceptor refused the intent.
    Blocked,
}

/// Outcome of [`InterceptorChain::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<S> {
    /// The final intent, after any rewrites.
    pub intent: NavigationIntent<S>,
    pub disposition: Disposition,
    /// First failure reported for the final intent and not overridden by a
    /// later success. Always set when `disposition` is `Blocked`.
    pub failure: Option<NavigationFailure>,
    pub rewrites: usize,
}

/// Ordered interceptors plus the rewrite bound.
pub struct InterceptorChain<S: Screen> {
    interceptors: Vec<Box<dyn NavigationInterceptor<S>>>,
    max_rewrites: usize,
}

impl<S: Screen> Default for InterceptorChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Screen> InterceptorChain<S> {
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
            max_rewrites: DEFAULT_MAX_REWRITES,
        }
    }

    pub fn with_max_rewrites(mut self, max_rewrites: usize) -> Self {
        self.max_rewrites = max_rewrites;
        self
    }

    pub fn set_max_rewrites(&mut self, max_rewrites: usize) {
        self.max_rewrites = max_rewrites;
    }

    pub fn max_rewrites(&self) -> usize {
        self.max_rewrites
    }

    pub fn push(&mut self, interceptor: impl NavigationInterceptor<S> + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run `intent` through every interceptor in order.
    ///
    /// A rewrite restarts the pass from the first interceptor with the new
    /// intent and forgets failures reported for the old one. More than
    /// `max_rewrites` rewrites for one call is a configuration error.
    pub fn resolve(
        &mut self,
        intent: NavigationIntent<S>,
        context: &NavigationContext<S>,
    ) -> Result<Resolution<S>, InterceptError> {
        let mut intent = intent;
        let mut rewrites = 0;

        'pass: loop {
            let mut failure: Option<NavigationFailure> = None;

            for (index, interceptor) in self.interceptors.iter_mut().enumerate() {
                let outcome = match &intent {
                    NavigationIntent::GoTo(screen) => interceptor.go_to(screen, context),
                    NavigationIntent::Pop(result) => interceptor.pop(result.as_ref(), context),
                    NavigationIntent::ResetRoot { new_root, options } => {
                        interceptor.reset_root(new_root, *options, context)
                    }
                };

                match outcome {
                    InterceptedResult::Skipped => {}
                    InterceptedResult::Success { consumed: true } => {
                        tracing::debug!(interceptor = index, kind = %intent.kind(), "Intent consumed");
                        return Ok(Resolution {
                            intent,
                            disposition: Disposition::Consumed,
                            failure: None,
                            rewrites,
                        });
                    }
                    InterceptedResult::Success { consumed: false } => {
                        failure = None;
                    }
                    InterceptedResult::Failure { consumed, reason } => {
                        tracing::debug!(
                            interceptor = index,
                            kind = %intent.kind(),
                            consumed,
                            reason = reason.as_deref().unwrap_or(""),
                            "Interceptor reported failure"
                        );
                        failure.get_or_insert(NavigationFailure {
                            interceptor: index,
                            consumed,
                            reason,
                        });
                        if consumed {
                            return Ok(Resolution {
                                intent,
                                disposition: Disposition::Blocked,
                                failure,
                                rewrites,
                            });
                        }
                    }
                    InterceptedResult::Rewrite(next) => {
                        rewrites += 1;
                        if rewrites > self.max_rewrites {
                            return Err(InterceptError::RewriteLimitExceeded {
                                kind: intent.kind(),
                                limit: self.max_rewrites,
                                last: format!("{next:?}"),
                            });
                        }
                        tracing::debug!(interceptor = index, rewrites, from = ?intent, to = ?next, "Intent rewritten");
                        intent = next;
                        continue 'pass;
                    }
                }
            }

            return Ok(Resolution {
                intent,
                disposition: Disposition::Delegate,
                failure,
                rewrites,
            });
        }
    }
}

impl<S: Screen> std::fmt::Debug for InterceptorChain<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("interceptors", &self.interceptors.len())
            .field("max_rewrites", &self.max_rewrites)
            .finish()
    }
}
