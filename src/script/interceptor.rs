use serde::{Deserialize, Serialize};

use crate::intercept::{
    InterceptedResult, NavigationContext, NavigationIntent, NavigationInterceptor,
};
use crate::navigation::{PopResult, StateOptions};

/// Interceptor declared in a script.
///
/// `block`, `soft_fail` and `consume` match `go_to` and `reset_root`
/// targets, and pops of the named screen. `rewrite` redirects `go_to` and
/// `reset_root` targets and keeps the reset options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterceptorSpec {
    Block {
        screen: String,
        #[serde(default)]
        reason: Option<String>,
    },
    SoftFail {
        screen: String,
        #[serde(default)]
        reason: Option<String>,
    },
    Consume {
        screen: String,
    },
    Rewrite {
        from: String,
        to: String,
    },
}

impl InterceptorSpec {
    pub(super) fn screens(&self) -> Vec<&str> {
        match self {
            InterceptorSpec::Block { screen, .. }
            | InterceptorSpec::SoftFail { screen, .. }
            | InterceptorSpec::Consume { screen } => vec![screen.as_str()],
            InterceptorSpec::Rewrite { from, to } => vec![from.as_str(), to.as_str()],
        }
    }

    /// Verdict for an intent targeting `target`, ignoring rewrites.
    fn verdict(&self, target: &str) -> InterceptedResult<String> {
        match self {
            InterceptorSpec::Block { screen, reason } if screen == target => {
                InterceptedResult::Failure {
                    consumed: true,
                    reason: reason.clone(),
                }
            }
            InterceptorSpec::SoftFail { screen, reason } if screen == target => {
                InterceptedResult::Failure {
                    consumed: false,
                    reason: reason.clone(),
                }
            }
            InterceptorSpec::Consume { screen } if screen == target => {
                InterceptedResult::consumed_success()
            }
            _ => InterceptedResult::Skipped,
        }
    }
}

impl NavigationInterceptor<String> for InterceptorSpec {
    fn go_to(&mut self, screen: &String, _context: &NavigationContext<String>) -> InterceptedResult<String> {
        match &*self {
            InterceptorSpec::Rewrite { from, to } if from == screen => {
                InterceptedResult::rewrite(NavigationIntent::GoTo(to.clone()))
            }
            _ => self.verdict(screen),
        }
    }

    fn pop(
        &mut self,
        _result: Option<&PopResult>,
        context: &NavigationContext<String>,
    ) -> InterceptedResult<String> {
        match (&*self, context.peek()) {
            (InterceptorSpec::Rewrite { .. }, _) | (_, None) => InterceptedResult::Skipped,
            (spec, Some(top)) => spec.verdict(top),
        }
    }

    fn reset_root(
        &mut self,
        new_root: &String,
        options: StateOptions,
        _context: &NavigationContext<String>,
    ) -> InterceptedResult<String> {
        match &*self {
            InterceptorSpec::Rewrite { from, to } if from == new_root => {
                InterceptedResult::rewrite(NavigationIntent::reset_root(to.clone(), options))
            }
            _ => self.verdict(new_root),
        }
    }
}
