use super::result::NavigationFailure;

/// Receives interceptor failures that survived resolution.
///
/// At most one failure is reported per navigation call.
pub trait FailureNotifier: Send {
    fn go_to_failure(&mut self, failure: &NavigationFailure);
    fn pop_failure(&mut self, failure: &NavigationFailure);
    fn reset_root_failure(&mut self, failure: &NavigationFailure);
}

/// Logs failures at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingFailureNotifier;

impl LoggingFailureNotifier {
    fn log(kind: &str, failure: &NavigationFailure) {
        tracing::warn!(
            kind,
            interceptor = failure.interceptor,
            consumed = failure.consumed,
            reason = failure.reason.as_deref().unwrap_or("unspecified"),
            "Navigation blocked by interceptor"
        );
    }
}

impl FailureNotifier for LoggingFailureNotifier {
    fn go_to_failure(&mut self, failure: &NavigationFailure) {
        Self::log("go_to", failure);
    }

    fn pop_failure(&mut self, failure: &NavigationFailure) {
        Self::log("pop", failure);
    }

    fn reset_root_failure(&mut self, failure: &NavigationFailure) {
        Self::log("reset_root", failure);
    }
}
