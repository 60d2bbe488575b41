use thiserror::Error;

use super::intent::IntentKind;

/// Errors raised while resolving an intent through the interceptor chain.
#[derive(Debug, Error)]
pub enum InterceptError {
    #[error("Interceptors rewrote a {kind} intent more than {limit} times (last intent: {last})")]
    RewriteLimitExceeded {
        kind: IntentKind,
        limit: usize,
        last: String,
    },
}
