//! Navigation interception.
//!
//! Interceptors are registered independently and know nothing about each
//! other. Each one sees the intent in turn and may skip it, handle it, refuse
//! it or rewrite it into a different intent. Whatever survives the chain is
//! applied to the wrapped [`Navigator`](crate::navigation::Navigator).

mod chain;
mod error;
mod intent;
mod interceptor;
mod listener;
mod navigator;
mod notifier;
mod result;

pub use chain::{Disposition, InterceptorChain, Resolution, DEFAULT_MAX_REWRITES};
pub use error::InterceptError;
pub use intent::{IntentKind, NavigationIntent};
pub use interceptor::{NavigationContext, NavigationInterceptor};
pub use listener::{
    EventFanout, ListenerPanic, LoggingNavigationEventListener, NavigationEventListener,
};
pub use navigator::{InterceptingNavigator, NavOutcome};
pub use notifier::{FailureNotifier, LoggingFailureNotifier};
pub use result::{InterceptedResult, NavigationFailure};
