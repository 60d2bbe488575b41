//! [`Navigator`] wrapper that routes every call through the interceptor chain.

use super::chain::{Disposition, InterceptorChain, Resolution};
use super::error::InterceptError;
use super::intent::{IntentKind, NavigationIntent};
use super::interceptor::{NavigationContext, NavigationInterceptor};
use super::listener::{
    EventFanout, ListenerPanic, LoggingNavigationEventListener, NavigationEventListener,
};
use super::notifier::{FailureNotifier, LoggingFailureNotifier};
use super::result::NavigationFailure;
use crate::config::NavigationConfig;
use crate::navigation::{Navigator, PopResult, Screen, StateOptions};

/// What happened to one navigation call.
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome<S> {
    /// The navigator applied a `GoTo`; true if the back stack changed.
    WentTo(bool),
    /// The navigator applied a `Pop`.
    Popped(Option<S>),
    /// The navigator applied a `ResetRoot`.
    Reset(Vec<S>),
    /// An interceptor performed the navigation itself.
    Consumed,
    /// An interceptor refused the navigation.
    Blocked(Option<NavigationFailure>),
}

impl<S> NavOutcome<S> {
    pub fn is_success(&self) -> bool {
        match self {
            NavOutcome::WentTo(changed) => *changed,
            NavOutcome::Popped(screen) => screen.is_some(),
            NavOutcome::Reset(_) | NavOutcome::Consumed => true,
            NavOutcome::Blocked(_) => false,
        }
    }
}

/// A navigator whose calls are first offered to a chain of interceptors.
///
/// Intents that get past the chain are applied to the wrapped navigator.
/// Listeners hear about every intent that was applied or consumed as a
/// success, never about blocked ones. At most one interceptor failure is
/// reported per call: the first one that no later interceptor success
/// overrode, whether or not the navigator then applies the intent.
///
/// ```text
/// go_to(S) ──→ InterceptorChain ──→ Delegate ──→ N::go_to ──→ listeners
///                                └─ Consumed ─────────────→ listeners
///                                └─ Blocked  ──→ FailureNotifier
/// ```
pub struct InterceptingNavigator<S: Screen, N: Navigator<S>> {
    delegate: N,
    chain: InterceptorChain<S>,
    listeners: EventFanout<S>,
    notifier: Option<Box<dyn FailureNotifier>>,
    published: Option<Vec<S>>,
    listener_panics: Vec<ListenerPanic>,
}

impl<S: Screen, N: Navigator<S>> InterceptingNavigator<S, N> {
    pub fn new(delegate: N) -> Self {
        Self {
            delegate,
            chain: InterceptorChain::new(),
            listeners: EventFanout::new(),
            notifier: None,
            published: None,
            listener_panics: Vec::new(),
        }
    }

    /// Build from the `[navigation]` config section.
    pub fn from_config(delegate: N, config: &NavigationConfig) -> Self {
        let mut navigator = Self::new(delegate).with_max_rewrites(config.max_rewrites);
        if config.log_events {
            navigator = navigator.with_listener(LoggingNavigationEventListener);
        }
        if config.log_failures {
            navigator = navigator.with_notifier(LoggingFailureNotifier);
        }
        navigator
    }

    pub fn with_interceptor(mut self, interceptor: impl NavigationInterceptor<S> + 'static) -> Self {
        self.chain.push(interceptor);
        self
    }

    pub fn with_listener(mut self, listener: impl NavigationEventListener<S> + 'static) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_notifier(mut self, notifier: impl FailureNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn with_max_rewrites(mut self, max_rewrites: usize) -> Self {
        self.chain.set_max_rewrites(max_rewrites);
        self
    }

    pub fn delegate(&self) -> &N {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut N {
        &mut self.delegate
    }

    pub fn into_inner(self) -> N {
        self.delegate
    }

    /// Panics caught from listeners since the last call.
    pub fn take_listener_panics(&mut self) -> Vec<ListenerPanic> {
        std::mem::take(&mut self.listener_panics)
    }

    /// Send `on_back_stack_changed` if the back stack differs from the last
    /// one published. Call once after setup to publish the initial stack.
    pub fn publish_back_stack(&mut self) -> bool {
        let current = self.delegate.peek_back_stack();
        if self.published.as_ref() == Some(&current) {
            return false;
        }
        let panics = self.listeners.back_stack_changed(&current);
        self.listener_panics.extend(panics);
        self.published = Some(current);
        true
    }

    pub fn try_go_to(&mut self, screen: S) -> Result<bool, InterceptError> {
        Ok(match self.navigate(NavigationIntent::GoTo(screen))? {
            NavOutcome::WentTo(changed) => changed,
            outcome => outcome.is_success(),
        })
    }

    pub fn try_pop(&mut self, result: Option<PopResult>) -> Result<Option<S>, InterceptError> {
        Ok(match self.navigate(NavigationIntent::Pop(result))? {
            NavOutcome::Popped(screen) => screen,
            _ => None,
        })
    }

    pub fn try_reset_root(
        &mut self,
        new_root: S,
        options: StateOptions,
    ) -> Result<Vec<S>, InterceptError> {
        Ok(match self.navigate(NavigationIntent::reset_root(new_root, options))? {
            NavOutcome::Reset(screens) => screens,
            _ => Vec::new(),
        })
    }

    /// Resolve `intent` through the chain and apply the result.
    ///
    /// A rewrite may change the intent's kind; the outcome reflects the
    /// intent that was finally applied.
    pub fn navigate(&mut self, intent: NavigationIntent<S>) -> Result<NavOutcome<S>, InterceptError> {
        let before = self.context();
        let Resolution {
            intent,
            disposition,
            failure,
            ..
        } = self.chain.resolve(intent, &before)?;
        let kind = intent.kind();

        let outcome = match disposition {
            Disposition::Blocked => {
                if let Some(failure) = &failure {
                    self.report(kind, failure);
                }
                return Ok(NavOutcome::Blocked(failure));
            }
            Disposition::Consumed => {
                self.fire(&intent, &before);
                NavOutcome::Consumed
            }
            Disposition::Delegate => self.apply(intent, &before),
        };

        if let Some(failure) = &failure {
            self.report(kind, failure);
        }
        self.publish_back_stack();
        Ok(outcome)
    }

    fn apply(&mut self, intent: NavigationIntent<S>, before: &NavigationContext<S>) -> NavOutcome<S> {
        match intent {
            NavigationIntent::GoTo(screen) => {
                let changed = self.delegate.go_to(screen.clone());
                let after = self.context();
                let panics = self.listeners.go_to(&screen, &after);
                self.listener_panics.extend(panics);
                NavOutcome::WentTo(changed)
            }
            NavigationIntent::Pop(result) => {
                let popped = self.delegate.pop(result.clone());
                let panics = self.listeners.pop(result.as_ref(), before);
                self.listener_panics.extend(panics);
                NavOutcome::Popped(popped)
            }
            NavigationIntent::ResetRoot { new_root, options } => {
                let screens = self.delegate.reset_root(new_root.clone(), options);
                let after = self.context();
                let panics = self.listeners.reset_root(&new_root, options, &after);
                self.listener_panics.extend(panics);
                NavOutcome::Reset(screens)
            }
        }
    }

    fn fire(&mut self, intent: &NavigationIntent<S>, before: &NavigationContext<S>) {
        let panics = match intent {
            NavigationIntent::GoTo(screen) => {
                let after = self.context();
                self.listeners.go_to(screen, &after)
            }
            NavigationIntent::Pop(result) => self.listeners.pop(result.as_ref(), before),
            NavigationIntent::ResetRoot { new_root, options } => {
                let after = self.context();
                self.listeners.reset_root(new_root, *options, &after)
            }
        };
        self.listener_panics.extend(panics);
    }

    fn report(&mut self, kind: IntentKind, failure: &NavigationFailure) {
        let Some(notifier) = self.notifier.as_mut() else {
            tracing::debug!(%kind, interceptor = failure.interceptor, "No failure notifier installed");
            return;
        };
        match kind {
            IntentKind::GoTo => notifier.go_to_failure(failure),
            IntentKind::Pop => notifier.pop_failure(failure),
            IntentKind::ResetRoot => notifier.reset_root_failure(failure),
        }
    }

    fn context(&self) -> NavigationContext<S> {
        NavigationContext::new(self.delegate.peek_back_stack())
    }
}

impl<S: Screen, N: Navigator<S>> Navigator<S> for InterceptingNavigator<S, N> {
    /// # Panics
    /// Panics if the interceptors exceed the rewrite limit.
    fn go_to(&mut self, screen: S) -> bool {
        self.try_go_to(screen).unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    /// Panics if the interceptors exceed the rewrite limit.
    fn pop(&mut self, result: Option<PopResult>) -> Option<S> {
        self.try_pop(result).unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    /// Panics if the interceptors exceed the rewrite limit.
    fn reset_root(&mut self, new_root: S, options: StateOptions) -> Vec<S> {
        self.try_reset_root(new_root, options)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    fn peek(&self) -> Option<S> {
        self.delegate.peek()
    }

    fn peek_back_stack(&self) -> Vec<S> {
        self.delegate.peek_back_stack()
    }
}

impl<S: Screen, N: Navigator<S> + std::fmt::Debug> std::fmt::Debug for InterceptingNavigator<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptingNavigator")
            .field("delegate", &self.delegate)
            .field("chain", &self.chain)
            .field("listeners", &self.listeners)
            .field("has_notifier", &self.notifier.is_some())
            .finish()
    }
}
