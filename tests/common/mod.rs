//! Shared test utilities and recording fakes.

#![allow(dead_code, unused_imports)]

use navkeep::intercept::{
    FailureNotifier, IntentKind, InterceptedResult, NavigationContext, NavigationEventListener,
    NavigationFailure, NavigationInterceptor,
};
use navkeep::navigation::{Navigator, PopResult, StackNavigator, StateOptions};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestScreen {
    Root,
    A,
    B,
    C,
    D,
}

pub type Shared<T> = Arc<Mutex<Vec<T>>>;

pub fn shared<T>() -> Shared<T> {
    Arc::new(Mutex::new(Vec::new()))
}

/// A call that reached the real navigator.
#[derive(Debug, Clone, PartialEq)]
pub enum NavCall {
    GoTo(TestScreen),
    Pop(Option<PopResult>),
    ResetRoot(TestScreen, StateOptions),
}

/// Stack navigator that records every call it receives.
pub struct RecordingNavigator {
    inner: StackNavigator<TestScreen>,
    pub calls: Shared<NavCall>,
    pub root_pops: Shared<Option<PopResult>>,
}

impl RecordingNavigator {
    /// `screens` is top-first.
    pub fn new(screens: &[TestScreen]) -> Self {
        let root_pops = shared();
        let sink = Arc::clone(&root_pops);
        let stack = navkeep::navigation::BackStack::from_screens(screens.iter().copied());
        Self {
            inner: StackNavigator::new(stack, move |result| sink.lock().push(result)),
            calls: shared(),
            root_pops,
        }
    }
}

impl Navigator<TestScreen> for RecordingNavigator {
    fn go_to(&mut self, screen: TestScreen) -> bool {
        self.calls.lock().push(NavCall::GoTo(screen));
        self.inner.go_to(screen)
    }

    fn pop(&mut self, result: Option<PopResult>) -> Option<TestScreen> {
        self.calls.lock().push(NavCall::Pop(result.clone()));
        self.inner.pop(result)
    }

    fn reset_root(&mut self, new_root: TestScreen, options: StateOptions) -> Vec<TestScreen> {
        self.calls.lock().push(NavCall::ResetRoot(new_root, options));
        self.inner.reset_root(new_root, options)
    }

    fn peek(&self) -> Option<TestScreen> {
        self.inner.peek()
    }

    fn peek_back_stack(&self) -> Vec<TestScreen> {
        self.inner.peek_back_stack()
    }
}

/// Interceptor returning a canned result for one intent kind and
/// `Skipped` for the others. Records the intents it was asked about.
pub struct CannedInterceptor {
    kind: IntentKind,
    result: InterceptedResult<TestScreen>,
    only: Option<TestScreen>,
    pub seen: Shared<(IntentKind, Vec<TestScreen>)>,
}

impl CannedInterceptor {
    pub fn new(kind: IntentKind, result: InterceptedResult<TestScreen>) -> Self {
        Self {
            kind,
            result,
            only: None,
            seen: shared(),
        }
    }

    /// Only answer for intents targeting `screen`.
    pub fn for_screen(mut self, screen: TestScreen) -> Self {
        self.only = Some(screen);
        self
    }

    fn answer(
        &mut self,
        kind: IntentKind,
        target: Option<TestScreen>,
        context: &NavigationContext<TestScreen>,
    ) -> InterceptedResult<TestScreen> {
        self.seen
            .lock()
            .push((kind, context.peek_back_stack().to_vec()));
        let matches = self.kind == kind && (self.only.is_none() || self.only == target);
        if matches {
            self.result.clone()
        } else {
            InterceptedResult::Skipped
        }
    }
}

impl NavigationInterceptor<TestScreen> for CannedInterceptor {
    fn go_to(
        &mut self,
        screen: &TestScreen,
        context: &NavigationContext<TestScreen>,
    ) -> InterceptedResult<TestScreen> {
        self.answer(IntentKind::GoTo, Some(*screen), context)
    }

    fn pop(
        &mut self,
        _result: Option<&PopResult>,
        context: &NavigationContext<TestScreen>,
    ) -> InterceptedResult<TestScreen> {
        self.answer(IntentKind::Pop, context.peek().copied(), context)
    }

    fn reset_root(
        &mut self,
        new_root: &TestScreen,
        _options: StateOptions,
        context: &NavigationContext<TestScreen>,
    ) -> InterceptedResult<TestScreen> {
        self.answer(IntentKind::ResetRoot, Some(*new_root), context)
    }
}

/// Event seen by a [`RecordingListener`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent {
    BackStackChanged(Vec<TestScreen>),
    GoTo(TestScreen, Vec<TestScreen>),
    Pop(Option<PopResult>, Vec<TestScreen>),
    ResetRoot(TestScreen, StateOptions, Vec<TestScreen>),
}

pub struct RecordingListener {
    pub events: Shared<ListenerEvent>,
}

impl RecordingListener {
    pub fn new() -> (Self, Shared<ListenerEvent>) {
        let events = shared();
        (
            Self {
                events: Arc::clone(&events),
            },
            events,
        )
    }
}

impl NavigationEventListener<TestScreen> for RecordingListener {
    fn on_back_stack_changed(&mut self, back_stack: &[TestScreen]) {
        self.events
            .lock()
            .push(ListenerEvent::BackStackChanged(back_stack.to_vec()));
    }

    fn go_to(&mut self, screen: &TestScreen, context: &NavigationContext<TestScreen>) {
        self.events.lock().push(ListenerEvent::GoTo(
            *screen,
            context.peek_back_stack().to_vec(),
        ));
    }

    fn pop(&mut self, result: Option<&PopResult>, context: &NavigationContext<TestScreen>) {
        self.events.lock().push(ListenerEvent::Pop(
            result.cloned(),
            context.peek_back_stack().to_vec(),
        ));
    }

    fn reset_root(
        &mut self,
        new_root: &TestScreen,
        options: StateOptions,
        context: &NavigationContext<TestScreen>,
    ) {
        self.events.lock().push(ListenerEvent::ResetRoot(
            *new_root,
            options,
            context.peek_back_stack().to_vec(),
        ));
    }
}

pub struct RecordingNotifier {
    pub failures: Shared<(IntentKind, NavigationFailure)>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, Shared<(IntentKind, NavigationFailure)>) {
        let failures = shared();
        (
            Self {
                failures: Arc::clone(&failures),
            },
            failures,
        )
    }
}

impl FailureNotifier for RecordingNotifier {
    fn go_to_failure(&mut self, failure: &NavigationFailure) {
        self.failures.lock().push((IntentKind::GoTo, failure.clone()));
    }

    fn pop_failure(&mut self, failure: &NavigationFailure) {
        self.failures.lock().push((IntentKind::Pop, failure.clone()));
    }

    fn reset_root_failure(&mut self, failure: &NavigationFailure) {
        self.failures
            .lock()
            .push((IntentKind::ResetRoot, failure.clone()));
    }
}
