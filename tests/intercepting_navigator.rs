mod common;

use common::{
    CannedInterceptor, ListenerEvent, NavCall, RecordingListener, RecordingNavigator,
    RecordingNotifier, TestScreen::{self, Root, A, B, C, D},
};
use navkeep::config::NavigationConfig;
use navkeep::intercept::{
    InterceptError, InterceptedResult, InterceptingNavigator, IntentKind, NavOutcome,
    NavigationContext, NavigationEventListener, NavigationIntent,
};
use navkeep::navigation::{Navigator, PopResult, StateOptions};
use serde_json::json;

type Nav = InterceptingNavigator<TestScreen, RecordingNavigator>;

fn wrap(screens: &[TestScreen]) -> (Nav, common::Shared<NavCall>) {
    let delegate = RecordingNavigator::new(screens);
    let calls = std::sync::Arc::clone(&delegate.calls);
    (InterceptingNavigator::new(delegate), calls)
}

#[test]
fn test_no_interceptors_mirrors_delegate() {
    let (mut nav, _calls) = wrap(&[Root]);

    nav.go_to(A);
    nav.go_to(B);
    nav.pop(None);
    nav.go_to(C);
    nav.go_to(B);
    nav.pop(None);
    nav.reset_root(D, StateOptions::new(true, false));
    nav.go_to(A);

    assert_eq!(nav.peek_back_stack(), nav.delegate().peek_back_stack());
    assert_eq!(nav.peek_back_stack(), vec![A, D]);
    assert_eq!(nav.peek(), Some(A));
}

#[test]
fn test_pop_at_root_goes_to_root_handler() {
    let (nav, _calls) = wrap(&[Root]);
    let (notifier, failures) = RecordingNotifier::new();
    let mut nav = nav.with_notifier(notifier);

    assert_eq!(nav.pop(Some(PopResult::new(json!("bye")))), None);
    assert_eq!(nav.peek_back_stack(), vec![Root]);
    assert_eq!(
        *nav.delegate().root_pops.lock(),
        vec![Some(PopResult::new(json!("bye")))]
    );
    // A navigator-only failure is not an interceptor failure.
    assert!(failures.lock().is_empty());
}

#[test]
fn test_consumed_failure_blocks_navigator() {
    let (nav, calls) = wrap(&[Root]);
    let (notifier, failures) = RecordingNotifier::new();
    let (listener, events) = RecordingListener::new();
    let mut nav = nav
        .with_interceptor(CannedInterceptor::new(
            IntentKind::GoTo,
            InterceptedResult::blocked("signed out"),
        ))
        .with_listener(listener)
        .with_notifier(notifier);

    assert!(!nav.go_to(A));

    assert!(calls.lock().is_empty());
    assert!(events.lock().is_empty());
    assert_eq!(nav.peek_back_stack(), vec![Root]);
    let failures = failures.lock();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, IntentKind::GoTo);
    assert_eq!(failures[0].1.reason.as_deref(), Some("signed out"));
    assert!(failures[0].1.consumed);
}

#[test]
fn test_soft_failure_then_skip_reaches_navigator() {
    let (nav, calls) = wrap(&[Root]);
    let (notifier, failures) = RecordingNotifier::new();
    let skipping = CannedInterceptor::new(IntentKind::GoTo, InterceptedResult::Skipped);
    let mut nav = nav
        .with_interceptor(CannedInterceptor::new(
            IntentKind::GoTo,
            InterceptedResult::soft_failure("not yet"),
        ))
        .with_interceptor(skipping)
        .with_notifier(notifier);

    assert!(nav.go_to(A));

    assert_eq!(*calls.lock(), vec![NavCall::GoTo(A)]);
    // Applied, but the soft failure is still reported.
    let failures = failures.lock();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, IntentKind::GoTo);
    assert_eq!(failures[0].1.reason.as_deref(), Some("not yet"));
    assert!(!failures[0].1.consumed);
}

#[test]
fn test_unconsumed_pop_failure_is_reported() {
    let (nav, calls) = wrap(&[A, Root]);
    let (notifier, failures) = RecordingNotifier::new();
    let mut nav = nav
        .with_interceptor(CannedInterceptor::new(
            IntentKind::Pop,
            InterceptedResult::soft_failure("unsaved draft"),
        ))
        .with_notifier(notifier);

    assert_eq!(nav.pop(None), Some(A));

    assert_eq!(*calls.lock(), vec![NavCall::Pop(None)]);
    let failures = failures.lock();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, IntentKind::Pop);
    assert_eq!(failures[0].1.reason.as_deref(), Some("unsaved draft"));
}

#[test]
fn test_unconsumed_reset_root_failure_is_reported() {
    let (nav, calls) = wrap(&[Root]);
    let (notifier, failures) = RecordingNotifier::new();
    let mut nav = nav
        .with_interceptor(CannedInterceptor::new(
            IntentKind::ResetRoot,
            InterceptedResult::soft_failure("x"),
        ))
        .with_notifier(notifier);

    assert_eq!(nav.reset_root(A, StateOptions::DEFAULT), vec![Root]);

    assert_eq!(
        *calls.lock(),
        vec![NavCall::ResetRoot(A, StateOptions::DEFAULT)]
    );
    assert_eq!(nav.peek_back_stack(), vec![A]);
    let failures = failures.lock();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, IntentKind::ResetRoot);
    assert!(!failures[0].1.consumed);
}

#[test]
fn test_rewrite_replaces_intent() {
    let (nav, calls) = wrap(&[Root]);
    let rewrite = CannedInterceptor::new(
        IntentKind::GoTo,
        InterceptedResult::rewrite(NavigationIntent::GoTo(B)),
    )
    .for_screen(A);
    let mut nav = nav.with_interceptor(rewrite);

    assert!(nav.go_to(A));

    assert_eq!(*calls.lock(), vec![NavCall::GoTo(B)]);
    assert_eq!(nav.peek_back_stack(), vec![B, Root]);
}

#[test]
fn test_rewrite_can_change_intent_kind() {
    let (nav, calls) = wrap(&[A, Root]);
    let rewrite = CannedInterceptor::new(
        IntentKind::GoTo,
        InterceptedResult::rewrite(NavigationIntent::reset_root(D, StateOptions::DEFAULT)),
    )
    .for_screen(D);
    let mut nav = nav.with_interceptor(rewrite);

    assert!(nav.go_to(D));

    assert_eq!(
        *calls.lock(),
        vec![NavCall::ResetRoot(D, StateOptions::DEFAULT)]
    );
    assert_eq!(nav.peek_back_stack(), vec![D]);
}

#[test]
fn test_rewrite_cycle_is_reported() {
    let (nav, calls) = wrap(&[Root]);
    let mut nav = nav
        .with_max_rewrites(4)
        .with_interceptor(
            CannedInterceptor::new(
                IntentKind::GoTo,
                InterceptedResult::rewrite(NavigationIntent::GoTo(B)),
            )
            .for_screen(A),
        )
        .with_interceptor(
            CannedInterceptor::new(
                IntentKind::GoTo,
                InterceptedResult::rewrite(NavigationIntent::GoTo(A)),
            )
            .for_screen(B),
        );

    let err = nav.try_go_to(A).unwrap_err();
    match err {
        InterceptError::RewriteLimitExceeded { kind, limit, .. } => {
            assert_eq!(kind, IntentKind::GoTo);
            assert_eq!(limit, 4);
        }
    }
    assert!(calls.lock().is_empty());
}

#[test]
#[should_panic(expected = "more than 1 times")]
fn test_rewrite_cycle_panics_through_navigator_trait() {
    let (nav, _calls) = wrap(&[Root]);
    let mut nav = nav
        .with_max_rewrites(1)
        .with_interceptor(CannedInterceptor::new(
            IntentKind::GoTo,
            InterceptedResult::rewrite(NavigationIntent::GoTo(A)),
        ));
    nav.go_to(A);
}

#[test]
fn test_consumed_success_fires_listeners_without_navigator() {
    let (nav, calls) = wrap(&[Root]);
    let (listener, events) = RecordingListener::new();
    let mut nav = nav
        .with_interceptor(CannedInterceptor::new(
            IntentKind::GoTo,
            InterceptedResult::consumed_success(),
        ))
        .with_listener(listener);

    assert!(nav.go_to(A));

    assert!(calls.lock().is_empty());
    assert_eq!(
        *events.lock(),
        vec![
            ListenerEvent::GoTo(A, vec![Root]),
            ListenerEvent::BackStackChanged(vec![Root]),
        ]
    );
}

#[test]
fn test_pop_sees_stack_before_mutation() {
    let (nav, _calls) = wrap(&[A, Root]);
    let observer = CannedInterceptor::new(IntentKind::Pop, InterceptedResult::Skipped);
    let seen = std::sync::Arc::clone(&observer.seen);
    let (listener, events) = RecordingListener::new();
    let mut nav = nav.with_interceptor(observer).with_listener(listener);
    nav.publish_back_stack();

    assert_eq!(nav.pop(Some(PopResult::new(json!(1)))), Some(A));
    nav.go_to(B);

    assert_eq!(seen.lock()[0], (IntentKind::Pop, vec![A, Root]));
    assert_eq!(
        *events.lock(),
        vec![
            ListenerEvent::BackStackChanged(vec![A, Root]),
            ListenerEvent::Pop(Some(PopResult::new(json!(1))), vec![A, Root]),
            ListenerEvent::BackStackChanged(vec![Root]),
            ListenerEvent::GoTo(B, vec![B, Root]),
            ListenerEvent::BackStackChanged(vec![B, Root]),
        ]
    );
}

#[test]
fn test_back_stack_change_published_only_on_change() {
    let (nav, _calls) = wrap(&[Root]);
    let (listener, events) = RecordingListener::new();
    let mut nav = nav.with_listener(listener);

    assert!(nav.publish_back_stack());
    assert!(!nav.publish_back_stack());
    nav.go_to(A);
    // Refused: A is already on top.
    nav.go_to(A);

    let changes: Vec<_> = events
        .lock()
        .iter()
        .filter_map(|event| match event {
            ListenerEvent::BackStackChanged(stack) => Some(stack.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![vec![Root], vec![A, Root]]);
}

#[test]
fn test_first_unconsumed_failure_wins() {
    let (nav, _calls) = wrap(&[Root]);
    let (notifier, failures) = RecordingNotifier::new();
    let mut nav = nav
        .with_interceptor(CannedInterceptor::new(
            IntentKind::Pop,
            InterceptedResult::soft_failure("first"),
        ))
        .with_interceptor(CannedInterceptor::new(
            IntentKind::Pop,
            InterceptedResult::soft_failure("second"),
        ))
        .with_notifier(notifier);

    // Both interceptors let the pop through; only the first failure is reported.
    assert_eq!(nav.pop(None), None);

    let failures = failures.lock();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, IntentKind::Pop);
    assert_eq!(failures[0].1.interceptor, 0);
    assert_eq!(failures[0].1.reason.as_deref(), Some("first"));
}

#[test]
fn test_later_soft_success_clears_failure() {
    let (nav, _calls) = wrap(&[Root]);
    let (notifier, failures) = RecordingNotifier::new();
    let mut nav = nav
        .with_interceptor(CannedInterceptor::new(
            IntentKind::Pop,
            InterceptedResult::soft_failure("first"),
        ))
        .with_interceptor(CannedInterceptor::new(
            IntentKind::Pop,
            InterceptedResult::soft_success(),
        ))
        .with_notifier(notifier);

    assert_eq!(nav.pop(None), None);
    assert!(failures.lock().is_empty());
}

struct Exploding;

impl NavigationEventListener<TestScreen> for Exploding {
    fn go_to(&mut self, _screen: &TestScreen, _context: &NavigationContext<TestScreen>) {
        panic!("listener exploded");
    }
}

#[test]
fn test_listener_panic_is_isolated() {
    let (nav, calls) = wrap(&[Root]);
    let (listener, events) = RecordingListener::new();
    let mut nav = nav.with_listener(Exploding).with_listener(listener);

    assert!(nav.go_to(A));

    assert_eq!(*calls.lock(), vec![NavCall::GoTo(A)]);
    assert!(events
        .lock()
        .contains(&ListenerEvent::GoTo(A, vec![A, Root])));
    let panics = nav.take_listener_panics();
    assert_eq!(panics.len(), 1);
    assert_eq!(panics[0].listener, 0);
    assert_eq!(panics[0].event, "go_to");
    assert_eq!(panics[0].message, "listener exploded");
    assert!(nav.take_listener_panics().is_empty());
}

#[test]
fn test_navigate_reports_outcome() {
    let (nav, _calls) = wrap(&[Root]);
    let mut nav = nav.with_interceptor(
        CannedInterceptor::new(IntentKind::ResetRoot, InterceptedResult::blocked("locked"))
            .for_screen(C),
    );

    let blocked = nav
        .navigate(NavigationIntent::reset_root(C, StateOptions::DEFAULT))
        .unwrap();
    assert!(!blocked.is_success());
    assert!(matches!(blocked, NavOutcome::Blocked(Some(_))));

    let reset = nav
        .navigate(NavigationIntent::reset_root(D, StateOptions::DEFAULT))
        .unwrap();
    assert_eq!(reset, NavOutcome::Reset(vec![Root]));
}

#[test]
fn test_from_config_applies_rewrite_limit() {
    let config = NavigationConfig {
        max_rewrites: 2,
        log_events: true,
        log_failures: true,
    };
    let mut nav = InterceptingNavigator::from_config(RecordingNavigator::new(&[Root]), &config)
        .with_interceptor(CannedInterceptor::new(
            IntentKind::GoTo,
            InterceptedResult::rewrite(NavigationIntent::GoTo(A)),
        ));

    assert!(matches!(
        nav.try_go_to(A),
        Err(InterceptError::RewriteLimitExceeded { limit: 2, .. })
    ));
}

#[test]
fn test_pop_until_stops_at_matching_screen() {
    let (nav, calls) = wrap(&[A, B, C, Root]);
    let observer = CannedInterceptor::new(IntentKind::Pop, InterceptedResult::Skipped);
    let seen = std::sync::Arc::clone(&observer.seen);
    let mut nav = nav.with_interceptor(observer);

    assert_eq!(nav.pop_until(|screen| *screen == C), vec![A, B]);

    assert_eq!(nav.peek_back_stack(), vec![C, Root]);
    assert_eq!(*calls.lock(), vec![NavCall::Pop(None), NavCall::Pop(None)]);
    // Every pop went through the chain.
    assert_eq!(seen.lock().len(), 2);
}

#[test]
fn test_pop_until_stops_when_a_pop_is_blocked() {
    let (nav, _calls) = wrap(&[A, B, C, Root]);
    let mut nav = nav.with_interceptor(
        CannedInterceptor::new(IntentKind::Pop, InterceptedResult::blocked("pinned")).for_screen(B),
    );

    assert_eq!(nav.pop_until(|screen| *screen == Root), vec![A]);
    assert_eq!(nav.peek_back_stack(), vec![B, C, Root]);
}

#[test]
fn test_pop_until_without_match_ends_in_root_pop() {
    let (mut nav, _calls) = wrap(&[A, Root]);

    assert_eq!(nav.pop_until(|screen| *screen == D), vec![A]);

    assert_eq!(nav.peek_back_stack(), vec![Root]);
    assert_eq!(*nav.delegate().root_pops.lock(), vec![None]);
}

#[test]
fn test_pop_root_keeps_active_screen_for_root_pop() {
    let (nav, calls) = wrap(&[A, B, Root]);
    let (listener, events) = RecordingListener::new();
    let mut nav = nav.with_listener(listener);

    assert_eq!(nav.pop_root(Some(PopResult::new(json!("closed")))), None);

    assert_eq!(
        *calls.lock(),
        vec![
            NavCall::ResetRoot(A, StateOptions::DEFAULT),
            NavCall::Pop(Some(PopResult::new(json!("closed")))),
        ]
    );
    assert_eq!(nav.peek_back_stack(), vec![A]);
    assert_eq!(
        *nav.delegate().root_pops.lock(),
        vec![Some(PopResult::new(json!("closed")))]
    );
    assert!(events
        .lock()
        .contains(&ListenerEvent::ResetRoot(A, StateOptions::DEFAULT, vec![A])));
}
