use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::error::ApiError;
use crate::testing::{FakeTimer, harness};
use crate::transport::Method;

/// Probe failing `failures` times and then succeeding; counts calls.
fn flaky(failures: u32) -> (impl Fn() -> std::future::Ready<Result<(), String>>, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let probe = move || {
        counter.set(counter.get() + 1);
        if counter.get() > failures {
            std::future::ready(Ok(()))
        } else {
            std::future::ready(Err("connection refused".to_owned()))
        }
    };
    (probe, calls)
}

#[test]
fn ready_on_first_probe_without_sleeping() {
    let timer = FakeTimer::default();
    let (probe, calls) = flaky(0);
    let updates = RefCell::new(Vec::new());

    let outcome = block_on(ReadinessGate::new(probe, timer.clone()).run(|s| updates.borrow_mut().push(s.clone())));

    assert_eq!(outcome, GateOutcome::Ready);
    assert_eq!(calls.get(), 1);
    assert_eq!(timer.sleeps(), 0);
    let updates = updates.into_inner();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].ready);
    assert_eq!(updates[0].attempt_count, 0);
}

#[test]
fn n_failures_then_success_takes_n_plus_one_probes() {
    let timer = FakeTimer::default();
    let (probe, calls) = flaky(4);
    let last = RefCell::new(ReadinessState::default());

    let outcome = block_on(ReadinessGate::new(probe, timer.clone()).run(|s| *last.borrow_mut() = s.clone()));

    assert_eq!(outcome, GateOutcome::Ready);
    assert_eq!(calls.get(), 5);
    assert_eq!(timer.now(), PROBE_INTERVAL * 4);
    let last = last.into_inner();
    assert!(last.ready);
    assert_eq!(last.attempt_count, 4);
    assert_eq!(last.last_error, None);
}

#[test]
fn always_failing_backend_times_out_after_five_minutes() {
    let timer = FakeTimer::default();
    let (probe, calls) = flaky(u32::MAX);
    let last = RefCell::new(ReadinessState::default());

    let outcome = block_on(ReadinessGate::new(probe, timer.clone()).run(|s| *last.borrow_mut() = s.clone()));

    assert_eq!(outcome, GateOutcome::TimedOut);
    assert_eq!(calls.get(), 100);
    assert_eq!(timer.now(), MAX_WAIT);
    let last = last.into_inner();
    assert!(last.timed_out);
    assert!(!last.ready);
    assert_eq!(last.last_error.as_deref(), Some(TIMEOUT_MESSAGE));
}

#[test]
fn slow_failing_probes_cannot_outlast_the_window() {
    let timer = FakeTimer::default();
    let calls = Rc::new(Cell::new(0));
    let last = RefCell::new(ReadinessState::default());

    let probe = {
        let timer = timer.clone();
        let calls = calls.clone();
        move || {
            let timer = timer.clone();
            calls.set(calls.get() + 1);
            async move {
                timer.sleep(Duration::from_secs(30)).await;
                Err::<(), _>("request timed out")
            }
        }
    };
    let outcome = block_on(ReadinessGate::new(probe, timer.clone()).run(|s| *last.borrow_mut() = s.clone()));

    assert_eq!(outcome, GateOutcome::TimedOut);
    assert_eq!(timer.now(), MAX_WAIT);
    assert_eq!(calls.get(), 10);
    let last = last.into_inner();
    assert!(last.timed_out);
    assert_eq!(last.last_error.as_deref(), Some(TIMEOUT_MESSAGE));
}

#[test]
fn hung_probe_is_abandoned_at_the_deadline() {
    let timer = FakeTimer::default();
    let probe = {
        let timer = timer.clone();
        move || {
            let timer = timer.clone();
            async move {
                timer.sleep(Duration::from_secs(3600)).await;
                Ok::<(), String>(())
            }
        }
    };

    let outcome = block_on(ReadinessGate::new(probe, timer.clone()).run(|_| {}));

    assert_eq!(outcome, GateOutcome::TimedOut);
    assert_eq!(timer.now(), MAX_WAIT);
}

#[test]
fn custom_policy_bounds_the_probe_count() {
    let timer = FakeTimer::default();
    let (probe, calls) = flaky(u32::MAX);
    let policy = ReadinessPolicy { interval: Duration::from_secs(1), max_wait: Duration::from_secs(5) };

    let outcome = block_on(ReadinessGate::new(probe, timer.clone()).with_policy(policy).run(|_| {}));

    assert_eq!(outcome, GateOutcome::TimedOut);
    assert_eq!(calls.get(), 5);
    assert_eq!(timer.now(), Duration::from_secs(5));
}

#[test]
fn cancel_before_first_poll_issues_no_probe() {
    let timer = FakeTimer::default();
    let (probe, calls) = flaky(u32::MAX);
    let updates = Cell::new(0);

    let (task, handle) = ReadinessGate::new(probe, timer).schedule(|_| updates.set(updates.get() + 1));
    handle.cancel();

    assert_eq!(block_on(task), GateOutcome::Cancelled);
    assert_eq!(calls.get(), 0);
    assert_eq!(updates.get(), 0);
}

#[test]
fn cancel_mid_run_stops_further_probes_and_updates() {
    let timer = FakeTimer::default();
    let (probe, calls) = flaky(u32::MAX);
    let updates = Rc::new(Cell::new(0));
    let slot: Rc<RefCell<Option<GateHandle>>> = Rc::default();

    let (task, handle) = {
        let updates = updates.clone();
        let slot = slot.clone();
        ReadinessGate::new(probe, timer).schedule(move |state| {
            updates.set(updates.get() + 1);
            if state.attempt_count == 3 {
                if let Some(handle) = slot.borrow().as_ref() {
                    handle.cancel();
                }
            }
        })
    };
    *slot.borrow_mut() = Some(handle);

    assert_eq!(block_on(task), GateOutcome::Cancelled);
    assert_eq!(calls.get(), 3);
    assert_eq!(updates.get(), 3);
}

#[test]
fn gate_drives_the_health_endpoint() {
    let h = harness();
    h.transport
        .respond(Method::Get, "/health", Err(ApiError::Network("refused".to_owned())))
        .respond(Method::Get, "/health", Err(ApiError::Timeout))
        .ok(Method::Get, "/health", json!({"status": "UP"}));
    let api = h.api.clone();
    let last = RefCell::new(ReadinessState::default());

    let probe = move || {
        let api = api.clone();
        async move { api.health().await.map(|_| ()) }
    };
    let outcome = block_on(ReadinessGate::new(probe, FakeTimer::default()).run(|s| *last.borrow_mut() = s.clone()));

    assert_eq!(outcome, GateOutcome::Ready);
    assert_eq!(h.transport.count(Method::Get, "/health"), 3);
    assert_eq!(last.into_inner().attempt_count, 2);
}

#[test]
fn display_hints_follow_attempt_thresholds() {
    let mut state = ReadinessState { attempt_count: 10, last_error: Some("refused".to_owned()), ..Default::default() };
    assert!(!state.show_still_trying());
    assert!((state.progress() - 0.25).abs() < f64::EPSILON);

    state.attempt_count = 11;
    assert!(state.show_still_trying());
    assert!(!state.show_slow_warning());

    state.attempt_count = 41;
    assert!(state.show_slow_warning());
    assert!((state.progress() - 1.0).abs() < f64::EPSILON);

    state.last_error = None;
    assert!(!state.show_still_trying());
}
