//! Backend readiness gate.
//!
//! Probes the health endpoint immediately and then on a fixed 3 s schedule
//! until it answers or five minutes have passed. The application renders
//! only after the gate reports ready.
//!
//! CANCELLATION
//! ============
//! [`ReadinessGate::schedule`] returns the probing future together with a
//! [`GateHandle`]. The host spawns the future and calls
//! [`GateHandle::cancel`] on teardown; once cancelled, no further probe is
//! issued and the observer is not called again. Success and timeout end the
//! future on their own, so no timer outlives it.

#[cfg(test)]
#[path = "readiness_test.rs"]
mod readiness_test;

use std::fmt::Display;
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable, Either, select};

/// Delay between probe starts.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(3);

/// Give up after this long without a successful probe.
pub const MAX_WAIT: Duration = Duration::from_secs(300);

/// Terminal error shown after [`MAX_WAIT`].
pub const TIMEOUT_MESSAGE: &str =
    "Backend failed to respond after 5 minutes. Please check if the backend is running.";

/// Attempts after which the wake-up screen shows a "still trying" hint.
const STILL_TRYING_AFTER: u32 = 10;

/// Attempts after which the wake-up screen warns and shows the last error.
const SLOW_WARNING_AFTER: u32 = 40;

/// Monotonic time source and sleeper supplied by the host.
#[allow(async_fn_in_trait)]
pub trait Timer {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    async fn sleep(&self, duration: Duration);
}

/// Probe schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self { interval: PROBE_INTERVAL, max_wait: MAX_WAIT }
    }
}

/// Observable gate state, published after every attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadinessState {
    pub ready: bool,
    pub attempt_count: u32,
    pub last_error: Option<String>,
    pub timed_out: bool,
}

impl ReadinessState {
    /// Progress bar fill in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (f64::from(self.attempt_count) / f64::from(SLOW_WARNING_AFTER)).min(1.0)
    }

    #[must_use]
    pub fn show_still_trying(&self) -> bool {
        self.last_error.is_some() && self.attempt_count > STILL_TRYING_AFTER
    }

    #[must_use]
    pub fn show_slow_warning(&self) -> bool {
        self.attempt_count > SLOW_WARNING_AFTER
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.ready || self.timed_out
    }
}

/// How the gate finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Ready,
    TimedOut,
    Cancelled,
}

/// Cancels a scheduled gate. Clones cancel the same gate.
#[derive(Clone, Debug)]
pub struct GateHandle {
    abort: AbortHandle,
}

impl GateHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

/// Polls a health probe until it succeeds or the policy runs out.
pub struct ReadinessGate<P, T> {
    probe: P,
    timer: T,
    policy: ReadinessPolicy,
}

impl<P, F, E, T> ReadinessGate<P, T>
where
    P: Fn() -> F,
    F: Future<Output = Result<(), E>>,
    E: Display,
    T: Timer,
{
    pub fn new(probe: P, timer: T) -> Self {
        Self { probe, timer, policy: ReadinessPolicy::default() }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Wrap [`Self::run`] in an abortable future and hand back its handle.
    pub fn schedule<U>(self, on_update: U) -> (impl Future<Output = GateOutcome>, GateHandle)
    where
        U: FnMut(&ReadinessState),
    {
        let (abort, registration) = AbortHandle::new_pair();
        let task = Abortable::new(self.run(on_update), registration);
        let task = async move {
            let outcome = task.await.unwrap_or(GateOutcome::Cancelled);
            if outcome == GateOutcome::Cancelled {
                log::debug!("readiness gate cancelled");
            }
            outcome
        };
        (task, GateHandle { abort })
    }

    /// Probe on schedule, reporting state through `on_update`.
    ///
    /// Probe `n` (zero-based) starts no earlier than `n * interval` after the
    /// first; a probe is only issued while that start time and the elapsed
    /// time are both inside `max_wait`. Each probe races the remaining
    /// window, so a hung probe cannot hold the gate open past `max_wait`.
    /// After the last failed probe the gate waits out the remainder of
    /// `max_wait` and then times out.
    pub async fn run<U>(self, mut on_update: U) -> GateOutcome
    where
        U: FnMut(&ReadinessState),
    {
        let ReadinessPolicy { interval, max_wait } = self.policy;
        let started = self.timer.now();
        let elapsed = || self.timer.now().saturating_sub(started);
        let mut state = ReadinessState::default();
        let mut next_start = Duration::ZERO;

        loop {
            let result = {
                let probe = pin!((self.probe)());
                let deadline = pin!(self.timer.sleep(max_wait.saturating_sub(elapsed())));
                match select(probe, deadline).await {
                    Either::Left((result, _)) => Some(result),
                    Either::Right(((), _)) => None,
                }
            };

            match result {
                Some(Ok(())) => {
                    state.ready = true;
                    state.last_error = None;
                    log::info!("backend ready after {} failed probe(s)", state.attempt_count);
                    on_update(&state);
                    return GateOutcome::Ready;
                }
                Some(Err(e)) => {
                    state.attempt_count += 1;
                    state.last_error = Some(e.to_string());
                    log::debug!("backend probe {} failed: {e}", state.attempt_count);
                    on_update(&state);
                }
                None => {
                    log::debug!("backend probe {} still pending at the deadline", state.attempt_count + 1);
                    state.attempt_count += 1;
                    return time_out(&mut state, &mut on_update);
                }
            }

            next_start += interval;
            let spent = elapsed();
            if next_start >= max_wait || spent >= max_wait {
                let remaining = max_wait.saturating_sub(spent);
                if !remaining.is_zero() {
                    self.timer.sleep(remaining).await;
                }
                return time_out(&mut state, &mut on_update);
            }

            let wait = next_start.saturating_sub(spent);
            if !wait.is_zero() {
                self.timer.sleep(wait).await;
            }
        }
    }
}

fn time_out<U: FnMut(&ReadinessState)>(state: &mut ReadinessState, on_update: &mut U) -> GateOutcome {
    state.timed_out = true;
    state.last_error = Some(TIMEOUT_MESSAGE.to_owned());
    log::error!("backend did not become ready after {} probes", state.attempt_count);
    on_update(state);
    GateOutcome::TimedOut
}
