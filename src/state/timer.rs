//! Per-toast countdowns with pause/resume.
//!
//! Remaining time is always derived from clock deltas, so any number of
//! pause/resume cycles adds up to the original budget. The clock and the
//! actual scheduling are behind [`Scheduler`] so the engine can run on tokio
//! timers or on simulated time.

use std::time::{Duration, Instant};

use showme_util::ToastId;

use super::toast::{Toast, ToastState};

/// Identifies one scheduled fire. A resumed countdown always gets a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerKey(pub u64);

/// Clock plus one-shot timers.
///
/// A fire is delivered back to the engine as
/// [`Message::Timeout`](crate::handlers::Message::Timeout) carrying the key
/// returned by [`Scheduler::schedule`].
pub trait Scheduler {
    fn now(&self) -> Instant;

    fn schedule(&mut self, id: ToastId, after: Duration) -> TimerKey;

    /// Cancel a pending fire. Unknown or already fired keys are ignored.
    fn cancel(&mut self, key: TimerKey);
}

/// Countdown state of a non-persistent toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    total: Duration,
    remaining: Duration,
    started_at: Option<Instant>,
    key: Option<TimerKey>,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
            started_at: None,
            key: None,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Remaining time as of `now`, counting the current run if there is one.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started) => self
                .remaining
                .saturating_sub(now.saturating_duration_since(started)),
            None => self.remaining,
        }
    }

    pub fn is_current(&self, key: TimerKey) -> bool {
        self.key == Some(key)
    }

    fn start(&mut self, now: Instant, key: TimerKey) {
        self.started_at = Some(now);
        self.key = Some(key);
    }

    /// Fold the elapsed run into `remaining` and hand back the key to cancel.
    fn stop(&mut self, now: Instant) -> Option<TimerKey> {
        self.remaining = self.remaining_at(now);
        self.started_at = None;
        self.key.take()
    }
}

/// Arm the countdown of a toast that just became visible.
pub(crate) fn start(toast: &mut Toast, scheduler: &mut impl Scheduler) {
    let id = toast.id();
    let Some(countdown) = toast.countdown.as_mut() else {
        return;
    };
    let now = scheduler.now();
    let key = scheduler.schedule(id, countdown.remaining);
    countdown.start(now, key);
    tracing::trace!("{id} timer armed for {:?}", countdown.remaining);
}

/// Suspend a visible toast. Persistent toasts cannot be paused.
pub(crate) fn pause(toast: &mut Toast, scheduler: &mut impl Scheduler) -> bool {
    if toast.state() != ToastState::Visible {
        return false;
    }
    let id = toast.id();
    let Some(countdown) = toast.countdown.as_mut() else {
        return false;
    };
    if let Some(key) = countdown.stop(scheduler.now()) {
        scheduler.cancel(key);
    }
    tracing::trace!("{id} paused with {:?} left", countdown.remaining);
    toast.advance(ToastState::Paused)
}

pub(crate) fn resume(toast: &mut Toast, scheduler: &mut impl Scheduler) -> bool {
    if toast.state() != ToastState::Paused || !toast.advance(ToastState::Visible) {
        return false;
    }
    start(toast, scheduler);
    true
}

/// Drop any pending fire, e.g. because the toast is being removed.
pub(crate) fn disarm(toast: &mut Toast, scheduler: &mut impl Scheduler) {
    if let Some(countdown) = toast.countdown.as_mut() {
        if let Some(key) = countdown.stop(scheduler.now()) {
            scheduler.cancel(key);
        }
    }
}

/// Whether a fire with `key` should expire the toast.
pub(crate) fn fired(toast: &Toast, key: TimerKey) -> bool {
    toast.state() == ToastState::Visible
        && toast.countdown.as_ref().is_some_and(|c| c.is_current(key))
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Duration,
    id: ToastId,
    key: TimerKey,
}

/// Simulated clock for hosts without a runtime, and for tests.
///
/// Time only moves when the host says so; see
/// [`Toaster::advance`](crate::Toaster::advance).
#[derive(Debug)]
pub struct ManualScheduler {
    origin: Instant,
    elapsed: Duration,
    next_key: u64,
    pending: Vec<Deadline>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            next_key: 0,
            pending: Vec::new(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of fires still waiting
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|d| d.at).min()
    }

    /// Move the clock forward. Going backwards is ignored.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.max(elapsed);
    }

    /// Pop the earliest fire due at or before `limit`, moving the clock to it.
    pub fn pop_due(&mut self, limit: Duration) -> Option<(ToastId, TimerKey)> {
        let (index, deadline) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, d)| d.at <= limit)
            .min_by_key(|(_, d)| (d.at, d.key))
            .map(|(i, d)| (i, *d))?;
        self.pending.swap_remove(index);
        self.set_elapsed(deadline.at);
        Some((deadline.id, deadline.key))
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn schedule(&mut self, id: ToastId, after: Duration) -> TimerKey {
        self.next_key += 1;
        let key = TimerKey(self.next_key);
        self.pending.push(Deadline {
            at: self.elapsed + after,
            id,
            key,
        });
        key
    }

    fn cancel(&mut self, key: TimerKey) {
        self.pending.retain(|d| d.key != key);
    }
}
