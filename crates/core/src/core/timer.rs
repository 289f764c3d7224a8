//! Engine-owned timers.
//!
//! The engine never sleeps. It arms a [`Timer`] and the host calls
//! `Engine::fire` with the timer's id once `after` has elapsed. Only one timer
//! is armed at a time; arming replaces (and thereby cancels) the previous one,
//! so a late callback carrying an old id is a no-op.

use std::time::Duration;

use serde::Serialize;

/// Countdown granularity.
pub const TICK: Duration = Duration::from_secs(1);

/// Pause between hiding the stimulus and opening the response phase.
pub const GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerId(u64);

impl TimerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// One-second countdown step (reveal or response window).
    Countdown,
    /// Hidden-phase pause before answers open.
    Grace,
}

impl TimerKind {
    pub fn delay(self) -> Duration {
        match self {
            TimerKind::Countdown => TICK,
            TimerKind::Grace => GRACE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub id: TimerId,
    pub kind: TimerKind,
    pub after: Duration,
}

#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    issued: u64,
    active: Option<Timer>,
}

impl TimerSlot {
    pub(crate) fn arm(&mut self, kind: TimerKind) -> Timer {
        self.issued += 1;
        let timer = Timer {
            id: TimerId(self.issued),
            kind,
            after: kind.delay(),
        };
        self.active = Some(timer);
        timer
    }

    pub(crate) fn cancel(&mut self) -> Option<Timer> {
        self.active.take()
    }

    /// Disarm and return the active timer if `id` is still current.
    pub(crate) fn take(&mut self, id: TimerId) -> Option<Timer> {
        match self.active {
            Some(t) if t.id == id => self.active.take(),
            _ => None,
        }
    }

    pub(crate) fn active(&self) -> Option<Timer> {
        self.active
    }
}
