//! Local countdown view of one timer
//!
//! The view mirrors the authoritative [`Timer`] and advances one second per
//! tick while the timer runs. It decides when the halfway alert and the
//! completion fire; the tick task in [`super::supervisor`] carries out the
//! effects.

use crate::state::{Timer, TimerStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started since creation or the last reset
    Idle,
    Ticking,
    Paused,
    Completed,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining: u64,
    /// First crossing of the halfway mark since the last reset
    pub halfway: bool,
    /// This tick reached zero; no further ticks follow
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    duration: u64,
    remaining: u64,
    phase: Phase,
    halfway_notified: bool,
}

impl Countdown {
    pub fn from_timer(timer: &Timer) -> Self {
        let mut countdown = Self {
            duration: timer.duration,
            remaining: timer.remaining,
            phase: Phase::Idle,
            halfway_notified: false,
        };
        countdown.observe(timer);
        countdown
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn halfway_notified(&self) -> bool {
        self.halfway_notified
    }

    /// Adopt the authoritative record.
    ///
    /// Seeing the full duration remaining re-arms the halfway alert; a
    /// pause/resume cycle keeps it spent.
    pub fn observe(&mut self, timer: &Timer) {
        self.duration = timer.duration;
        self.remaining = timer.remaining.min(timer.duration);
        if self.remaining == self.duration {
            self.halfway_notified = false;
        }
        self.phase = match timer.status {
            TimerStatus::Running => Phase::Ticking,
            TimerStatus::Completed => Phase::Completed,
            TimerStatus::Paused if self.remaining == self.duration => Phase::Idle,
            TimerStatus::Paused => Phase::Paused,
        };
    }

    /// Advance by one second. Returns `None` unless ticking.
    ///
    /// With `halfway_enabled` off the alert is not consumed, so enabling it
    /// later in the run still fires on the next tick.
    pub fn tick(&mut self, halfway_enabled: bool) -> Option<TickOutcome> {
        if self.phase != Phase::Ticking {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);

        let halfway = halfway_enabled
            && !self.halfway_notified
            && self.remaining.saturating_mul(2) <= self.duration;
        if halfway {
            self.halfway_notified = true;
        }

        let finished = self.remaining == 0;
        if finished {
            self.phase = Phase::Completed;
        }

        Some(TickOutcome {
            remaining: self.remaining,
            halfway,
            finished,
        })
    }
}
