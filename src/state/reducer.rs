//! Timer state and its transition function
//!
//! [`reduce`] is the only place timers and history change. It is pure apart
//! from debug logging: the completion timestamp is passed in, and every
//! action is total, so an unknown id simply leaves the state untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::history::HistoryEntry;
use super::timer::{Timer, TimerId, TimerStatus, TimerUpdate};

/// Aggregate of all timers and the completion history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub timers: Vec<Timer>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl AppData {
    /// State used when nothing has been stored yet
    pub fn with_example() -> Self {
        Self {
            timers: vec![Timer::new("1", "Example Timer", "Example", 10)],
            history: Vec::new(),
        }
    }

    pub fn timer(&self, id: &TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| &t.id == id)
    }

    fn timer_mut(&mut self, id: &TimerId) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TimerId) -> bool {
        self.timer(id).is_some()
    }
}

/// Operation applied to every timer of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkKind {
    Reset,
    Start,
    Pause,
    /// Any unrecognized action name; leaves every timer as it is
    #[serde(other)]
    Unknown,
}

impl BulkKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "reset" => BulkKind::Reset,
            "start" => BulkKind::Start,
            "pause" => BulkKind::Pause,
            _ => BulkKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadState {
        timers: Vec<Timer>,
        history: Vec<HistoryEntry>,
    },
    AddTimer(Timer),
    UpdateTimer {
        id: TimerId,
        updates: TimerUpdate,
    },
    DeleteTimer {
        id: TimerId,
    },
    ResetTimer {
        id: TimerId,
    },
    CompleteTimer {
        id: TimerId,
    },
    BulkAction {
        category: String,
        kind: BulkKind,
    },
    /// Countdown write-back; ignored unless the timer is running
    SyncRemaining {
        id: TimerId,
        remaining: u64,
    },
    ClearHistory,
    ClearAll,
}

impl Action {
    /// Short name used for last-action tracking and logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoadState { .. } => "load-state",
            Action::AddTimer(_) => "add-timer",
            Action::UpdateTimer { .. } => "update-timer",
            Action::DeleteTimer { .. } => "delete-timer",
            Action::ResetTimer { .. } => "reset-timer",
            Action::CompleteTimer { .. } => "complete-timer",
            Action::BulkAction { .. } => "bulk-action",
            Action::SyncRemaining { .. } => "sync-remaining",
            Action::ClearHistory => "clear-history",
            Action::ClearAll => "clear-all",
        }
    }
}

/// Apply `action` to `state`, stamping completions with `now`
pub fn reduce(mut state: AppData, action: Action, now: DateTime<Utc>) -> AppData {
    match action {
        Action::LoadState { timers, history } => {
            state.timers = timers;
            state.history = history;
            state.timers.iter_mut().for_each(Timer::normalize);
        }
        Action::AddTimer(mut timer) => {
            if state.contains(&timer.id) {
                debug!("Ignoring timer with duplicate id {}", timer.id);
            } else {
                timer.reset();
                state.timers.push(timer);
            }
        }
        Action::UpdateTimer { id, updates } => {
            if let Some(timer) = state.timer_mut(&id) {
                merge(timer, updates);
            }
        }
        Action::DeleteTimer { id } => {
            state.timers.retain(|t| t.id != id);
        }
        Action::ResetTimer { id } => {
            if let Some(timer) = state.timer_mut(&id) {
                timer.reset();
            }
        }
        Action::CompleteTimer { id } => {
            if let Some(timer) = state.timer_mut(&id) {
                timer.remaining = 0;
                timer.status = TimerStatus::Completed;
                let entry = HistoryEntry::completed(timer, now);
                state.history.push(entry);
            } else {
                debug!("Complete for unknown timer {} dropped", id);
            }
        }
        Action::BulkAction { category, kind } => {
            for timer in state.timers.iter_mut().filter(|t| t.category == category) {
                match kind {
                    BulkKind::Reset => timer.reset(),
                    BulkKind::Start if !timer.is_completed() => {
                        timer.status = TimerStatus::Running
                    }
                    BulkKind::Pause if !timer.is_completed() => {
                        timer.status = TimerStatus::Paused
                    }
                    _ => {}
                }
            }
        }
        Action::SyncRemaining { id, remaining } => {
            if let Some(timer) = state.timer_mut(&id).filter(|t| t.is_running()) {
                timer.remaining = remaining.min(timer.duration);
            }
        }
        Action::ClearHistory => state.history.clear(),
        Action::ClearAll => {
            state.timers.clear();
            state.history.clear();
        }
    }
    state
}

fn merge(timer: &mut Timer, updates: TimerUpdate) {
    if let Some(name) = updates.name {
        timer.name = name;
    }
    if let Some(category) = updates.category {
        timer.category = category;
    }
    if let Some(remaining) = updates.remaining {
        timer.remaining = remaining;
    }
    if let Some(status) = updates.status {
        // Only an explicit reset brings a completed timer back.
        if !(timer.is_completed() && status == TimerStatus::Running) {
            timer.status = status;
        }
    }
    timer.normalize();
}
