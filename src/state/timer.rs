//! Timer entity and the add-timer form

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::utils::format::parse_leading_seconds;

/// Opaque timer identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(String);

impl TimerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TimerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TimerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Paused,
    Running,
    Completed,
}

impl TimerStatus {
    /// Label shown next to a timer
    pub fn label(self) -> &'static str {
        match self {
            TimerStatus::Paused => "Paused",
            TimerStatus::Running => "Running",
            TimerStatus::Completed => "COMPLETED",
        }
    }
}

/// A single countdown.
///
/// `remaining` stays within `[0, duration]` and a completed timer always has
/// nothing remaining; [`Timer::normalize`] restores both after a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub name: String,
    pub category: String,
    pub duration: u64,
    pub remaining: u64,
    pub status: TimerStatus,
}

impl Timer {
    /// A fresh, paused timer with the full duration remaining
    pub fn new(
        id: impl Into<TimerId>,
        name: impl Into<String>,
        category: impl Into<String>,
        duration: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            duration,
            remaining: duration,
            status: TimerStatus::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_completed(&self) -> bool {
        self.status == TimerStatus::Completed
    }

    /// Percentage of the duration still remaining, 0.0 to 100.0
    pub fn progress_pct(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        self.remaining as f64 / self.duration as f64 * 100.0
    }

    pub(crate) fn normalize(&mut self) {
        if self.status == TimerStatus::Completed {
            self.remaining = 0;
        }
        self.remaining = self.remaining.min(self.duration);
    }

    pub(crate) fn reset(&mut self) {
        self.remaining = self.duration;
        self.status = TimerStatus::Paused;
    }
}

/// Partial update merged into an existing timer. `duration` is immutable and
/// therefore absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TimerStatus>,
}

impl TimerUpdate {
    pub fn status(status: TimerStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Raw add-timer form submission.
///
/// The duration arrives as text or a number, mirroring a numeric text field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTimer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub duration: Option<serde_json::Value>,
}

impl NewTimer {
    pub fn new(name: &str, category: &str, duration: u64) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            duration: Some(serde_json::Value::from(duration)),
        }
    }

    /// Check the form and build a paused timer under `id`.
    ///
    /// Every field is required; no timer is produced on failure.
    pub fn into_timer(self, id: TimerId) -> Result<Timer, ValidationError> {
        let name = self.name.trim();
        let category = self.category.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if category.is_empty() {
            return Err(ValidationError::MissingField("category"));
        }

        let duration = match &self.duration {
            None | Some(serde_json::Value::Null) => {
                return Err(ValidationError::MissingField("duration"))
            }
            Some(serde_json::Value::String(s)) if s.trim().is_empty() => {
                return Err(ValidationError::MissingField("duration"))
            }
            Some(serde_json::Value::String(s)) => parse_leading_seconds(s),
            // Fractional seconds truncate, as they do for text input.
            Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            }),
            Some(_) => None,
        };

        match duration {
            Some(secs) if secs > 0 => Ok(Timer::new(id, name, category, secs as u64)),
            _ => Err(ValidationError::InvalidDuration(
                self.duration.map(|v| v.to_string()).unwrap_or_default(),
            )),
        }
    }
}
