//! Expand/collapse state for a variable-height group body
//!
//! The controller never lays anything out itself. It asks a [`LayoutOracle`]
//! for the measured content height and interpolates the visible height
//! linearly between collapsed and expanded over [`TRANSITION`].

use std::time::{Duration, Instant};

use serde::Serialize;

/// Length of one expand or collapse transition
pub const TRANSITION: Duration = Duration::from_millis(300);

/// Measures rendered content
pub trait LayoutOracle {
    /// Height of content made of `rows` rows, or `None` when nothing has been
    /// laid out yet
    fn measure(&self, rows: usize) -> Option<f64>;
}

/// Layout where every row has the same height
#[derive(Debug, Clone, Copy)]
pub struct RowLayout {
    pub row_height: f64,
}

impl LayoutOracle for RowLayout {
    fn measure(&self, rows: usize) -> Option<f64> {
        (rows > 0 && self.row_height > 0.0).then(|| rows as f64 * self.row_height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Disclosure {
    open: bool,
    rows: usize,
    content_height: f64,
    from: f64,
    to: f64,
    started: Option<Instant>,
}

/// Point-in-time rendering values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureView {
    pub open: bool,
    pub content_height: f64,
    pub visible_height: f64,
    pub indicator_degrees: f64,
    pub animating: bool,
}

impl Disclosure {
    /// Open and settled when there is content, closed otherwise
    pub fn new(rows: usize, oracle: &dyn LayoutOracle) -> Self {
        let open = rows > 0;
        let mut disclosure = Self {
            open,
            rows,
            content_height: 0.0,
            from: 0.0,
            to: if open { 1.0 } else { 0.0 },
            started: None,
        };
        if open {
            disclosure.measure(oracle);
        }
        disclosure
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Record a layout pass. Zero or negative heights are ignored so a
    /// transient empty layout does not erase the last measurement.
    pub fn on_layout(&mut self, height: f64) {
        if height > 0.0 {
            self.content_height = height;
        }
    }

    /// Follow a change in the number of content rows
    pub fn set_rows(&mut self, rows: usize, oracle: &dyn LayoutOracle, now: Instant) {
        if rows == self.rows {
            return;
        }
        let previous = self.rows;
        self.rows = rows;

        if rows == 0 {
            if self.open {
                self.animate_to(false, now);
            }
            return;
        }

        self.measure(oracle);
        if previous == 0 && !self.open {
            self.animate_to(true, now);
        }
    }

    /// Flip between open and closed, measuring first if needed
    pub fn toggle(&mut self, oracle: &dyn LayoutOracle, now: Instant) {
        if self.content_height <= 0.0 {
            self.measure(oracle);
        }
        self.animate_to(!self.open, now);
    }

    /// Transition progress, 0.0 collapsed to 1.0 expanded
    pub fn progress(&self, now: Instant) -> f64 {
        let value = match self.started {
            None => self.to,
            Some(started) => {
                let elapsed = now.saturating_duration_since(started).as_secs_f64();
                let fraction = (elapsed / TRANSITION.as_secs_f64()).min(1.0);
                self.from + (self.to - self.from) * fraction
            }
        };
        value.clamp(0.0, 1.0)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|started| now.saturating_duration_since(started) < TRANSITION)
    }

    pub fn visible_height(&self, now: Instant) -> f64 {
        (self.progress(now) * self.content_height).clamp(0.0, self.content_height)
    }

    /// Rotation of the expand indicator, 0 to 180 degrees
    pub fn indicator_degrees(&self, now: Instant) -> f64 {
        self.progress(now) * 180.0
    }

    pub fn view(&self, now: Instant) -> DisclosureView {
        DisclosureView {
            open: self.open,
            content_height: self.content_height,
            visible_height: self.visible_height(now),
            indicator_degrees: self.indicator_degrees(now),
            animating: self.is_animating(now),
        }
    }

    fn animate_to(&mut self, open: bool, now: Instant) {
        self.from = self.progress(now);
        self.to = if open { 1.0 } else { 0.0 };
        self.open = open;
        self.started = Some(now);
    }

    fn measure(&mut self, oracle: &dyn LayoutOracle) {
        if let Some(height) = oracle.measure(self.rows) {
            self.on_layout(height);
        }
    }
}
