//! Partition of timers by category

use serde::Serialize;

use crate::state::{Timer, TimerStatus};

/// Timers sharing one category, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub timers: Vec<Timer>,
}

/// Counts shown in a group's footer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub total: usize,
    pub running: usize,
    pub paused: usize,
    pub completed: usize,
}

impl CategoryGroup {
    pub fn summary(&self) -> GroupSummary {
        self.timers.iter().fold(
            GroupSummary {
                total: self.timers.len(),
                ..GroupSummary::default()
            },
            |mut acc, timer| {
                match timer.status {
                    TimerStatus::Running => acc.running += 1,
                    TimerStatus::Paused => acc.paused += 1,
                    TimerStatus::Completed => acc.completed += 1,
                }
                acc
            },
        )
    }

    /// Rows laid out in the group body: one per timer plus the footer
    pub fn row_count(&self) -> usize {
        self.timers.len() + 1
    }
}

/// Group `timers` by category, keeping first-seen category order
pub fn group_by_category(timers: &[Timer]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for timer in timers {
        match groups.iter_mut().find(|g| g.category == timer.category) {
            Some(group) => group.timers.push(timer.clone()),
            None => groups.push(CategoryGroup {
                category: timer.category.clone(),
                timers: vec![timer.clone()],
            }),
        }
    }
    groups
}

/// Distinct categories in first-seen order
pub fn categories(timers: &[Timer]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for timer in timers {
        if !seen.contains(&timer.category) {
            seen.push(timer.category.clone());
        }
    }
    seen
}
