//! Countdown supervisor and per-timer tick tasks

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::broadcast::error::RecvError,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::registry::SharedCountdown;
use crate::state::{lock, Action, AppState, TimerId};

/// Period between two countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that keeps one tick task alive per running timer
pub async fn countdown_supervisor_task(state: Arc<AppState>) {
    info!("Starting countdown supervisor");

    let mut changes = state.subscribe();
    reconcile(&state);

    loop {
        match changes.recv().await {
            Ok(change) => {
                debug!("Supervisor saw {} (revision {})", change.action, change.revision);
                reconcile(&state);
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("Supervisor missed {} state changes, resyncing", missed);
                reconcile(&state);
            }
            Err(RecvError::Closed) => {
                info!("State channel closed, stopping countdown supervisor");
                break;
            }
        }
    }
}

/// Bring countdown views and tick tasks in line with the current timers
pub fn reconcile(state: &Arc<AppState>) {
    let snapshot = state.snapshot();
    let plan = state.countdowns.plan(&snapshot.timers);

    for (id, view) in &plan.views {
        // Read the record under the view lock so a concurrent tick cannot
        // slip between the read and the update.
        let mut countdown = lock(view);
        if let Some(timer) = state.timer(id) {
            countdown.observe(&timer);
        }
    }

    for (id, view) in plan.to_launch {
        let task_state = Arc::clone(state);
        let task_id = id.clone();
        state.countdowns.launch(&id, move |generation| {
            tokio::spawn(tick_task(task_state, task_id, generation, view))
        });
    }
}

/// Tick one running timer once per [`TICK_PERIOD`] until it finishes, stops
/// running, or the task is cancelled
pub async fn tick_task(state: Arc<AppState>, id: TimerId, generation: u64, view: SharedCountdown) {
    debug!("Countdown for {} ticking (generation {})", id, generation);

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let halfway_enabled = state.preferences().halfway_alerts_enabled;

        let outcome = {
            let mut countdown = lock(&view);
            let before = *countdown;
            let Some(outcome) = countdown.tick(halfway_enabled) else {
                debug!("Countdown for {} is no longer ticking", id);
                break;
            };

            let applied = if outcome.finished {
                state.is_live_countdown(&id, generation)
            } else {
                state.apply_countdown_effect(
                    &id,
                    generation,
                    Action::SyncRemaining {
                        id: id.clone(),
                        remaining: outcome.remaining,
                    },
                )
            };
            if !applied {
                *countdown = before;
                debug!("Dropped stale tick for {} (generation {})", id, generation);
                break;
            }
            outcome
        };

        if outcome.halfway {
            if let Some(timer) = state.timer(&id) {
                state.alert(crate::services::notifier::halfway_message(&timer.name));
            }
        }

        if outcome.finished {
            // Completion runs as its own task, never inside the tick.
            let state = Arc::clone(&state);
            let id = id.clone();
            tokio::spawn(async move {
                state.finish_countdown(&id, generation);
            });
            break;
        }
    }
}
