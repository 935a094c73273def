//! Bookkeeping of countdown views and their tick tasks
//!
//! Each tick task is tagged with a generation number. Cancelling a task
//! retires its generation, and every effect a task wants to apply is checked
//! against the current generation first, so a tick that was already in flight
//! when the task was cancelled is dropped rather than applied late.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use tokio::task::JoinHandle;
use tracing::debug;

use super::countdown::Countdown;
use crate::state::{lock, Timer, TimerId};

pub type SharedCountdown = Arc<Mutex<Countdown>>;

#[derive(Debug)]
struct TickTask {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct Entries {
    views: HashMap<TimerId, SharedCountdown>,
    tasks: HashMap<TimerId, TickTask>,
}

impl Entries {
    /// Whether `generation` is still the live tick task of `id`
    fn is_current(&self, id: &TimerId, generation: u64) -> bool {
        self.tasks
            .get(id)
            .is_some_and(|task| task.generation == generation)
    }
}

/// What a reconciliation pass has to do after releasing the registry lock
#[derive(Debug, Default)]
pub struct Plan {
    /// Every live view, to be refreshed from its record
    pub views: Vec<(TimerId, SharedCountdown)>,
    /// Running timers without a tick task
    pub to_launch: Vec<(TimerId, SharedCountdown)>,
}

#[derive(Debug, Default)]
pub struct CountdownRegistry {
    entries: Mutex<Entries>,
    next_generation: AtomicU64,
}

impl CountdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        lock(&self.entries)
    }

    /// Run `f` while holding the registry lock, if `generation` is current.
    ///
    /// Cancellation needs the same lock, so it cannot interleave with `f`.
    pub fn with_current<R>(
        &self,
        id: &TimerId,
        generation: u64,
        f: impl FnOnce() -> R,
    ) -> Option<R> {
        let entries = self.entries();
        if !entries.is_current(id, generation) {
            return None;
        }
        let result = f();
        drop(entries);
        Some(result)
    }

    pub fn has_task(&self, id: &TimerId) -> bool {
        self.entries().tasks.contains_key(id)
    }

    pub fn task_count(&self) -> usize {
        self.entries().tasks.len()
    }

    /// Align views and tasks with `timers`: drop what was deleted, create
    /// views for new timers, cancel tasks of timers that stopped running
    pub fn plan(&self, timers: &[Timer]) -> Plan {
        let mut entries = self.entries();

        let live: Vec<&TimerId> = timers.iter().map(|t| &t.id).collect();
        entries.views.retain(|id, _| live.contains(&id));

        let stale: Vec<TimerId> = entries
            .tasks
            .keys()
            .filter(|id| {
                !timers
                    .iter()
                    .any(|timer| &timer.id == *id && timer.is_running())
            })
            .cloned()
            .collect();
        for id in stale {
            cancel_entry(&mut entries, &id);
        }

        let mut plan = Plan::default();
        for timer in timers {
            let view = entries
                .views
                .entry(timer.id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(Countdown::from_timer(timer))))
                .clone();
            if timer.is_running() && !entries.tasks.contains_key(&timer.id) {
                plan.to_launch.push((timer.id.clone(), Arc::clone(&view)));
            }
            plan.views.push((timer.id.clone(), view));
        }
        plan
    }

    /// Register a tick task for `id` unless one is already live.
    ///
    /// `spawn` receives the new generation and must start the task.
    pub fn launch(&self, id: &TimerId, spawn: impl FnOnce(u64) -> JoinHandle<()>) -> Option<u64> {
        let mut entries = self.entries();
        if entries.tasks.contains_key(id) {
            return None;
        }
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = spawn(generation);
        entries
            .tasks
            .insert(id.clone(), TickTask { generation, handle });
        debug!("Launched countdown for {} (generation {})", id, generation);
        Some(generation)
    }

    /// Stop the tick tasks of `ids`
    pub fn cancel<'a>(&self, ids: impl IntoIterator<Item = &'a TimerId>) {
        let mut entries = self.entries();
        for id in ids {
            cancel_entry(&mut entries, id);
        }
    }

    /// Stop every tick task and forget every view
    pub fn cancel_all(&self) {
        let mut entries = self.entries();
        let ids: Vec<TimerId> = entries.tasks.keys().cloned().collect();
        for id in &ids {
            cancel_entry(&mut entries, id);
        }
        entries.views.clear();
    }
}

fn cancel_entry(entries: &mut Entries, id: &TimerId) {
    if let Some(task) = entries.tasks.remove(id) {
        task.handle.abort();
        debug!("Cancelled countdown for {} (generation {})", id, task.generation);
    }
}
