//! Main application state container

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{
    lock, reduce, Action, AppData, BulkKind, HistoryEntry, NewTimer, Preferences, Timer,
    TimerId, TimerStatus, TimerUpdate,
};
use crate::{
    error::{StoreError, ValidationError},
    services::{notifier::completion_message, Notifier},
    storage::{self, KeyValueStore, PREFS_KEY, STATE_KEY},
    tasks::CountdownRegistry,
    view::{disclosure::DisclosureView, group_by_category, CategoryGroup, Disclosure, RowLayout},
};

/// Startup parameters of the container
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub host: String,
    /// Start with the example timer when nothing is stored
    pub seed_example: bool,
    /// Height of one row in a category body, used for disclosure layout
    pub row_height: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 20554,
            host: "127.0.0.1".to_string(),
            seed_example: true,
            row_height: 72.0,
        }
    }
}

/// Notification sent after every applied action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub action: &'static str,
    pub revision: u64,
}

/// A committed action and the timers it stopped
struct Committed {
    data: AppData,
    stopped: Vec<TimerId>,
}

/// Owns the timers, preferences, countdowns and presentation state.
///
/// Every mutation of the timers goes through one lock, so each action is
/// applied atomically and in a single order that the persistence writer and
/// the countdown supervisor both observe.
#[derive(Debug)]
pub struct AppState {
    data: Mutex<AppData>,
    revision: AtomicU64,
    preferences: Mutex<Preferences>,
    disclosures: Mutex<HashMap<String, Disclosure>>,
    pub countdowns: CountdownRegistry,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    layout: RowLayout,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
    state_change_tx: broadcast::Sender<StateChange>,
    snapshot_tx: watch::Sender<AppData>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let initial = if settings.seed_example {
            AppData::with_example()
        } else {
            AppData::default()
        };
        let (state_change_tx, _) = broadcast::channel(100);
        let (snapshot_tx, _) = watch::channel(initial.clone());

        Self {
            data: Mutex::new(initial),
            revision: AtomicU64::new(0),
            preferences: Mutex::new(Preferences::default()),
            disclosures: Mutex::new(HashMap::new()),
            countdowns: CountdownRegistry::new(),
            store,
            notifier,
            layout: RowLayout {
                row_height: settings.row_height,
            },
            start_time: Instant::now(),
            port: settings.port,
            host: settings.host,
            last_action: Mutex::new(None),
            state_change_tx,
            snapshot_tx,
        }
    }

    /// Hydrate timers, history and preferences from the store.
    ///
    /// Missing or unreadable data keeps the initial state.
    pub async fn load(&self) {
        match storage::load::<AppData>(self.store.as_ref(), STATE_KEY).await {
            Some(stored) => {
                info!(
                    "Loaded {} timers and {} history entries",
                    stored.timers.len(),
                    stored.history.len()
                );
                self.dispatch(Action::LoadState {
                    timers: stored.timers,
                    history: stored.history,
                });
            }
            None => info!(
                "No stored timers, starting with {}",
                self.snapshot().timers.len()
            ),
        }

        if let Some(prefs) = storage::load::<Preferences>(self.store.as_ref(), PREFS_KEY).await {
            debug!("Loaded preferences: {:?}", prefs);
            *lock(&self.preferences) = prefs;
        }
    }

    /// Stop every countdown and write out the latest state
    pub async fn shutdown(&self) {
        self.countdowns.cancel_all();
        if let Err(e) = self.flush().await {
            warn!("Failed to save timers during shutdown: {}", e);
        }
        info!("Timer state shut down");
    }

    /// Save the current state, waiting for the write
    pub async fn flush(&self) -> Result<(), StoreError> {
        let snapshot = self.snapshot();
        storage::save(self.store.as_ref(), STATE_KEY, &snapshot).await
    }

    /// Apply `action` and return the resulting state
    pub fn dispatch(&self, action: Action) -> AppData {
        self.dispatch_with(|_| Some(action))
            .unwrap_or_else(|| self.snapshot())
    }

    /// Build an action from the current state and apply it, atomically.
    /// Returns `None` when `build` declines.
    fn dispatch_with(&self, build: impl FnOnce(&AppData) -> Option<Action>) -> Option<AppData> {
        let committed = self.commit(build)?;
        self.countdowns.cancel(&committed.stopped);
        Some(committed.data)
    }

    fn commit(&self, build: impl FnOnce(&AppData) -> Option<Action>) -> Option<Committed> {
        let mut data = lock(&self.data);
        let action = build(&*data)?;
        let name = action.name();

        let was_running: Vec<TimerId> = data
            .timers
            .iter()
            .filter(|t| t.is_running())
            .map(|t| t.id.clone())
            .collect();

        let next = reduce(std::mem::take(&mut *data), action, Utc::now());
        *data = next.clone();
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;

        // Publish while still holding the lock so observers see revisions in
        // order.
        *lock(&self.last_action) = Some((name.to_string(), Utc::now()));
        self.snapshot_tx.send_replace(next.clone());
        if self
            .state_change_tx
            .send(StateChange {
                action: name,
                revision,
            })
            .is_err()
        {
            debug!("No listeners for {} (revision {})", name, revision);
        }
        drop(data);

        let stopped = was_running
            .into_iter()
            .filter(|id| !next.timer(id).is_some_and(Timer::is_running))
            .collect();

        Some(Committed {
            data: next,
            stopped,
        })
    }

    /// Whether the tick task `generation` of `id` may still act
    pub fn is_live_countdown(&self, id: &TimerId, generation: u64) -> bool {
        self.countdowns
            .with_current(id, generation, || {
                self.timer(id).is_some_and(|t| t.is_running())
            })
            .unwrap_or(false)
    }

    /// Apply an action on behalf of a tick task.
    ///
    /// Dropped when the task's generation was retired or the timer is no
    /// longer running; both checks happen atomically with the mutation.
    pub fn apply_countdown_effect(&self, id: &TimerId, generation: u64, action: Action) -> bool {
        let committed = self
            .countdowns
            .with_current(id, generation, || {
                self.commit(|data| data.timer(id).filter(|t| t.is_running()).map(|_| action))
            })
            .flatten();

        match committed {
            Some(committed) => {
                self.countdowns.cancel(&committed.stopped);
                true
            }
            None => false,
        }
    }

    /// Deferred completion raised by a tick task that reached zero
    pub fn finish_countdown(&self, id: &TimerId, generation: u64) {
        let name = self.timer(id).map(|t| t.name);
        let action = Action::CompleteTimer { id: id.clone() };

        if self.apply_countdown_effect(id, generation, action) {
            info!("Timer {} completed", id);
            if let Some(name) = name {
                self.alert(completion_message(&name));
            }
        } else {
            debug!("Dropped completion of {} (generation {})", id, generation);
        }
    }

    /// Raise a user alert without waiting for it; failures are only logged
    pub fn alert(&self, message: String) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&message).await {
                warn!("Notification failed: {}", e);
            }
        });
    }

    /// Validate the add-timer form and append the timer under a fresh id
    pub fn add_timer(&self, form: NewTimer) -> Result<Timer, ValidationError> {
        let mut timer = form.into_timer(TimerId::new(""))?;
        self.dispatch_with(|data| {
            timer.id = unique_id(data, Utc::now().timestamp_millis());
            Some(Action::AddTimer(timer.clone()))
        });
        info!("Added timer {} ({}) in {}", timer.id, timer.name, timer.category);
        Ok(timer)
    }

    pub fn start(&self, id: &TimerId) -> AppData {
        self.update(id, TimerUpdate::status(TimerStatus::Running))
    }

    pub fn pause(&self, id: &TimerId) -> AppData {
        self.update(id, TimerUpdate::status(TimerStatus::Paused))
    }

    pub fn update(&self, id: &TimerId, updates: TimerUpdate) -> AppData {
        self.dispatch(Action::UpdateTimer {
            id: id.clone(),
            updates,
        })
    }

    pub fn reset(&self, id: &TimerId) -> AppData {
        self.dispatch(Action::ResetTimer { id: id.clone() })
    }

    pub fn delete(&self, id: &TimerId) -> AppData {
        self.dispatch(Action::DeleteTimer { id: id.clone() })
    }

    pub fn complete(&self, id: &TimerId) -> AppData {
        self.dispatch(Action::CompleteTimer { id: id.clone() })
    }

    pub fn bulk_action(&self, category: &str, kind: BulkKind) -> AppData {
        info!("Bulk {:?} on category {}", kind, category);
        self.dispatch(Action::BulkAction {
            category: category.to_string(),
            kind,
        })
    }

    pub fn clear_history(&self) -> AppData {
        self.dispatch(Action::ClearHistory)
    }

    /// Wipe the store, then every timer, the history and the preferences.
    ///
    /// Unlike other persistence failures, a failed wipe is returned so it can
    /// be shown to the user; nothing is cleared in that case.
    pub async fn reset_all(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        self.dispatch(Action::ClearAll);
        *lock(&self.preferences) = Preferences::default();
        info!("All data has been cleared");
        Ok(())
    }

    pub fn snapshot(&self) -> AppData {
        lock(&self.data).clone()
    }

    pub fn timer(&self, id: &TimerId) -> Option<Timer> {
        lock(&self.data).timer(id).cloned()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        lock(&self.data).history.clone()
    }

    /// History as shareable, pretty-printed JSON
    pub fn export_history(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.history())
    }

    pub fn preferences(&self) -> Preferences {
        *lock(&self.preferences)
    }

    /// Replace the preferences and save them
    pub async fn set_preferences(&self, prefs: Preferences) -> Preferences {
        *lock(&self.preferences) = prefs;
        if let Err(e) = storage::save(self.store.as_ref(), PREFS_KEY, &prefs).await {
            warn!("Failed to save preferences: {}", e);
        }
        info!("Halfway alerts enabled: {}", prefs.halfway_alerts_enabled);
        prefs
    }

    /// Category groups with their disclosure state at `now`
    pub fn category_views(&self, now: Instant) -> Vec<(CategoryGroup, DisclosureView)> {
        let groups = group_by_category(&self.snapshot().timers);

        let mut disclosures = lock(&self.disclosures);
        disclosures.retain(|category, _| groups.iter().any(|g| &g.category == category));

        groups
            .into_iter()
            .map(|group| {
                let rows = group.row_count();
                let disclosure = disclosures
                    .entry(group.category.clone())
                    .or_insert_with(|| Disclosure::new(rows, &self.layout));
                disclosure.set_rows(rows, &self.layout, now);
                let view = disclosure.view(now);
                (group, view)
            })
            .collect()
    }

    /// Expand or collapse one category; `None` if it has no timers
    pub fn toggle_category(&self, category: &str, now: Instant) -> Option<DisclosureView> {
        // Brings the disclosure in line with the current rows first.
        self.category_views(now);

        let mut disclosures = lock(&self.disclosures);
        let disclosure = disclosures.get_mut(category)?;
        disclosure.toggle(&self.layout, now);
        let shown = if disclosure.is_open() { "open" } else { "closed" };
        debug!("Category {} is now {}", category, shown);
        Some(disclosure.view(now))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_change_tx.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<AppData> {
        self.snapshot_tx.subscribe()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match lock(&self.last_action).clone() {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }
}

/// Millisecond-timestamp id, bumped past any id already taken
fn unique_id(data: &AppData, mut millis: i64) -> TimerId {
    loop {
        let candidate = TimerId::new(millis.to_string());
        if !data.contains(&candidate) {
            return candidate;
        }
        millis += 1;
    }
}
