//! Persistence gateway
//!
//! A string-keyed blob store plus typed `save`/`load` helpers. Loads never
//! fail: a missing, unreadable or malformed payload is logged and reported as
//! absent.

pub mod file_store;
pub mod memory_store;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;

/// Key holding the combined timers and history
pub const STATE_KEY: &str = "TIMER_APP_STATE";
/// Key holding the preferences
pub const PREFS_KEY: &str = "PREFERENCES";

/// Asynchronous key/value storage of serialized strings
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    /// Remove every key
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Serialize `value` and store it under `key`
pub async fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let payload = serde_json::to_string(value)?;
    store.set(key, payload).await?;
    debug!("Saved {}", key);
    Ok(())
}

/// Load and deserialize the value under `key`
pub async fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let payload = match store.get(key).await {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!("No stored value for {}", key);
            return None;
        }
        Err(e) => {
            warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&payload) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed value for {}: {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppData, HistoryEntry, Preferences, Timer, TimerStatus};
    use chrono::Utc;

    #[tokio::test]
    async fn state_round_trips_through_store() {
        let store = MemoryStore::new();
        let mut running = Timer::new("2", "Tea", "Kitchen", 180);
        running.status = TimerStatus::Running;
        running.remaining = 40;
        let data = AppData {
            timers: vec![Timer::new("1", "Pushups", "Workout", 30), running],
            history: vec![HistoryEntry {
                id: "1".into(),
                name: "Pushups".into(),
                completed_at: Utc::now(),
            }],
        };

        save(&store, STATE_KEY, &data).await.unwrap();
        let loaded: AppData = load(&store, STATE_KEY).await.unwrap();
        assert_eq!(loaded, data);
    }

    #[tokio::test]
    async fn missing_key_loads_as_none() {
        let store = MemoryStore::new();
        assert!(load::<Preferences>(&store, PREFS_KEY).await.is_none());
    }

    #[tokio::test]
    async fn malformed_payload_loads_as_none() {
        let store = MemoryStore::new();
        store.set(STATE_KEY, "{not json".to_string()).await.unwrap();
        assert!(load::<AppData>(&store, STATE_KEY).await.is_none());

        store
            .set(STATE_KEY, r#"{"timers":[{"id":"1"}]}"#.to_string())
            .await
            .unwrap();
        assert!(load::<AppData>(&store, STATE_KEY).await.is_none());
    }

    #[tokio::test]
    async fn stored_shape_uses_camel_case_keys() {
        let store = MemoryStore::new();
        save(&store, PREFS_KEY, &Preferences { halfway_alerts_enabled: true })
            .await
            .unwrap();
        let raw = store.get(PREFS_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"halfwayAlertsEnabled":true}"#);
    }
}
