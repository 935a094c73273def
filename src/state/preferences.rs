//! User preferences

use serde::{Deserialize, Serialize};

/// Preferences persisted separately from the timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub halfway_alerts_enabled: bool,
}
