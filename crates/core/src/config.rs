use serde::{Deserialize, Serialize};

use crate::services::lookup_service::MIN_QUERY_LEN;
use crate::storage::manager::{HOLDINGS_KEY, SETTINGS_KEY};

/// Session configuration for `PortfolioTracker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Store key for the holdings blob
    pub holdings_key: String,

    /// Store key for the allocation-settings blob
    pub settings_key: String,

    /// Shortest search query sent to lookup providers
    pub min_query_len: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            holdings_key: HOLDINGS_KEY.to_string(),
            settings_key: SETTINGS_KEY.to_string(),
            min_query_len: MIN_QUERY_LEN,
        }
    }
}
