use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;
use crate::models::holdings::Holdings;
use crate::models::settings::AllocationSettings;

use super::format;
use super::store::KeyValueStore;

/// Default key for the holdings blob.
pub const HOLDINGS_KEY: &str = "holdings";

/// Default key for the allocation-settings blob.
pub const SETTINGS_KEY: &str = "allocation_settings";

/// Keyed load/save of holdings and allocation settings.
///
/// Holdings and settings are two independent blobs. A missing blob is not an
/// error: holdings default to empty, settings to 70/30 with no weights.
#[derive(Debug, Clone)]
pub struct StorageManager {
    holdings_key: String,
    settings_key: String,
}

impl StorageManager {
    pub fn new(holdings_key: impl Into<String>, settings_key: impl Into<String>) -> Self {
        Self {
            holdings_key: holdings_key.into(),
            settings_key: settings_key.into(),
        }
    }

    pub fn holdings_key(&self) -> &str {
        &self.holdings_key
    }

    pub fn settings_key(&self) -> &str {
        &self.settings_key
    }

    pub fn load_holdings(&self, store: &dyn KeyValueStore) -> Result<Holdings, CoreError> {
        match store.load(&self.holdings_key)? {
            Some(blob) => {
                let holdings: Holdings = Self::decode(&blob)?;
                debug!("Loaded {} holding(s) from '{}'", holdings.len(), self.holdings_key);
                Ok(holdings)
            }
            None => {
                info!("No holdings stored under '{}', starting empty", self.holdings_key);
                Ok(Holdings::new())
            }
        }
    }

    pub fn save_holdings(&self, store: &mut dyn KeyValueStore, holdings: &Holdings) -> Result<(), CoreError> {
        store.save(&self.holdings_key, &Self::encode(holdings)?)
    }

    pub fn load_settings(&self, store: &dyn KeyValueStore) -> Result<AllocationSettings, CoreError> {
        match store.load(&self.settings_key)? {
            Some(blob) => Self::decode(&blob),
            None => {
                info!("No settings stored under '{}', using defaults", self.settings_key);
                Ok(AllocationSettings::default())
            }
        }
    }

    pub fn save_settings(
        &self,
        store: &mut dyn KeyValueStore,
        settings: &AllocationSettings,
    ) -> Result<(), CoreError> {
        store.save(&self.settings_key, &Self::encode(settings)?)
    }

    /// Serialize a value into a versioned blob.
    ///
    /// Flow: value → bincode → blob envelope
    pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize blob: {e}")))?;
        Ok(format::write_blob(format::CURRENT_VERSION, &payload))
    }

    /// Parse a versioned blob back into a value.
    pub fn decode<T: DeserializeOwned>(blob: &[u8]) -> Result<T, CoreError> {
        let (_, payload) = format::read_blob(blob)?;
        bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize blob: {e}")))
    }
}

impl Default for StorageManager {
    fn default() -> Self {
        Self::new(HOLDINGS_KEY, SETTINGS_KEY)
    }
}
