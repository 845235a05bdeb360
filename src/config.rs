//! Runtime configuration
//!
//! Defaults cover the normal page. A JSON override may be stored under
//! [`CONFIG_KEY`](crate::consts::CONFIG_KEY), same storage as the submissions.

use serde::{Deserialize, Serialize};

use crate::consts::{CONFIG_KEY, STORAGE_KEY};
use crate::storage::KeyValueStore;

/// What to do when the stored submissions are not valid JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CorruptPolicy {
    /// Log a warning and carry on with an empty list
    #[default]
    TreatAsEmpty,
    /// Return `StoreError::Corrupt` to the caller
    Report,
}

impl CorruptPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorruptPolicy::TreatAsEmpty => "treat_as_empty",
            CorruptPolicy::Report => "report",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "treat_as_empty" | "empty" => Some(CorruptPolicy::TreatAsEmpty),
            "report" => Some(CorruptPolicy::Report),
            _ => None,
        }
    }
}

/// Form handler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Storage key holding the submissions array
    pub storage_key: String,
    /// Handling of unparseable stored content
    pub on_corrupt: CorruptPolicy,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            on_corrupt: CorruptPolicy::TreatAsEmpty,
        }
    }
}

impl FormConfig {
    /// Load the override from storage, falling back to defaults
    pub fn load(storage: &impl KeyValueStore) -> Self {
        match storage.get_item(CONFIG_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<FormConfig>(&json) {
                Ok(config) if !config.storage_key.is_empty() => {
                    log::info!(
                        "Loaded form config (key {}, on_corrupt {})",
                        config.storage_key,
                        config.on_corrupt.as_str()
                    );
                    return config;
                }
                Ok(_) => log::warn!("Ignoring form config with empty storage key"),
                Err(e) => log::warn!("Ignoring unparseable form config: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read form config: {}", e),
        }

        log::info!("Using default form config");
        Self::default()
    }
}
