//! Bootstrap configuration.

use platform_host::JSON_MIME_TYPE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key holding the current-schema document.
pub const DATA_KEY: &str = "data";
/// Storage key holding the schema-0 checklist sequence. Read during migration, never written.
pub const LEGACY_CHECKLISTS_KEY: &str = "checklists";
/// Default suggested file name for exports.
pub const EXPORT_FILENAME: &str = "checklists.json";
/// Default interval for clock ticks delivered to the application.
pub const CLOCK_INTERVAL_MS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Keys, file settings, and tick interval used by the checklist runtime.
///
/// Every field is optional when deserializing; missing fields take the defaults.
pub struct BootConfig {
    /// Storage key for the current-schema document.
    pub data_key: String,
    /// Storage key for the legacy checklist sequence.
    pub legacy_key: String,
    /// Suggested file name for exports.
    pub export_filename: String,
    /// MIME type attached to exports.
    pub export_mime: String,
    /// Advisory MIME filter for import pickers.
    pub import_accept: String,
    /// Interval between clock ticks, in milliseconds.
    pub clock_interval_ms: u32,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            data_key: DATA_KEY.to_string(),
            legacy_key: LEGACY_CHECKLISTS_KEY.to_string(),
            export_filename: EXPORT_FILENAME.to_string(),
            export_mime: JSON_MIME_TYPE.to_string(),
            import_accept: JSON_MIME_TYPE.to_string(),
            clock_interval_ms: CLOCK_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Error)]
/// Reasons a configuration override is rejected.
pub enum ConfigError {
    /// The override is not valid JSON for [`BootConfig`].
    #[error("invalid boot config: {0}")]
    Json(#[from] serde_json::Error),
    /// A storage key is empty.
    #[error("boot config field `{0}` must not be empty")]
    EmptyKey(&'static str),
    /// The current and legacy keys are identical.
    #[error("data key and legacy key are both `{0}`")]
    SharedKey(String),
}

impl BootConfig {
    /// Parses a JSON override on top of the defaults and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the JSON is malformed or the keys are unusable.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both storage keys are present and distinct.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyKey`] or [`ConfigError::SharedKey`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_key.is_empty() {
            return Err(ConfigError::EmptyKey("data_key"));
        }
        if self.legacy_key.is_empty() {
            return Err(ConfigError::EmptyKey("legacy_key"));
        }
        if self.data_key == self.legacy_key {
            return Err(ConfigError::SharedKey(self.data_key.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_storage_contract() {
        let config = BootConfig::default();
        assert_eq!(config.data_key, "data");
        assert_eq!(config.legacy_key, "checklists");
        assert_eq!(config.import_accept, "application/json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let config = BootConfig::from_json(r#"{"export_filename":"backup.json"}"#)
            .expect("valid override");
        assert_eq!(config.export_filename, "backup.json");
        assert_eq!(config.data_key, DATA_KEY);
        assert_eq!(config.clock_interval_ms, CLOCK_INTERVAL_MS);
    }

    #[test]
    fn rejects_colliding_or_empty_keys() {
        let err = BootConfig::from_json(r#"{"legacy_key":"data"}"#).expect_err("shared key");
        assert!(matches!(err, ConfigError::SharedKey(key) if key == "data"));

        let err = BootConfig::from_json(r#"{"data_key":""}"#).expect_err("empty key");
        assert!(matches!(err, ConfigError::EmptyKey("data_key")));

        let err = BootConfig::from_json("{").expect_err("bad json");
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
