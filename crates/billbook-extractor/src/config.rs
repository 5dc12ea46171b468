//! Configuration for the Extractor

use billbook_domain::MAX_FILE_BYTES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum time for both extraction calls on one file (seconds)
    pub extraction_timeout_secs: u64,

    /// Largest file accepted at intake (bytes)
    pub max_file_bytes: usize,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.max_file_bytes == 0 {
            return Err("max_file_bytes must be greater than 0".to_string());
        }
        if self.max_file_bytes > MAX_FILE_BYTES {
            return Err(format!("max_file_bytes cannot exceed {} bytes", MAX_FILE_BYTES));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            extraction_timeout_secs: 120,
            max_file_bytes: MAX_FILE_BYTES,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: short timeout, smaller files
    pub fn aggressive() -> Self {
        Self {
            extraction_timeout_secs: 30,
            max_file_bytes: 2 * 1024 * 1024,
        }
    }

    /// Lenient preset: long timeout for slow local models
    pub fn lenient() -> Self {
        Self {
            extraction_timeout_secs: 300,
            max_file_bytes: MAX_FILE_BYTES,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_timeout() {
        let config = ExtractorConfig {
            extraction_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_file_bytes_capped() {
        let config = ExtractorConfig {
            max_file_bytes: MAX_FILE_BYTES + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("extraction_timeout_secs = 45").unwrap();
        assert_eq!(parsed.extraction_timeout_secs, 45);
        assert_eq!(parsed.max_file_bytes, MAX_FILE_BYTES);
    }
}
