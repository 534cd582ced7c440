//! Engine configuration
//!
//! Policy thresholds, deserialized from JSON with serde defaults so a host
//! only has to send the values it wants to override.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

pub const DEFAULT_SCHEMA_NAME: &str = "Untitled Schema";

/// Upper bound on tag path length
pub const MAX_PATH_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Selections shorter than this (in chars, after trimming) are ignored
    pub min_selection_chars: usize,
    /// Maximum number of tags in a structural fingerprint
    pub max_path_depth: usize,
    /// Preview snippets are cut to this many chars before the ellipsis
    pub preview_max_chars: usize,
    /// Placeholder name a schema starts with; saving requires changing it
    pub default_schema_name: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_selection_chars: 3,
            max_path_depth: 5,
            preview_max_chars: 100,
            default_schema_name: DEFAULT_SCHEMA_NAME.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values outside what the engine supports
    pub fn validate(&self) -> Result<()> {
        if self.max_path_depth > MAX_PATH_DEPTH {
            return Err(ExtractError::ConfigValue {
                field: "max_path_depth",
                reason: format!("{} exceeds maximum {}", self.max_path_depth, MAX_PATH_DEPTH),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.min_selection_chars, 3);
        assert_eq!(config.max_path_depth, 5);
        assert_eq!(config.preview_max_chars, 100);
        assert_eq!(config.default_schema_name, "Untitled Schema");
    }

    #[test]
    fn test_partial_json() {
        let config = ExtractorConfig::from_json(r#"{"max_path_depth": 3}"#).unwrap();
        assert_eq!(config.max_path_depth, 3);
        assert_eq!(config.min_selection_chars, 3);
    }

    #[test]
    fn test_invalid_json() {
        let err = ExtractorConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn test_path_depth_out_of_range() {
        let err = ExtractorConfig::from_json(r#"{"max_path_depth": 18446744073709551615}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ConfigValue { field: "max_path_depth", .. }
        ));

        let err = ExtractorConfig::from_json(r#"{"max_path_depth": 6}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for max_path_depth: 6 exceeds maximum 5"
        );

        assert!(ExtractorConfig::from_json(r#"{"max_path_depth": 5}"#).is_ok());
    }
}
