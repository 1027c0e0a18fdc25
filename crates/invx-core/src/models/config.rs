//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InvxError, Result};

/// Main configuration for the invx pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvxConfig {
    /// Document loading configuration.
    pub source: SourceConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Document loading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Largest document file accepted, in bytes.
    pub max_file_bytes: u64,

    /// Texts shorter than this are processed with a warning.
    pub min_text_length: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024,
            min_text_length: 20,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Longest text handed to the extractors, in characters.
    pub max_input_chars: usize,

    /// Category assigned by the placeholder categorizer.
    pub default_category: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 1_000_000,
            default_category: "Uncategorized".to_string(),
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Symbol printed before amounts in text output.
    pub currency_symbol: String,

    /// Keep the raw extracted text in JSON output.
    pub include_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            include_text: false,
        }
    }
}

impl InvxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InvxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: InvxConfig =
            serde_json::from_str(r#"{"extraction": {"default_category": "Travel"}}"#).unwrap();

        assert_eq!(config.extraction.default_category, "Travel");
        assert_eq!(config.extraction.max_input_chars, 1_000_000);
        assert_eq!(config.source, SourceConfig::default());
        assert_eq!(config.output.currency_symbol, "$");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvxConfig::default();
        config.output.include_text = true;
        config.save(&path).unwrap();

        assert_eq!(InvxConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = InvxConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, InvxError::Config(_)));
    }
}
