//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ExtractoError, Result};
use super::statement::{MAX_DESCRIPTION_LEN, NO_DESCRIPTION};

/// Main configuration for extracto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractoConfig {
    /// Statement extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF text acquisition configuration.
    pub pdf: PdfConfig,
}

/// Statement extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum description length, in characters.
    pub max_description_len: usize,

    /// Description used when a line has none.
    pub placeholder_description: String,

    /// Run the relaxed whole-text scan when no detail section yields rows.
    pub enable_fallback: bool,

    /// Extract the "cuotas a vencer" block.
    pub extract_upcoming: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_description_len: MAX_DESCRIPTION_LEN,
            placeholder_description: NO_DESCRIPTION.to_string(),
            enable_fallback: true,
            extract_upcoming: true,
        }
    }
}

/// PDF text acquisition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length to consider a PDF text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

impl ExtractoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the extractor cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.max_description_len == 0 {
            return Err(ExtractoError::Config(
                "extraction.max_description_len must be greater than 0".to_string(),
            ));
        }
        if self.extraction.placeholder_description.trim().is_empty() {
            return Err(ExtractoError::Config(
                "extraction.placeholder_description must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
