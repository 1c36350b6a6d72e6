//! Codec configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How tree text and payload are laid out in one compressed artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// Little-endian u64 length before the tree text and before the payload.
    #[default]
    LengthPrefixed,
    /// Tree text, a newline, then the raw payload up to end of input.
    Line,
}

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Container layout
    #[serde(default)]
    pub framing: Framing,

    /// Decimal places for non-root frequencies in the tree text, `None` for
    /// the shortest form that reads back exactly
    #[serde(default)]
    pub frequency_precision: Option<usize>,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            framing: Framing::default(),
            frequency_precision: None,
            log_level: default_log_level(),
        }
    }
}

impl CodecConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_frequency_precision(mut self, precision: Option<usize>) -> Self {
        self.frequency_precision = precision;
        self
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
