use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_CHUNK_SIZE;
use crate::error::{ChartError, ChartResult};

/// How strictly host items are checked before they reach the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemValidationMode {
    /// Items are trusted; malformed ones degrade to whitespace rows.
    #[default]
    Off,
    /// Malformed items are logged and still applied.
    Warn,
    /// Malformed items reject the whole call.
    Strict,
}

/// Public data bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDataConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub item_validation: ItemValidationMode,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for ChartDataConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            item_validation: ItemValidationMode::default(),
        }
    }
}

impl ChartDataConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets plot-list min/max cache chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets item validation strictness.
    #[must_use]
    pub fn with_item_validation(mut self, mode: ItemValidationMode) -> Self {
        self.item_validation = mode;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.chunk_size == 0 {
            return Err(ChartError::InvalidData(
                "plot list chunk size must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Parses and validates a config; missing fields take their defaults.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config json: {e}")))?;
        config.validate()
    }
}
