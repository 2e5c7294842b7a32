//! Engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::DEFAULT_MIN_STROKE_SPAN;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("min_stroke_span must be >= 1 (got {0})")]
    InvalidStrokeSpan(usize),
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum standard-index distance between stroke endpoints
    /// (4 = the 5-candle principle).
    pub min_stroke_span: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_stroke_span: DEFAULT_MIN_STROKE_SPAN,
        }
    }
}

impl EngineConfig {
    pub fn with_min_stroke_span(min_stroke_span: usize) -> Self {
        Self { min_stroke_span }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_stroke_span == 0 {
            return Err(ConfigError::InvalidStrokeSpan(self.min_stroke_span));
        }
        Ok(())
    }
}
