//! Serializable run configuration, loaded from TOML.
//!
//! ```toml
//! [input]
//! source = "csv"
//! path = "data/csi300_15m.csv"
//!
//! [engine]
//! min_stroke_span = 4
//!
//! [output]
//! dir = "results"
//! formats = ["json", "csv"]
//! ```

use std::path::{Path, PathBuf};

use chanlab_core::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::ExportFormat;
use crate::synthetic::SyntheticConfig;

/// Errors from loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("engine settings: {0}")]
    Engine(#[from] chanlab_core::engine::ConfigError),

    #[error("synthetic input needs at least one bar")]
    EmptySynthetic,

    #[error("synthetic interval of {0} minutes does not divide a 120-minute session")]
    InvalidInterval(u32),

    #[error("synthetic start price must be finite and positive (got {0})")]
    InvalidStartPrice(f64),
}

/// Where the candles for a run come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum InputConfig {
    /// A CSV file with `datetime, open, high, low, close, volume` columns.
    Csv { path: PathBuf },

    /// A seeded random walk on the session calendar.
    Synthetic(SyntheticConfig),
}

/// Where and how to write artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Artifact directory. `None` means analyze only.
    pub dir: Option<PathBuf>,
    pub formats: Vec<ExportFormat>,
    /// Overrides the label derived from the input.
    pub label: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            formats: vec![ExportFormat::Json],
            label: None,
        }
    }
}

/// A complete, reproducible run description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub input: InputConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl RunConfig {
    /// Load and validate a run configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a run configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if let InputConfig::Synthetic(synthetic) = &self.input {
            synthetic.validate()?;
        }
        Ok(())
    }

    /// Label for reports and artifact directories: the explicit label, the
    /// CSV file stem, or `synthetic-<seed>`.
    pub fn label(&self) -> String {
        if let Some(label) = &self.output.label {
            return label.clone();
        }
        match &self.input {
            InputConfig::Csv { path } => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "input".to_string()),
            InputConfig::Synthetic(synthetic) => format!("synthetic-{}", synthetic.seed),
        }
    }
}
