//! Run orchestration: wires loading, the pipeline and reporting together.
//!
//! Entry points:
//! - `run_from_config()`: loads the configured input, then analyzes. Used by CLI `run`.
//! - `analyze_loaded()`: takes pre-loaded candles. No I/O.
//! - `run_batch()`: analyzes several CSV files in parallel, one independent
//!   pipeline call per file.

use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chanlab_core::invariants::{verify, InvariantViolation};
use chanlab_core::{Analysis, Engine, EngineConfig, Outcome};

use crate::config::{ConfigError, InputConfig, RunConfig};
use crate::data_loader::{load_csv, load_synthetic, DataSource, DroppedRows, LoadError, LoadedData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl From<chanlab_core::engine::ConfigError> for RunError {
    fn from(e: chanlab_core::engine::ConfigError) -> Self {
        RunError::Config(ConfigError::Engine(e))
    }
}

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub label: String,
    pub source: DataSource,
    pub dataset_hash: String,
    pub dropped: DroppedRows,
    pub outcome: Outcome,
    pub engine: EngineConfig,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl AnalysisReport {
    /// Re-check every structural invariant of the stored analysis.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        verify(&self.analysis, self.engine.min_stroke_span)
    }

    /// One-line summary for terminals and logs.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} raw -> {} standard, {} fractals, {} strokes ({})",
            self.label,
            self.analysis.raw_count,
            self.analysis.standard.len(),
            self.analysis.fractals.len(),
            self.analysis.strokes.len(),
            self.outcome
        )
    }
}

/// Analyze pre-loaded candles: no I/O.
pub fn analyze_loaded(
    label: &str,
    loaded: &LoadedData,
    config: &EngineConfig,
) -> Result<AnalysisReport, RunError> {
    let engine = Engine::new(config.clone())?;
    let analysis = engine.run(&loaded.candles);
    let outcome = analysis.outcome();

    if outcome.is_degenerate() {
        warn!("{label}: {outcome}");
    }

    Ok(AnalysisReport {
        schema_version: SCHEMA_VERSION,
        label: label.to_string(),
        source: loaded.source,
        dataset_hash: loaded.dataset_hash.clone(),
        dropped: loaded.dropped,
        outcome,
        engine: config.clone(),
        analysis,
    })
}

/// Load the configured input and analyze it.
pub fn run_from_config(config: &RunConfig) -> Result<AnalysisReport, RunError> {
    config.validate()?;
    let loaded = match &config.input {
        InputConfig::Csv { path } => load_csv(path)?,
        InputConfig::Synthetic(synthetic) => load_synthetic(synthetic),
    };
    let report = analyze_loaded(&config.label(), &loaded, &config.engine)?;
    info!("{}", report.summary());
    Ok(report)
}

/// Load and analyze one CSV file, labelled by its file stem.
pub fn run_csv(path: &Path, config: &EngineConfig) -> Result<AnalysisReport, RunError> {
    let loaded = load_csv(path)?;
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    let report = analyze_loaded(&label, &loaded, config)?;
    info!("{}", report.summary());
    Ok(report)
}

/// Analyze several CSV files in parallel. Each file is its own pipeline
/// call with no shared state; results come back in input order.
pub fn run_batch(
    paths: &[PathBuf],
    config: &EngineConfig,
) -> Vec<Result<AnalysisReport, RunError>> {
    paths.par_iter().map(|path| run_csv(path, config)).collect()
}
