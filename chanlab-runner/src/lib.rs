//! ChanLab Runner: run orchestration on top of `chanlab-core`.
//!
//! This crate provides:
//! - TOML run configuration
//! - CSV loading with sanitization and dataset hashing
//! - Seeded synthetic candles on an exchange session calendar
//! - Single-run and parallel batch analysis
//! - JSON, CSV and Markdown artifact export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod synthetic;

pub use config::{ConfigError, InputConfig, OutputConfig, RunConfig};
pub use data_loader::{
    load_csv, load_synthetic, read_candles, sanitize, DataSource, DroppedRows, LoadError,
    LoadedData,
};
pub use export::{
    export_candles_csv, export_json, generate_report, import_json, load_artifacts,
    save_artifacts, ExportFormat,
};
pub use runner::{
    analyze_loaded, run_batch, run_csv, run_from_config, AnalysisReport, RunError,
    SCHEMA_VERSION,
};
pub use synthetic::{generate_candles, SyntheticConfig};
