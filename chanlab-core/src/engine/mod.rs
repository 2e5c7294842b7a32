//! Pipeline engine: runs merge, fractal detection and stroke construction
//! strictly in order over one immutable candle slice.
//!
//! Each call is independent: nothing is cached or carried between runs.

pub mod config;
pub mod run;
pub mod state;

pub use config::{ConfigError, EngineConfig};
pub use run::{run_pipeline, Engine};
pub use state::{Analysis, Outcome};
