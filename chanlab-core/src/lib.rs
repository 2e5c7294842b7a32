//! ChanLab Core: structural decomposition of a price series.
//!
//! This crate contains the pure pipeline:
//! - Domain types (candles, standard candles, fractals, strokes)
//! - Inclusion merging into standard candles
//! - 3-candle fractal detection
//! - Stroke construction with the 5-candle principle and last-stroke rewrite
//! - Engine orchestration and outcome classification
//! - Structural invariant checks
//!
//! No I/O happens here. Loading, sanitizing and exporting live in
//! `chanlab-runner`.

pub mod domain;
pub mod engine;
pub mod invariants;
pub mod pipeline;

pub use domain::{Candle, Direction, Fractal, FractalKind, StandardCandle, Stroke};
pub use engine::{run_pipeline, Analysis, Engine, EngineConfig, Outcome};
