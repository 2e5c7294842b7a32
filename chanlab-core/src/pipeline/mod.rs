//! The three pipeline stages, each a pure function of its input.
//!
//! 1. Inclusion merge: raw candles -> standard candles
//! 2. Fractal detection: standard candles -> fractals (unfiltered)
//! 3. Stroke construction: fractals -> strokes
//!
//! Stages run strictly in order with no feedback between them; see
//! `engine::run_pipeline` for the orchestration.

pub mod fractal;
pub mod merge;
pub mod stroke;

pub use fractal::{classify, detect_fractals};
pub use merge::{fold_inclusions, merge_inclusions, merge_pair, MergeState};
pub use stroke::{build_strokes, Discard, Step, StrokeBuilder, DEFAULT_MIN_STROKE_SPAN};
