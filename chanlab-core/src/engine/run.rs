//! Pipeline orchestration.

use log::debug;

use crate::domain::Candle;
use crate::engine::{Analysis, ConfigError, EngineConfig, Outcome};
use crate::pipeline::{build_strokes, detect_fractals, merge_inclusions};

/// A validated pipeline configuration, reusable across runs.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn run(&self, candles: &[Candle]) -> Analysis {
        run_pipeline(candles, &self.config)
    }
}

/// Run merge -> fractals -> strokes over `candles`.
///
/// Candles must be ordered by timestamp with finite, strictly positive
/// prices; the pipeline does not check. It never fails: short inputs
/// produce empty downstream sequences. Degenerate outcomes are only
/// logged at debug level here; callers that know the dataset report them.
pub fn run_pipeline(candles: &[Candle], config: &EngineConfig) -> Analysis {
    let standard = merge_inclusions(candles);
    let fractals = detect_fractals(&standard);
    let strokes = build_strokes(&fractals, config.min_stroke_span);

    let analysis = Analysis {
        raw_count: candles.len(),
        standard,
        fractals,
        strokes,
    };

    match analysis.outcome() {
        Outcome::Complete => debug!(
            "pipeline complete: {} raw, {} standard, {} fractals, {} strokes",
            analysis.raw_count,
            analysis.standard.len(),
            analysis.fractals.len(),
            analysis.strokes.len()
        ),
        outcome => debug!(
            "pipeline finished with {outcome} ({} raw candles)",
            analysis.raw_count
        ),
    }

    analysis
}
