//! Run result types.

use serde::{Deserialize, Serialize};

use crate::domain::{Fractal, StandardCandle, Stroke};

/// How far a run got. None of these are errors: degenerate inputs simply
/// produce empty downstream sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Zero raw candles.
    EmptyInput,
    /// Fewer than 3 standard candles: no fractal is possible.
    InsufficientCandles,
    /// Fewer than 2 fractals: no stroke is possible.
    InsufficientFractals,
    /// Enough fractals, but none formed a qualifying stroke.
    NoStrokes,
    Complete,
}

impl Outcome {
    pub fn is_degenerate(self) -> bool {
        self != Outcome::Complete
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Outcome::EmptyInput => "empty input",
            Outcome::InsufficientCandles => "insufficient standard candles",
            Outcome::InsufficientFractals => "insufficient fractals",
            Outcome::NoStrokes => "no strokes",
            Outcome::Complete => "complete",
        };
        f.write_str(label)
    }
}

/// The three derived sequences of one run.
///
/// Read-only once built; consumers may iterate them as often as they like.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Number of raw candles the run was given.
    pub raw_count: usize,
    pub standard: Vec<StandardCandle>,
    pub fractals: Vec<Fractal>,
    pub strokes: Vec<Stroke>,
}

impl Analysis {
    pub fn outcome(&self) -> Outcome {
        if self.raw_count == 0 {
            Outcome::EmptyInput
        } else if self.standard.len() < 3 {
            Outcome::InsufficientCandles
        } else if self.fractals.len() < 2 {
            Outcome::InsufficientFractals
        } else if self.strokes.is_empty() {
            Outcome::NoStrokes
        } else {
            Outcome::Complete
        }
    }

    /// Standard candle at a fractal's apex.
    pub fn apex(&self, fractal: &Fractal) -> Option<&StandardCandle> {
        self.standard.get(fractal.index)
    }
}
