//! Fractal: a 3-candle local extremum on the standard candle sequence.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::StandardCandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FractalKind {
    Top,
    Bottom,
}

impl FractalKind {
    pub fn opposite(self) -> Self {
        match self {
            FractalKind::Top => FractalKind::Bottom,
            FractalKind::Bottom => FractalKind::Top,
        }
    }
}

impl std::fmt::Display for FractalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FractalKind::Top => write!(f, "TOP"),
            FractalKind::Bottom => write!(f, "BOTTOM"),
        }
    }
}

/// A fractal anchored at standard candle `index` (its apex).
///
/// Timestamp, high and low are copied from the apex when the fractal is
/// created; the fractal does not borrow the candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fractal {
    pub kind: FractalKind,
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub high: f64,
    pub low: f64,
}

impl Fractal {
    pub fn new(kind: FractalKind, index: usize, apex: &StandardCandle) -> Self {
        Self {
            kind,
            index,
            timestamp: apex.timestamp,
            high: apex.high,
            low: apex.low,
        }
    }

    /// Whether `other` (same kind) is at least as extreme as `self`:
    /// a higher-or-equal high for tops, a lower-or-equal low for bottoms.
    ///
    /// Ties resolve in favour of `other` for both polarities, so the latest
    /// of several equal extremes wins.
    pub fn is_superseded_by(&self, other: &Fractal) -> bool {
        debug_assert_eq!(self.kind, other.kind);
        match self.kind {
            FractalKind::Top => other.high >= self.high,
            FractalKind::Bottom => other.low <= self.low,
        }
    }

    /// The price at which a stroke touches this fractal.
    pub fn extreme(&self) -> f64 {
        match self.kind {
            FractalKind::Top => self.high,
            FractalKind::Bottom => self.low,
        }
    }
}
