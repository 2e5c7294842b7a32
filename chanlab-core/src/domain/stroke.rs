//! Stroke: a directional segment between two alternating fractals.

use serde::{Deserialize, Serialize};

use super::{Direction, Fractal, FractalKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub start: Fractal,
    pub end: Fractal,
    pub direction: Direction,
    pub high: f64,
    pub low: f64,
}

impl Stroke {
    /// Build a stroke from its two endpoints. A stroke that starts at a
    /// bottom runs up; one that starts at a top runs down.
    pub fn new(start: Fractal, end: Fractal) -> Self {
        let direction = match start.kind {
            FractalKind::Bottom => Direction::Up,
            FractalKind::Top => Direction::Down,
        };
        Self {
            start,
            end,
            direction,
            high: start.high.max(end.high),
            low: start.low.min(end.low),
        }
    }

    /// Standard-candle index distance between the endpoints.
    pub fn span(&self) -> usize {
        self.end.index - self.start.index
    }

    /// Price where the stroke line begins: the top's high for a down
    /// stroke, the bottom's low for an up stroke.
    pub fn start_price(&self) -> f64 {
        self.start.extreme()
    }

    pub fn end_price(&self) -> f64 {
        self.end.extreme()
    }
}
