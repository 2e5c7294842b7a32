//! Fractal detection: a 3-wide scan over the standard candle sequence.
//!
//! Output is unfiltered: spacing and alternation are the stroke builder's
//! concern.

use log::debug;

use crate::domain::{Fractal, FractalKind, StandardCandle};

/// Classify the middle candle of a window.
///
/// Top: high and low both strictly above both neighbours'.
/// Bottom: high and low both strictly below both neighbours'.
pub fn classify(
    prev: &StandardCandle,
    mid: &StandardCandle,
    next: &StandardCandle,
) -> Option<FractalKind> {
    let is_top = mid.high > prev.high
        && mid.high > next.high
        && mid.low > prev.low
        && mid.low > next.low;
    if is_top {
        return Some(FractalKind::Top);
    }

    let is_bottom = mid.high < prev.high
        && mid.high < next.high
        && mid.low < prev.low
        && mid.low < next.low;
    is_bottom.then_some(FractalKind::Bottom)
}

/// Mark every interior extremum. Index 0 and `len - 1` never qualify since
/// they lack a neighbour on one side.
pub fn detect_fractals(candles: &[StandardCandle]) -> Vec<Fractal> {
    let fractals: Vec<Fractal> = candles
        .windows(3)
        .enumerate()
        .filter_map(|(offset, w)| {
            classify(&w[0], &w[1], &w[2]).map(|kind| Fractal::new(kind, offset + 1, &w[1]))
        })
        .collect();
    debug!(
        "fractal detection: {} standard candles -> {} fractals",
        candles.len(),
        fractals.len()
    );
    fractals
}
