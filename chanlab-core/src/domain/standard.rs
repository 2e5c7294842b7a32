//! StandardCandle: output of inclusion merging.

use std::ops::RangeInclusive;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Candle;

/// A merged candle covering the contiguous raw-index range `[first, last]`.
///
/// `timestamp` and `close` come from the last absorbed raw candle, `open`
/// from the first. High and low are the merge-direction extremes, so they
/// are not necessarily the raw extremes of the absorbed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardCandle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub first: usize,
    pub last: usize,
}

impl StandardCandle {
    /// Wrap a single raw candle at raw index `index`.
    pub fn from_raw(index: usize, candle: &Candle) -> Self {
        Self {
            timestamp: candle.timestamp,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            first: index,
            last: index,
        }
    }

    pub fn raw_range(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    /// Number of raw candles absorbed.
    pub fn raw_count(&self) -> usize {
        self.last - self.first + 1
    }

    /// Midpoint of the absorbed range in raw-index space.
    ///
    /// Renderers place a merged candle here so its body spans the raw bars
    /// it absorbed.
    pub fn center(&self) -> f64 {
        (self.first + self.last) as f64 / 2.0
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// True if this candle's `[low, high]` interval fully encloses `other`'s.
    pub fn encloses(&self, other: &StandardCandle) -> bool {
        self.high >= other.high && self.low <= other.low
    }

    /// Containment in either direction.
    pub fn is_contained_with(&self, other: &StandardCandle) -> bool {
        self.encloses(other) || other.encloses(self)
    }
}
