//! Inclusion merging: folds raw candles into standard candles.
//!
//! Two adjacent candles are in containment when one's `[low, high]` interval
//! encloses the other's (inclusive). A contained pair is replaced by a single
//! candle whose high/low follow the prevailing direction:
//! - Up: max of highs, max of lows
//! - Down: min of highs, min of lows
//!
//! The prevailing direction is read from the last two buffered candles and
//! carried through the fold in `MergeState`, so the merger stays a pure
//! function of its input.

use log::debug;

use crate::domain::{Candle, Direction, StandardCandle};

/// Fold state: the buffered output plus the last determined direction.
#[derive(Debug, Clone)]
pub struct MergeState {
    merged: Vec<StandardCandle>,
    direction: Direction,
}

impl Default for MergeState {
    fn default() -> Self {
        Self {
            merged: Vec::new(),
            direction: Direction::Up,
        }
    }
}

impl MergeState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            merged: Vec::with_capacity(capacity),
            direction: Direction::Up,
        }
    }

    /// The direction used by the most recent merge (Up before any merge).
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn merged(&self) -> &[StandardCandle] {
        &self.merged
    }

    /// Feed the next candle. A contained candle replaces the last buffered
    /// slot, which may then merge again with the following candle.
    pub fn push(mut self, next: StandardCandle) -> Self {
        let len = self.merged.len();
        if len > 0 && self.merged[len - 1].is_contained_with(&next) {
            self.direction = self.prevailing_direction();
            let direction = self.direction;
            let last = &mut self.merged[len - 1];
            *last = merge_pair(last, &next, direction);
        } else {
            self.merged.push(next);
        }
        self
    }

    pub fn finish(self) -> Vec<StandardCandle> {
        self.merged
    }

    /// Up if the last buffered high is strictly above its predecessor's,
    /// Down if strictly below, otherwise the last determined direction.
    /// With fewer than two buffered candles there is no predecessor and the
    /// direction defaults to Up.
    fn prevailing_direction(&self) -> Direction {
        let len = self.merged.len();
        if len < 2 {
            return Direction::Up;
        }
        let prior = &self.merged[len - 1];
        let before = &self.merged[len - 2];
        if prior.high > before.high {
            Direction::Up
        } else if prior.high < before.high {
            Direction::Down
        } else {
            self.direction
        }
    }
}

/// Merge a contained pair. `earlier` is the buffered candle, `later` the
/// incoming one; the result keeps `earlier`'s open and `later`'s timestamp
/// and close, sums volume, and covers both raw ranges.
pub fn merge_pair(
    earlier: &StandardCandle,
    later: &StandardCandle,
    direction: Direction,
) -> StandardCandle {
    let (high, low) = match direction {
        Direction::Up => (earlier.high.max(later.high), earlier.low.max(later.low)),
        Direction::Down => (earlier.high.min(later.high), earlier.low.min(later.low)),
    };
    StandardCandle {
        timestamp: later.timestamp,
        open: earlier.open,
        high,
        low,
        close: later.close,
        volume: earlier.volume + later.volume,
        first: earlier.first.min(later.first),
        last: earlier.last.max(later.last),
    }
}

/// Fold an ordered sequence of candles (raw-wrapped or already standard)
/// into standard candles.
///
/// Re-folding the output is a no-op: no two adjacent output candles are in
/// containment.
pub fn fold_inclusions<I>(candles: I) -> Vec<StandardCandle>
where
    I: IntoIterator<Item = StandardCandle>,
{
    let iter = candles.into_iter();
    let state = MergeState::with_capacity(iter.size_hint().0);
    iter.fold(state, MergeState::push).finish()
}

/// Merge raw candles into standard candles. Raw index `i` is the candle's
/// position in `candles`.
pub fn merge_inclusions(candles: &[Candle]) -> Vec<StandardCandle> {
    let standard = fold_inclusions(
        candles
            .iter()
            .enumerate()
            .map(|(i, c)| StandardCandle::from_raw(i, c)),
    );
    debug!(
        "inclusion merge: {} raw -> {} standard candles",
        candles.len(),
        standard.len()
    );
    standard
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn ts(i: usize) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            + Duration::minutes(15 * i as i64)
    }

    fn candles(hl: &[(f64, f64)]) -> Vec<Candle> {
        hl.iter()
            .enumerate()
            .map(|(i, &(high, low))| Candle {
                timestamp: ts(i),
                open: low,
                high,
                low,
                close: high,
                volume: 100.0,
            })
            .collect()
    }

    fn highs_lows(standard: &[StandardCandle]) -> Vec<(f64, f64)> {
        standard.iter().map(|c| (c.high, c.low)).collect()
    }

    #[test]
    fn empty_and_single_inputs_pass_through() {
        assert!(merge_inclusions(&[]).is_empty());

        let one = candles(&[(10.0, 9.0)]);
        let merged = merge_inclusions(&one);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].raw_range(), 0..=0);
    }

    #[test]
    fn first_merge_defaults_to_up() {
        // Second candle is enclosed by the first; no predecessor to read a
        // direction from, so Up: max high, max low.
        let merged = merge_inclusions(&candles(&[(12.0, 8.0), (11.0, 9.0)]));
        assert_eq!(highs_lows(&merged), vec![(12.0, 9.0)]);
        assert_eq!(merged[0].raw_range(), 0..=1);
    }

    #[test]
    fn down_trend_takes_lower_extremes() {
        // 12/10 -> 11/9 is a down step; 11.5/8 encloses 11/9.
        let merged = merge_inclusions(&candles(&[(12.0, 10.0), (11.0, 9.0), (11.5, 8.0)]));
        assert_eq!(highs_lows(&merged), vec![(12.0, 10.0), (11.0, 8.0)]);
        assert_eq!(merged[1].raw_range(), 1..=2);
    }

    #[test]
    fn up_trend_takes_higher_extremes() {
        let merged = merge_inclusions(&candles(&[(10.0, 8.0), (11.0, 9.0), (10.5, 9.5)]));
        assert_eq!(highs_lows(&merged), vec![(10.0, 8.0), (11.0, 9.5)]);
    }

    #[test]
    fn merged_slot_can_merge_again() {
        // 11/9 absorbs 10.8/9.2, then the result absorbs 10.9/9.3.
        let merged = merge_inclusions(&candles(&[
            (10.0, 8.0),
            (11.0, 9.0),
            (10.8, 9.2),
            (10.9, 9.3),
            (12.0, 10.0),
        ]));
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].raw_range(), 1..=3);
        assert_eq!((merged[1].high, merged[1].low), (11.0, 9.3));
        assert_eq!(merged[2].raw_range(), 4..=4);
    }

    #[test]
    fn merged_candle_keeps_provenance_fields() {
        let mut raw = candles(&[(12.0, 8.0), (11.0, 9.0)]);
        raw[0].open = 8.5;
        raw[1].close = 10.25;
        raw[1].volume = 40.0;
        let merged = merge_inclusions(&raw);
        let candle = &merged[0];
        assert_eq!(candle.open, 8.5);
        assert_eq!(candle.close, 10.25);
        assert_eq!(candle.volume, 140.0);
        assert_eq!(candle.timestamp, ts(1));
    }

    #[test]
    fn remerging_is_a_no_op() {
        let raw = candles(&[
            (10.0, 8.0),
            (11.0, 9.0),
            (10.5, 9.5),
            (9.0, 7.0),
            (9.5, 6.5),
            (12.0, 10.0),
        ]);
        let once = merge_inclusions(&raw);
        let twice = fold_inclusions(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn equal_highs_with_no_predecessor_merge_up() {
        let merged = merge_inclusions(&candles(&[(10.0, 8.0), (10.0, 9.0)]));
        assert_eq!(highs_lows(&merged), vec![(10.0, 9.0)]);
    }

    #[test]
    fn state_reports_last_direction() {
        let raw = candles(&[(12.0, 10.0), (11.0, 9.0), (11.5, 8.0)]);
        let state = raw
            .iter()
            .enumerate()
            .map(|(i, c)| StandardCandle::from_raw(i, c))
            .fold(MergeState::default(), MergeState::push);
        assert_eq!(state.direction(), Direction::Down);
        assert_eq!(state.merged().len(), 2);
    }
}
