//! End-to-end scenarios for the three pipeline stages.
//!
//! Tests:
//! 1. A raw pair in containment merges into one standard candle.
//! 2. A strictly rising series has no fractals.
//! 3. A lone dip yields one bottom and no strokes.
//! 4. Extending the dip into a rise yields one up stroke.
//! 5. A candidate closer than the minimum span is skipped for a later one.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use chanlab_core::invariants::verify;
use chanlab_core::pipeline::{build_strokes, detect_fractals};
use chanlab_core::{
    run_pipeline, Candle, Direction, EngineConfig, FractalKind, Outcome, StandardCandle,
};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn ts(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, 18)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
        + Duration::minutes(i as i64)
}

fn raw(hl: &[(f64, f64)]) -> Vec<Candle> {
    hl.iter()
        .enumerate()
        .map(|(i, &(high, low))| Candle {
            timestamp: ts(i),
            open: (high + low) / 2.0,
            high,
            low,
            close: (high + low) / 2.0,
            volume: 1_000.0,
        })
        .collect()
}

fn standard(highs: &[f64], lows: &[f64]) -> Vec<StandardCandle> {
    highs
        .iter()
        .zip(lows)
        .enumerate()
        .map(|(i, (&high, &low))| StandardCandle {
            timestamp: ts(i),
            open: low,
            high,
            low,
            close: high,
            volume: 1_000.0,
            first: i,
            last: i,
        })
        .collect()
}

// ──────────────────────────────────────────────
// Scenarios
// ──────────────────────────────────────────────

#[test]
fn enclosed_pair_merges_into_one_candle() {
    let candles = raw(&[(12.0, 8.0), (11.0, 9.0)]);
    let analysis = run_pipeline(&candles, &EngineConfig::default());

    assert_eq!(analysis.standard.len(), 1);
    assert_eq!(analysis.standard[0].raw_range(), 0..=1);
    assert_eq!(analysis.outcome(), Outcome::InsufficientCandles);
    verify(&analysis, 4).unwrap();
}

#[test]
fn rising_series_has_no_fractals() {
    let candles = standard(
        &[10.0, 11.0, 12.0, 13.0, 14.0],
        &[9.0, 10.0, 11.0, 12.0, 13.0],
    );
    assert!(detect_fractals(&candles).is_empty());
}

#[test]
fn lone_dip_is_one_bottom_and_no_stroke() {
    let candles = standard(&[10.0, 10.0, 5.0, 10.0, 10.0], &[9.0, 9.0, 4.0, 9.0, 9.0]);
    let fractals = detect_fractals(&candles);

    assert_eq!(fractals.len(), 1);
    assert_eq!(fractals[0].kind, FractalKind::Bottom);
    assert_eq!(fractals[0].index, 2);
    assert!(build_strokes(&fractals, 4).is_empty());
}

#[test]
fn dip_then_rise_is_one_up_stroke() {
    let candles = standard(
        &[10.0, 10.0, 5.0, 10.0, 12.0, 14.0, 16.0, 14.0, 12.0],
        &[9.0, 9.0, 4.0, 9.0, 11.0, 13.0, 15.0, 13.0, 11.0],
    );
    let fractals = detect_fractals(&candles);
    assert_eq!(fractals.len(), 2);
    assert_eq!(fractals[1].kind, FractalKind::Top);
    assert_eq!(fractals[1].index, 6);

    let strokes = build_strokes(&fractals, 4);
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].direction, Direction::Up);
    assert_eq!(strokes[0].start.index, 2);
    assert_eq!(strokes[0].end.index, 6);
    assert_eq!(strokes[0].start_price(), 4.0);
    assert_eq!(strokes[0].end_price(), 16.0);
}

#[test]
fn near_candidate_is_skipped_for_distant_one() {
    // Bottom at 2, top at 4 (span 2), bottom at 5 (not lower), top at 8.
    let candles = raw(&[
        (10.0, 9.0),
        (8.0, 7.0),
        (5.0, 4.0),
        (7.0, 6.0),
        (9.0, 8.0),
        (8.5, 7.5),
        (10.0, 9.0),
        (11.0, 10.0),
        (12.0, 11.0),
        (11.0, 10.0),
    ]);
    let analysis = run_pipeline(&candles, &EngineConfig::default());

    // No containment, so standard indices match raw indices.
    assert_eq!(analysis.standard.len(), candles.len());
    let indices: Vec<usize> = analysis.fractals.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![2, 4, 5, 8]);

    assert_eq!(analysis.strokes.len(), 1);
    assert_eq!(analysis.strokes[0].start.index, 2);
    assert_eq!(analysis.strokes[0].end.index, 8);
    assert_eq!(analysis.strokes[0].span(), 6);
    assert_eq!(analysis.outcome(), Outcome::Complete);
    verify(&analysis, 4).unwrap();
}

#[test]
fn zigzag_produces_connected_alternating_strokes() {
    let mut hl = Vec::new();
    for leg in 0..6 {
        for step in 0..6 {
            let base = if leg % 2 == 0 {
                50.0 + step as f64 * 2.0
            } else {
                60.0 - step as f64 * 2.0
            };
            hl.push((base + 1.0, base - 1.0));
        }
    }
    let analysis = run_pipeline(&raw(&hl), &EngineConfig::default());

    assert!(analysis.strokes.len() >= 3);
    for pair in analysis.strokes.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
        assert_ne!(pair[0].direction, pair[1].direction);
    }
    verify(&analysis, 4).unwrap();
}
