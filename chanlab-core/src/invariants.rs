//! Structural invariant checks over a finished `Analysis`.
//!
//! The pipeline upholds these by construction; `verify` exists for tests and
//! for callers that want to audit a result before handing it on.

use thiserror::Error;

use crate::domain::{Direction, Fractal, StandardCandle, Stroke};
use crate::engine::Analysis;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("standard candles {index} and {next} are in containment", next = .index + 1)]
    AdjacentContainment { index: usize },

    #[error("standard candle {index} starts at raw index {first}, expected {expected}")]
    CoverageGap {
        index: usize,
        first: usize,
        expected: usize,
    },

    #[error("standard candle {index} has inverted raw range [{first}, {last}]")]
    InvertedRange {
        index: usize,
        first: usize,
        last: usize,
    },

    #[error("standard candles cover {covered} raw candles, expected {expected}")]
    IncompleteCoverage { covered: usize, expected: usize },

    #[error("fractal at index {index} has no neighbour on one side ({len} standard candles)")]
    BoundaryFractal { index: usize, len: usize },

    #[error("fractal {position} (index {index}) is not after its predecessor")]
    UnorderedFractals { position: usize, index: usize },

    #[error("stroke {index} joins two fractals of the same kind")]
    SameKindEndpoints { index: usize },

    #[error("strokes {index} and {next} do not share a boundary fractal", next = .index + 1)]
    Disconnected { index: usize },

    #[error("stroke {index} spans {span} standard candles, minimum is {min_span}")]
    TooShort {
        index: usize,
        span: usize,
        min_span: usize,
    },

    #[error("stroke {index} runs {direction} but its end does not extend past its start")]
    WrongDirection { index: usize, direction: Direction },
}

/// Check every structural invariant of `analysis`. Raw coverage is checked
/// against `analysis.raw_count`; `min_span` is the span the run was built with.
pub fn verify(analysis: &Analysis, min_span: usize) -> Result<(), InvariantViolation> {
    check_standard(&analysis.standard, analysis.raw_count)?;
    check_fractals(&analysis.fractals, analysis.standard.len())?;
    check_strokes(&analysis.strokes, min_span)
}

/// No adjacent containment; raw ranges contiguous, in order, covering
/// `0..raw_count`.
pub fn check_standard(
    standard: &[StandardCandle],
    raw_count: usize,
) -> Result<(), InvariantViolation> {
    for (index, pair) in standard.windows(2).enumerate() {
        if pair[0].is_contained_with(&pair[1]) {
            return Err(InvariantViolation::AdjacentContainment { index });
        }
    }

    let mut expected = 0;
    for (index, candle) in standard.iter().enumerate() {
        if candle.first != expected {
            return Err(InvariantViolation::CoverageGap {
                index,
                first: candle.first,
                expected,
            });
        }
        if candle.last < candle.first {
            return Err(InvariantViolation::InvertedRange {
                index,
                first: candle.first,
                last: candle.last,
            });
        }
        expected = candle.last + 1;
    }

    if expected != raw_count {
        return Err(InvariantViolation::IncompleteCoverage {
            covered: expected,
            expected: raw_count,
        });
    }
    Ok(())
}

/// Fractals strictly ordered by apex index and never at either boundary.
pub fn check_fractals(fractals: &[Fractal], standard_len: usize) -> Result<(), InvariantViolation> {
    for (position, fractal) in fractals.iter().enumerate() {
        if fractal.index == 0 || fractal.index + 1 >= standard_len {
            return Err(InvariantViolation::BoundaryFractal {
                index: fractal.index,
                len: standard_len,
            });
        }
        if position > 0 && fractals[position - 1].index >= fractal.index {
            return Err(InvariantViolation::UnorderedFractals {
                position,
                index: fractal.index,
            });
        }
    }
    Ok(())
}

/// Alternation, shared boundaries, minimum span, and each stroke's end
/// extending past its start on the stroke's leading side.
pub fn check_strokes(strokes: &[Stroke], min_span: usize) -> Result<(), InvariantViolation> {
    for (index, stroke) in strokes.iter().enumerate() {
        if stroke.start.kind == stroke.end.kind {
            return Err(InvariantViolation::SameKindEndpoints { index });
        }

        let span = stroke.end.index.saturating_sub(stroke.start.index);
        if stroke.end.index <= stroke.start.index || span < min_span {
            return Err(InvariantViolation::TooShort {
                index,
                span,
                min_span,
            });
        }

        let extends = match stroke.direction {
            Direction::Up => stroke.end.high > stroke.start.high,
            Direction::Down => stroke.end.low < stroke.start.low,
        };
        if !extends {
            return Err(InvariantViolation::WrongDirection {
                index,
                direction: stroke.direction,
            });
        }
    }

    for (index, pair) in strokes.windows(2).enumerate() {
        if pair[0].end.index != pair[1].start.index || pair[0].end.kind != pair[1].start.kind {
            return Err(InvariantViolation::Disconnected { index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FractalKind;
    use chrono::NaiveDate;

    fn standard(high: f64, low: f64, first: usize, last: usize) -> StandardCandle {
        StandardCandle {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            open: low,
            high,
            low,
            close: high,
            volume: 1.0,
            first,
            last,
        }
    }

    fn fractal(kind: FractalKind, index: usize, high: f64, low: f64) -> Fractal {
        Fractal::new(kind, index, &standard(high, low, index, index))
    }

    #[test]
    fn detects_adjacent_containment() {
        let candles = vec![standard(12.0, 8.0, 0, 0), standard(11.0, 9.0, 1, 1)];
        assert_eq!(
            check_standard(&candles, 2),
            Err(InvariantViolation::AdjacentContainment { index: 0 })
        );
    }

    #[test]
    fn detects_coverage_gap_and_shortfall() {
        let gap = vec![standard(10.0, 9.0, 0, 0), standard(11.0, 10.0, 2, 2)];
        assert!(matches!(
            check_standard(&gap, 3),
            Err(InvariantViolation::CoverageGap { index: 1, .. })
        ));

        let short = vec![standard(10.0, 9.0, 0, 1)];
        assert_eq!(
            check_standard(&short, 3),
            Err(InvariantViolation::IncompleteCoverage {
                covered: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn detects_boundary_fractal() {
        let fractals = vec![fractal(FractalKind::Top, 4, 10.0, 9.0)];
        assert!(matches!(
            check_fractals(&fractals, 5),
            Err(InvariantViolation::BoundaryFractal { index: 4, .. })
        ));
    }

    #[test]
    fn detects_short_and_disconnected_strokes() {
        let b2 = fractal(FractalKind::Bottom, 2, 5.0, 4.0);
        let t4 = fractal(FractalKind::Top, 4, 9.0, 8.0);
        let short = vec![Stroke::new(b2, t4)];
        assert!(matches!(
            check_strokes(&short, 4),
            Err(InvariantViolation::TooShort { span: 2, .. })
        ));

        let t6 = fractal(FractalKind::Top, 6, 12.0, 11.0);
        let t7 = fractal(FractalKind::Top, 7, 12.5, 11.0);
        let b11 = fractal(FractalKind::Bottom, 11, 7.0, 6.0);
        let disconnected = vec![Stroke::new(b2, t6), Stroke::new(t7, b11)];
        assert_eq!(
            check_strokes(&disconnected, 4),
            Err(InvariantViolation::Disconnected { index: 0 })
        );
    }

    #[test]
    fn violation_messages_name_the_offender() {
        let err = InvariantViolation::AdjacentContainment { index: 3 };
        assert_eq!(err.to_string(), "standard candles 3 and 4 are in containment");
    }

    #[test]
    fn verify_checks_span_against_run_setting() {
        use crate::domain::Candle;
        use crate::engine::{run_pipeline, EngineConfig};
        use chrono::Duration;

        let base = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let candles: Vec<Candle> = [
            (10.0, 9.0),
            (8.0, 7.0),
            (5.0, 4.0),
            (7.0, 6.0),
            (9.0, 8.0),
            (11.0, 10.0),
            (13.0, 12.0),
            (12.0, 2.0),
            (12.5, 2.5),
            (14.0, 3.0),
            (6.0, 2.8),
            (5.5, 2.7),
        ]
        .iter()
        .enumerate()
        .map(|(i, &(high, low))| Candle {
            timestamp: base + Duration::minutes(i as i64),
            open: low,
            high,
            low,
            close: high,
            volume: 1.0,
        })
        .collect();

        let analysis = run_pipeline(&candles, &EngineConfig::default());
        assert_eq!(analysis.strokes.len(), 1);
        assert_eq!(analysis.strokes[0].span(), 7);
        assert_eq!(verify(&analysis, 4), Ok(()));
        assert_eq!(
            verify(&analysis, 8),
            Err(InvariantViolation::TooShort {
                index: 0,
                span: 7,
                min_span: 8
            })
        );
    }
}
