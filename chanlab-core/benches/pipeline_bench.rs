//! Criterion benchmarks for the pipeline.
//!
//! Benchmarks:
//! 1. Inclusion merge alone
//! 2. Fractal detection over merged candles
//! 3. Full pipeline (merge + fractals + strokes) at several series lengths

use chanlab_core::pipeline::{detect_fractals, merge_inclusions};
use chanlab_core::{run_pipeline, Candle, EngineConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_candles(n: usize) -> Vec<Candle> {
    let base = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 4000.0 + (t * 0.05).sin() * 80.0 + (t * 0.37).sin() * 12.0;
            let open = close - (t * 0.9).cos() * 3.0;
            let high = open.max(close) + 1.5 + (t * 1.3).sin().abs() * 2.0;
            let low = open.min(close) - 1.5 - (t * 0.7).cos().abs() * 2.0;
            Candle {
                timestamp: base + chrono::Duration::minutes(15 * i as i64),
                open,
                high,
                low,
                close,
                volume: 150_000.0 + (i % 500) as f64,
            }
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_merge(c: &mut Criterion) {
    let candles = make_candles(10_000);
    c.bench_function("merge_inclusions_10k", |b| {
        b.iter(|| merge_inclusions(black_box(&candles)))
    });
}

fn bench_fractals(c: &mut Criterion) {
    let standard = merge_inclusions(&make_candles(10_000));
    c.bench_function("detect_fractals_10k", |b| {
        b.iter(|| detect_fractals(black_box(&standard)))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_pipeline");
    let config = EngineConfig::default();
    for n in [1_000usize, 10_000, 100_000] {
        let candles = make_candles(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &candles, |b, candles| {
            b.iter(|| run_pipeline(black_box(candles), &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_merge, bench_fractals, bench_pipeline);
criterion_main!(benches);
