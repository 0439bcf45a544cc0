//! Criterion benchmarks for QuantLens hot paths.
//!
//! Benchmarks:
//! 1. Single indicator groups (MA, RSI, KDJ)
//! 2. Full pipeline, sequential vs rayon
//! 3. Export of the last rows to JSON

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use quantlens_core::export::to_json_string;
use quantlens_core::indicator::Indicator;
use quantlens_core::indicators::{Kdj, MovingAverage, Rsi};
use quantlens_core::synthetic::synthetic_series;
use quantlens_core::IndicatorPipeline;

const BAR_COUNTS: [usize; 3] = [252, 1260, 5040];

// ── 1. Single Groups ─────────────────────────────────────────────────

fn bench_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_group");

    for &bar_count in &BAR_COUNTS {
        let bars = synthetic_series("BENCH", bar_count);

        let ma = MovingAverage::close(&[5, 10, 20, 60]).unwrap();
        group.bench_with_input(BenchmarkId::new("ma_4", bar_count), &bar_count, |b, _| {
            b.iter(|| ma.compute(black_box(&bars)));
        });

        let rsi = Rsi::default();
        group.bench_with_input(BenchmarkId::new("rsi_14", bar_count), &bar_count, |b, _| {
            b.iter(|| rsi.compute(black_box(&bars)));
        });

        let kdj = Kdj::default();
        group.bench_with_input(BenchmarkId::new("kdj_9_3_3", bar_count), &bar_count, |b, _| {
            b.iter(|| kdj.compute(black_box(&bars)));
        });
    }

    group.finish();
}

// ── 2. Full Pipeline ─────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let pipeline = IndicatorPipeline::default();

    for &bar_count in &BAR_COUNTS {
        let bars = synthetic_series("BENCH", bar_count);

        group.bench_with_input(
            BenchmarkId::new("sequential", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| pipeline.run(black_box(&bars)));
            },
        );
        group.bench_with_input(BenchmarkId::new("parallel", bar_count), &bar_count, |b, _| {
            b.iter(|| pipeline.run_parallel(black_box(&bars)));
        });
    }

    group.finish();
}

// ── 3. Export ────────────────────────────────────────────────────────

fn bench_export(c: &mut Criterion) {
    let bars = synthetic_series("BENCH", 1260);
    let series = IndicatorPipeline::default().run(&bars).unwrap();

    c.bench_function("export_tail_5_json", |b| {
        b.iter(|| to_json_string(black_box(&series.tail(5)), false));
    });
}

criterion_group!(benches, bench_groups, bench_pipeline, bench_export);
criterion_main!(benches);
