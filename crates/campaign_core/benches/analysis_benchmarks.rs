//! Criterion benchmarks for campaign_core analyses
//!
//! Run with: cargo bench -p campaign_core

use campaign_core::analysis::{
    analyze, analyze_sensitivity, correlate, local_stability, surrogate_curve,
};
use campaign_core::config::{AnalysisConfig, Thresholds};
use campaign_core::model::{IterationRecord, IterationTable, Parameter, Target};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn create_campaign(iterations: usize) -> IterationTable {
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0_f64, 1.0).unwrap();

    let records = (0..iterations)
        .map(|i| {
            let mut parameters = [0.0; Parameter::COUNT];
            for value in &mut parameters {
                *value = rng.random_range(1.0..100.0);
            }
            let yield_ = 50.0 + 0.3 * parameters[2] + noise.sample(&mut rng);
            let impurity = 1.0 + 0.02 * parameters[0] + noise.sample(&mut rng).abs();
            IterationRecord::new(i as u32 + 1, parameters, [yield_, impurity, impurity / yield_])
        })
        .collect();
    IterationTable::new(records).unwrap()
}

fn bench_correlation(c: &mut Criterion) {
    let table = create_campaign(300);
    c.bench_function("correlate_300", |b| {
        b.iter(|| correlate(black_box(table.view()), black_box(&Target::ALL)))
    });
}

fn bench_sensitivity(c: &mut Criterion) {
    let table = create_campaign(300);
    let view = table.view();
    let ranges = view.ranges();
    c.bench_function("sensitivity_300", |b| {
        b.iter(|| {
            analyze_sensitivity(
                black_box(view),
                Target::Yield,
                black_box(&ranges),
                Thresholds::default(),
            )
        })
    });
}

fn bench_local_stability(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_stability");

    for iterations in [100, 300, 1000].iter() {
        let table = create_campaign(*iterations);
        group.bench_with_input(
            BenchmarkId::new("iterations", iterations),
            iterations,
            |b, _| {
                b.iter(|| {
                    local_stability(
                        black_box(table.view()),
                        Target::Yield,
                        Parameter::T1Celsius,
                        Parameter::T2Celsius,
                    )
                })
            },
        );
    }

    group.finish();
}

fn bench_surrogate(c: &mut Criterion) {
    let table = create_campaign(300);
    c.bench_function("surrogate_300x101", |b| {
        b.iter(|| surrogate_curve(black_box(table.view()), Target::Yield, Parameter::T2Celsius, 101))
    });
}

fn bench_full_report(c: &mut Criterion) {
    let table = create_campaign(300);
    let config = AnalysisConfig::for_target(Target::Impurity)
        .with_parameter(Parameter::T1Celsius)
        .with_pair(Parameter::T1Celsius, Parameter::T1Minutes);
    c.bench_function("analyze_300", |b| {
        b.iter(|| analyze(black_box(&table), black_box(&config)))
    });
}

criterion_group!(
    benches,
    bench_correlation,
    bench_sensitivity,
    bench_local_stability,
    bench_surrogate,
    bench_full_report,
);
criterion_main!(benches);
