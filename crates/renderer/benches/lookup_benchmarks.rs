//! Benchmarks for palette resampling, lookup and per-feature styling.
//!
//! Run with: cargo bench --package road-renderer --bench lookup_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use road_renderer::colorscale::ColorScale;
use road_renderer::policy::{FeatureAttributes, StylePolicy};
use road_renderer::zone_blend::resolution_to_weights;
use style_common::PaletteDefinition;

/// Random overtaking distances, with a few undefined values mixed in.
fn generate_distances(count: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            if rng.gen_bool(0.05) {
                f64::NAN
            } else {
                rng.gen_range(-0.5..3.0)
            }
        })
        .collect()
}

fn generate_features(count: usize) -> Vec<FeatureAttributes> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let mean = rng.gen_range(0.0..3.0);
            FeatureAttributes {
                valid: rng.gen_bool(0.9),
                zone: Some(if rng.gen_bool(0.5) { "urban" } else { "rural" }.to_string()),
                distance_overtaker_mean: Some(mean),
                ..Default::default()
            }
        })
        .collect()
}

// =============================================================================
// RESAMPLE BENCHMARKS
// =============================================================================

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    let def = PaletteDefinition::urban_distance();

    for n in [16usize, 256, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("urban", n), &n, |b, &n| {
            b.iter(|| {
                ColorScale::with_bounds(black_box(&def.stops), n, [128], None, None)
            });
        });
    }

    group.finish();
}

// =============================================================================
// LOOKUP BENCHMARKS
// =============================================================================

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let scale = ColorScale::from_definition(&PaletteDefinition::urban_distance())
        .expect("built-in palette");

    for count in [1_000usize, 100_000] {
        let values = generate_distances(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("single", count), &values, |b, values| {
            b.iter(|| {
                for &v in values {
                    black_box(scale.lookup(v));
                }
            });
        });
    }

    group.bench_function("zone_weights", |b| {
        b.iter(|| {
            for i in 0..1000 {
                black_box(resolution_to_weights(black_box(i as f64 * 0.05)));
            }
        });
    });

    group.finish();
}

// =============================================================================
// STYLE POLICY BENCHMARKS
// =============================================================================

fn bench_style(c: &mut Criterion) {
    let mut group = c.benchmark_group("style");
    let policy = StylePolicy::mean_distance().expect("built-in policy");

    for count in [1_000usize, 50_000] {
        let features = generate_features(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", count), &features, |b, features| {
            b.iter(|| {
                features
                    .iter()
                    .map(|f| policy.style(f, black_box(12.0), false))
                    .collect::<Vec<_>>()
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", count), &features, |b, features| {
            b.iter(|| policy.style_all(black_box(features), 12.0));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resample, bench_lookup, bench_style);
criterion_main!(benches);
