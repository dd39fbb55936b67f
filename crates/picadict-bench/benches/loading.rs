//! Catalog construction benchmarks: JSON loading and registry freezing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use picadict_bench::{synthetic_catalog, Scale};
use picadict_catalogs::load_str;

const AUTHORITY_JSON: &str = include_str!("../../picadict-catalogs/data/authority.json");
const BIBLIOGRAPHIC_JSON: &str = include_str!("../../picadict-catalogs/data/bibliographic.json");

fn bench_embedded_catalogs(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading/embedded");

    group.bench_function("authority", |b| {
        b.iter(|| black_box(load_str(AUTHORITY_JSON, &[]).unwrap()));
    });

    group.bench_function("bibliographic", |b| {
        let authority = load_str(AUTHORITY_JSON, &[]).unwrap();
        b.iter(|| black_box(load_str(BIBLIOGRAPHIC_JSON, &[&authority]).unwrap()));
    });

    group.finish();
}

fn bench_synthetic_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading/synthetic");
    group.sample_size(20);

    for scale in [Scale::Small, Scale::Medium] {
        group.bench_with_input(
            BenchmarkId::new("build", scale.count()),
            &scale,
            |b, &scale| {
                b.iter(|| black_box(synthetic_catalog(scale)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_embedded_catalogs, bench_synthetic_build);
criterion_main!(benches);
