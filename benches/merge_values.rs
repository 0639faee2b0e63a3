//! Benchmarks for the values merge pipeline.
//!
//! These measure the deep merge on its own, inline assignment parsing, and a
//! full directory-plus-assignments merge from disk.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_yaml::{Mapping, Value};
use tempfile::TempDir;
use values_overlay::getter::Providers;
use values_overlay::merge::merge_maps;
use values_overlay::pipeline::ValueOptions;
use values_overlay::strvals;

/// A tree `depth` levels deep with `width` keys per level.
fn create_tree(depth: usize, width: usize, leaf: &str) -> Mapping {
    let mut map = Mapping::new();
    for i in 0..width {
        let key = Value::String(format!("key{}", i));
        let value = if depth == 0 {
            Value::String(format!("{}-{}", leaf, i))
        } else {
            Value::Mapping(create_tree(depth - 1, width, leaf))
        };
        map.insert(key, value);
    }
    map
}

/// A values directory holding `num_files` documents.
fn create_values_dir(num_files: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let values_dir = dir.path().join("values.d");
    std::fs::create_dir_all(&values_dir).unwrap();
    for i in 0..num_files {
        let content = format!(
            "service{}:\n  replicas: {}\n  image:\n    tag: \"{}.0\"\nshared:\n  owner: file{}\n",
            i, i, i, i
        );
        std::fs::write(values_dir.join(format!("{:04}.yaml", i)), content).unwrap();
    }
    dir
}

fn bench_deep_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_merge");

    for (depth, width) in [(2, 10), (4, 5), (6, 3)] {
        let base = create_tree(depth, width, "base");
        let overlay = create_tree(depth, width, "overlay");
        group.bench_with_input(
            BenchmarkId::new("depth_width", format!("{}x{}", depth, width)),
            &(base, overlay),
            |b, (base, overlay)| b.iter(|| merge_maps(black_box(base), black_box(overlay))),
        );
    }

    group.finish();
}

fn bench_assignments(c: &mut Criterion) {
    let mut group = c.benchmark_group("assignments");

    let assignments: String = (0..50)
        .map(|i| format!("services.svc{}.ports[{}]=80{}", i, i % 4, i))
        .collect::<Vec<_>>()
        .join(",");
    group.bench_function("set_50_entries", |b| {
        b.iter(|| strvals::parse(black_box(&assignments)).unwrap())
    });

    group.bench_function("set_json", |b| {
        b.iter(|| {
            let mut values = Mapping::new();
            strvals::parse_json(black_box(r#"a.b=[1,2,{"c":"d"}],e={"f":true}"#), &mut values)
                .unwrap();
            values
        })
    });

    group.finish();
}

fn bench_merge_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_values");
    let providers = Providers::new();

    for count in [10, 100] {
        let dir = create_values_dir(count);
        let options = ValueOptions {
            values_directories: vec![dir.path().join("values.d").to_string_lossy().into_owned()],
            values: vec!["shared.owner=cli,service0.replicas=9".to_string()],
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("files", count), &options, |b, options| {
            b.iter(|| options.merge_values(&providers).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_deep_merge, bench_assignments, bench_merge_values);
criterion_main!(benches);
