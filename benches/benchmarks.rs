use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use json_vault::{json, Database, RootKind, Value};
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;

fn bench_path(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("json_vault_bench_{}_{}.json", name, size))
}

fn fresh(path: &PathBuf, root: RootKind) -> Database {
    let _ = std::fs::remove_file(path);
    Database::builder(path).root(root).load().unwrap()
}

fn record(i: usize) -> Value {
    json!({"id": i, "name": format!("user{i}"), "tags": ["a", "b"], "score": i as f64 / 3.0})
}

fn bench_dict_insert_get_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_insert_get_pop");
    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("object", size), &size, |b, &size| {
            let path = bench_path("dict", size);
            let db = fresh(&path, RootKind::Object);
            let dict = db.dict().unwrap();
            b.iter(|| {
                for i in 0..size {
                    dict.insert(&format!("k{i}"), &(i as i64)).unwrap();
                }
                for i in 0..size {
                    black_box(dict.get_or(&format!("k{i}"), Value::Null).unwrap());
                }
                for i in 0..size {
                    dict.pop(&format!("k{i}"), Value::Null).unwrap();
                }
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_list_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_append");
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &size| {
            let path = bench_path("append", size);
            let db = fresh(&path, RootKind::Array);
            let list = db.list().unwrap();
            let batch: Vec<Value> = (0..size).map(record).collect();
            b.iter(|| {
                for v in &batch {
                    list.append(v).unwrap();
                }
                db.clear().unwrap();
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &size| {
            let path = bench_path("save", size);
            let db = fresh(&path, RootKind::Array);
            db.list().unwrap().extend((0..size).map(record)).unwrap();
            b.iter(|| db.save().unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.sample_size(50);
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &size| {
            let path = bench_path("load", size);
            let db = fresh(&path, RootKind::Array);
            db.list().unwrap().extend((0..size).map(record)).unwrap();
            db.save().unwrap();
            b.iter(|| black_box(Database::builder(&path).load().unwrap()));
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("numbers", size), &size, |b, &size| {
            let path = bench_path("sort", size);
            let db = fresh(&path, RootKind::Array);
            let list = db.list().unwrap();
            list.extend((0..size).rev()).unwrap();
            b.iter(|| {
                list.sort().unwrap();
                list.reverse().unwrap();
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

criterion_group!(
    benches,
    bench_dict_insert_get_pop,
    bench_list_append,
    bench_save,
    bench_load,
    bench_sort,
);
criterion_main!(benches);
