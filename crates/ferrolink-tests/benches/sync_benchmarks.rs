//! Benchmarks for the FerroLink sync pipeline
//!
//! Covers walking, planning against a loaded history, and full runs where
//! every file is either new or already recorded.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferrolink_sync::{HistorySet, HistoryStore, LinkPlanner, SyncEngine, TreeWalker};
use ferrolink_tests::test_utils::{CommonTreeSizes, TestTree};
use ferrolink_types::WalkedFile;
use std::collections::BTreeSet;
use std::hint::black_box;
use std::path::{Path, PathBuf};

/// Benchmark tree enumeration
fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    for (name, files, dirs_per_level, depth) in CommonTreeSizes::all() {
        let tree = TestTree::new();
        tree.populate("src", files, dirs_per_level, depth);
        group.throughput(Throughput::Elements(files as u64));

        group.bench_with_input(BenchmarkId::new("tree_walker", name), &tree, |b, tree| {
            b.iter(|| {
                let walker = TreeWalker::new(tree.path("src")).unwrap();
                black_box(walker.walk().filter_map(Result::ok).count())
            });
        });
    }

    group.finish();
}

/// Benchmark planning with half of the files already recorded
fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    for count in [1_000usize, 10_000, 100_000] {
        let files: Vec<WalkedFile> = (0..count)
            .map(|index| {
                let relative = PathBuf::from(format!("d{}/file{}.dat", index % 64, index));
                WalkedFile {
                    absolute_source_path: Path::new("/src").join(&relative),
                    relative_path: relative,
                }
            })
            .collect();
        let history: HistorySet = files
            .iter()
            .step_by(2)
            .map(|file| file.absolute_source_path.clone())
            .collect();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("planner", count), &files, |b, files| {
            let planner = LinkPlanner::new(Path::new("/dst"), &history);
            b.iter(|| {
                for file in files {
                    black_box(planner.plan(file));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark history loading
fn bench_history_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_load");

    for count in [1_000usize, 100_000] {
        let tree = TestTree::new();
        let store = HistoryStore::new(tree.history_path());
        let entries: BTreeSet<PathBuf> = (0..count)
            .map(|index| PathBuf::from(format!("/data/source/d{}/file{}.dat", index % 64, index)))
            .collect();
        store.append(&entries).unwrap();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("load", count), &store, |b, store| {
            b.iter(|| black_box(store.load().unwrap().len()));
        });
    }

    group.finish();
}

/// Benchmark a run in which every file is already recorded
fn bench_rerun(c: &mut Criterion) {
    let mut group = c.benchmark_group("rerun");
    group.sample_size(20);

    for (name, files, dirs_per_level, depth) in CommonTreeSizes::all() {
        let tree = TestTree::new();
        tree.populate("src", files, dirs_per_level, depth);
        let pairs = [tree.pair("src", "dst")];
        SyncEngine::new().run(&pairs, tree.history_path()).unwrap();
        group.throughput(Throughput::Elements(files as u64));

        group.bench_function(BenchmarkId::new("all_skipped", name), |b| {
            b.iter(|| {
                let summary = SyncEngine::new().run(&pairs, tree.history_path()).unwrap();
                black_box(summary.skipped())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_walk, bench_plan, bench_history_load, bench_rerun);
criterion_main!(benches);
