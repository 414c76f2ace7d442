use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pkgwire::packages::patch::{insert_after_anchor, substitute, MatchMode};

const ANCHOR: &str = "LOCAL_SRC_FILES := $(LOCAL_SRC_FILES)";

/// A makefile with `lines` source entries before the anchor
fn makefile(lines: usize) -> String {
    let mut mk = String::from("LOCAL_PATH := $(call my-dir)\ninclude $(CLEAR_VARS)\n");
    for i in 0..lines {
        mk.push_str(&format!("LOCAL_SRC_FILES += ../../Classes/Generated{}.cpp\n", i));
    }
    mk.push_str(ANCHOR);
    mk.push_str("\ninclude $(BUILD_SHARED_LIBRARY)\n");
    mk
}

/// Benchmark anchor insertion on growing descriptors
fn bench_insert_after_anchor(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_after_anchor");

    for size in [10, 1_000, 50_000] {
        let mk = makefile(size);
        group.bench_with_input(BenchmarkId::new("insert", size), &mk, |b, mk| {
            b.iter(|| insert_after_anchor(black_box(mk), ANCHOR, "LOCAL_SRC_FILES += Foo.cpp"))
        });

        // Second run hits the presence check
        let patched = match insert_after_anchor(&mk, ANCHOR, "LOCAL_SRC_FILES += Foo.cpp") {
            Ok(pkgwire::packages::patch::PatchOutcome::Changed(s)) => s,
            _ => mk.clone(),
        };
        group.bench_with_input(BenchmarkId::new("already_present", size), &patched, |b, mk| {
            b.iter(|| insert_after_anchor(black_box(mk), ANCHOR, "LOCAL_SRC_FILES += Foo.cpp"))
        });
    }

    group.finish();
}

/// Benchmark literal vs regex substitution
fn bench_substitute(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitute");
    let mk = makefile(1_000);

    group.bench_function("literal", |b| {
        b.iter(|| {
            substitute(
                black_box(&mk),
                "include $(BUILD_SHARED_LIBRARY)",
                "include $(BUILD_STATIC_LIBRARY)",
                MatchMode::Literal,
            )
        })
    });

    group.bench_function("regex", |b| {
        b.iter(|| {
            substitute(
                black_box(&mk),
                r"Generated(\d+)\.cpp",
                "Renamed${1}.cpp",
                MatchMode::Regex,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_insert_after_anchor, bench_substitute);
criterion_main!(benches);
