//! Benchmarks for the light and moderate reduction pipelines.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use kreuzberg_reduction::{ReductionConfig, ReductionMode, StopwordsManager, batch_reduce_tokens, reduce_tokens};
use std::hint::black_box;

fn generate_prose(bytes: usize) -> String {
    let sentence = "The quick brown fox jumps over the lazy dog!!! Is this   the end??? Not yet... ";
    sentence.repeat(bytes / sentence.len() + 1)
}

fn generate_markdown(sections: usize) -> String {
    let section = "# Section heading\n\nThe paragraph is about the   topic of the day.\n\n\n\n- first item\n- second item\n\n| col | col |\n|-----|-----|\n\n```\nlet the = 1;\n```\n\n";
    section.repeat(sections)
}

fn benchmark_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_tokens");
    let manager = StopwordsManager::new();
    let text = generate_prose(100 * 1024);

    group.throughput(Throughput::Bytes(text.len() as u64));
    for mode in [ReductionMode::Light, ReductionMode::Moderate] {
        let config = ReductionConfig::new(mode);
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| reduce_tokens(black_box(&text), &config, Some("en"), &manager).unwrap());
        });
    }

    group.finish();
}

fn benchmark_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_tokens_markdown");
    let manager = StopwordsManager::new();
    let text = generate_markdown(500);
    let config = ReductionConfig::new(ReductionMode::Moderate).with_preserve_markdown(true);

    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("moderate", |b| {
        b.iter(|| reduce_tokens(black_box(&text), &config, Some("en"), &manager).unwrap());
    });

    group.finish();
}

fn benchmark_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_tokens_streaming");
    group.sample_size(10);

    let manager = StopwordsManager::new();
    let text = generate_prose(2 * 1024 * 1024);
    let config = ReductionConfig::new(ReductionMode::Moderate);

    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("2MB", |b| {
        b.iter(|| reduce_tokens(black_box(&text), &config, Some("en"), &manager).unwrap());
    });

    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let manager = StopwordsManager::new();
    let config = ReductionConfig::new(ReductionMode::Moderate);
    let documents: Vec<String> = (0..64).map(|_| generate_prose(8 * 1024)).collect();
    let texts: Vec<&str> = documents.iter().map(String::as_str).collect();

    c.bench_function("batch_reduce_tokens_64", |b| {
        b.iter(|| batch_reduce_tokens(black_box(&texts), &config, Some("en"), &manager).unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_modes,
    benchmark_markdown,
    benchmark_streaming,
    benchmark_batch
);
criterion_main!(benches);
