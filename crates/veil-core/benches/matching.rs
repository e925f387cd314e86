//! Benchmarks for the blocking predicate and the cleaner.
//!
//! Run with: cargo bench -p veil-core

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use veil_core::{Engine, EngineConfig, PageContext, PathRule, PatternStore};

fn engine_with_patterns(count: usize) -> Engine {
    let mut patterns = PatternStore::new();
    for i in 0..count {
        patterns.blocked_hosts.push(format!("tracker{i}.example"));
        if i % 4 == 0 {
            patterns.blocked_rules.push(PathRule::with_path(format!("cdn{i}.example"), "/collect"));
        }
    }
    patterns.allowed_hosts.push("*.trusted.example".to_string());

    let config = EngineConfig {
        allow_same_origin: true,
        patterns,
        ..EngineConfig::default()
    };
    let page = PageContext::from_location("https://news.example/article").unwrap();
    Engine::new(config, page)
}

fn bench_should_block(c: &mut Criterion) {
    let engine = engine_with_patterns(500);
    let urls = [
        "https://tracker250.example/pixel.gif",
        "https://cdn8.example/collect?id=1",
        "https://static.news.example/app.js",
        "https://a.trusted.example/lib.js",
        "/relative/asset.png",
        "data:image/png;base64,AAAA",
    ];

    let mut group = c.benchmark_group("should_block");
    group.throughput(Throughput::Elements(urls.len() as u64));
    group.bench_function("mixed_500_patterns", |b| {
        b.iter(|| {
            for url in &urls {
                black_box(engine.should_block(Some(black_box(url))));
            }
        })
    });
    group.finish();
}

fn bench_clean_href(c: &mut Criterion) {
    let engine = Engine::default();
    let cases = [
        ("plain", "https://example.com/a/b?id=1"),
        ("utm", "https://example.com/a?utm_source=x&utm_medium=y&id=1&fbclid=z"),
        ("redirector", "https://t.co/?url=https%3A%2F%2Fdest.example%2Fpage%3Futm_source%3Dx"),
        ("video", "https://youtu.be/VID123?si=abc&t=42"),
        ("marketplace", "https://www.amazon.com/Slug/dp/ABCDEF1234/ref=sr_1_1?keywords=x&qid=1"),
    ];

    let mut group = c.benchmark_group("clean_href");
    for (name, url) in cases {
        group.bench_function(name, |b| b.iter(|| engine.clean_href(black_box(url), None)));
    }
    group.finish();
}

criterion_group!(benches, bench_should_block, bench_clean_href);
criterion_main!(benches);
