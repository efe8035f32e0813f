//! Criterion benchmarks for the framing and parse hot path.
//!
//! Every byte a client sends passes through `FrameBuffer::drain_messages`
//! and `Request::parse` on the editor's UI thread, once per scheduler tick,
//! so this path must stay cheap.
//!
//! Run with:
//! ```bash
//! cargo bench --package scenebridge-core --bench framing_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scenebridge_core::protocol::framing::FrameBuffer;
use scenebridge_core::protocol::messages::Request;

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn small_request() -> String {
    r#"{"id":"1","method":"get_scene_tree","params":{"max_depth":5}}"#.to_string()
}

fn large_request() -> String {
    // A plan with a few hundred steps, the largest realistic single request.
    let steps: Vec<String> = (0..300)
        .map(|i| format!(r#"{{"description":"step {i}","status":"pending"}}"#))
        .collect();
    format!(
        r#"{{"id":"42","method":"set_current_plan","params":{{"name":"big","steps":[{}]}}}}"#,
        steps.join(",")
    )
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_drain_coalesced(c: &mut Criterion) {
    let mut group = c.benchmark_group("framing/drain");
    for count in [1usize, 10, 100] {
        let chunk = format!("{}\n", small_request()).repeat(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &chunk, |b, chunk| {
            b.iter(|| {
                let mut fb = FrameBuffer::new();
                fb.push(black_box(chunk));
                black_box(fb.drain_messages())
            });
        });
    }
    group.finish();
}

fn bench_drain_fragmented(c: &mut Criterion) {
    // One message delivered in 8-byte reads, the worst realistic TCP case.
    let message = format!("{}\n", small_request());
    let chunks: Vec<&str> = message
        .as_bytes()
        .chunks(8)
        .map(|b| std::str::from_utf8(b).unwrap())
        .collect();

    c.bench_function("framing/fragmented_8b_reads", |b| {
        b.iter(|| {
            let mut fb = FrameBuffer::new();
            let mut total = 0;
            for chunk in &chunks {
                fb.push(black_box(chunk));
                total += fb.drain_messages().len();
            }
            black_box(total)
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    let small = small_request();
    let large = large_request();

    let mut group = c.benchmark_group("parse");
    group.bench_function("small_request", |b| {
        b.iter(|| Request::parse(black_box(&small)))
    });
    group.bench_function("large_plan_request", |b| {
        b.iter(|| Request::parse(black_box(&large)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_drain_coalesced,
    bench_drain_fragmented,
    bench_parse
);
criterion_main!(benches);
