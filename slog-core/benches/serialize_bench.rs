#[macro_use]
extern crate criterion;

use std::sync::Arc;

use criterion::Criterion;

use slog_core::sink::NullSink;
use slog_core::{CallSite, FieldArena, Level, LocalArena, Logger};

fn bench_log_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_line_throughput");
    let logger = Logger::new(Arc::new(NullSink));
    let site = CallSite::new("bench.rs", 1, "bench_log_line");

    for fields in [1usize, 8, 64] {
        group.throughput(criterion::Throughput::Elements(1)); // Lines per second
        group.bench_function(format!("reused_arena_{}_fields", fields), |b| {
            let mut arena = FieldArena::new();
            b.iter(|| {
                {
                    let f = arena.builder();
                    logger
                        .log(
                            &arena,
                            site,
                            Level::Info,
                            "benchmark line",
                            (0..fields).map(|i| f.integer("n", i as i64)),
                        )
                        .unwrap();
                }
                arena.reset();
            });
        });
        group.bench_function(format!("local_arena_{}_fields", fields), |b| {
            b.iter(|| {
                let arena = LocalArena::acquire();
                let f = arena.builder();
                logger
                    .log(
                        &arena,
                        site,
                        Level::Info,
                        "benchmark line",
                        (0..fields).map(|_| f.string("s", "value with \"quotes\"\n")),
                    )
                    .unwrap();
            });
        });
    }
    group.finish();
}

fn bench_nested_object(c: &mut Criterion) {
    let logger = Logger::new(Arc::new(NullSink));
    let site = CallSite::new("bench.rs", 2, "bench_nested_object");
    let mut arena = FieldArena::new();

    c.bench_function("nested_object_depth_16", |b| {
        b.iter(|| {
            {
                let f = arena.builder();
                let mut field = f.float("leaf", 1.5);
                for _ in 0..16 {
                    field = f.object("o", [field, f.bool("b", true)]);
                }
                logger
                    .log(&arena, site, Level::Debug, "nested", [field])
                    .unwrap();
            }
            arena.reset();
        });
    });
}

criterion_group!(benches, bench_log_line, bench_nested_object);
criterion_main!(benches);
