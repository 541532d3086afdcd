//! Criterion benchmarks for cmd_helper formatting and routing

use cmd_helper::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::io;

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_console_formatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("console_formatter");
    group.throughput(Throughput::Elements(1));

    let formatter = ConsoleFormatter::new();
    let root = LogRecord::new(LogLevel::WARNING, "disk almost full");
    let named = LogRecord::new(LogLevel::INFO, "connection opened").with_source("net::pool");

    group.bench_function("root", |b| {
        b.iter(|| formatter.render(black_box(&root)));
    });

    group.bench_function("named_source", |b| {
        b.iter(|| formatter.render(black_box(&named)));
    });

    group.finish();
}

fn bench_file_formatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_formatter");
    group.throughput(Throughput::Elements(1));

    let record = LogRecord::new(LogLevel::ERROR, "backup failed");
    let chunk = LogRecord::stdout("first line\nsecond line\nthird");

    group.bench_function("plain", |b| {
        let mut formatter = FileFormatter::new();
        b.iter(|| formatter.format(black_box(&record)));
    });

    group.bench_function("timestamped", |b| {
        let mut formatter = FileFormatter::with_timestamp(TimestampFormat::asctime(" "));
        b.iter(|| formatter.format(black_box(&record)));
    });

    group.bench_function("timestamped_multiline_stdout", |b| {
        let mut formatter = FileFormatter::with_timestamp(TimestampFormat::asctime(" "));
        b.iter(|| formatter.format(black_box(&chunk)));
    });

    group.finish();
}

// ============================================================================
// Routing Benchmarks
// ============================================================================

fn bench_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::new();
    logger.add_sink(
        StreamSink::new("sink", io::sink()),
        SinkConfig::new(LogLevel::STDOUT).with_filter(LevelFilter::pass_only([LogLevel::STDOUT])),
    );
    logger.add_sink(
        StreamSink::new("sink", io::sink()),
        SinkConfig::new(LogLevel::WARNING),
    );

    group.bench_function("accepted", |b| {
        b.iter(|| logger.warning(black_box("routed to one sink")));
    });

    group.bench_function("rejected", |b| {
        b.iter(|| logger.debug(black_box("below every threshold")));
    });

    group.bench_function("stdout_writer", |b| {
        b.iter(|| {
            use std::io::Write;
            let mut out = logger.stdout_writer();
            out.write_all(black_box(b"partial output")).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_console_formatter,
    bench_file_formatter,
    bench_routing
);
criterion_main!(benches);
