//! Criterion benchmarks for rust_multi_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_multi_logger::formatter::{CompiledTemplate, DEFAULT_CONSOLE_FORMAT, DEFAULT_FILE_FORMAT};
use rust_multi_logger::prelude::*;
use std::io::{self, Write};
use std::sync::Arc;

fn sink_logger(level: Level, format: &str) -> Logger {
    let formatter: Arc<dyn Formatter> = Arc::new(TemplateFormatter::new(false, &[format]));
    let logger = Logger::with_hooks("bench", [Hook::console_with("", level, Some(formatter))]);
    logger.set_all_outputs(io::sink());
    logger
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("new", |b| {
        b.iter(|| black_box(Logger::new("bench")));
    });

    let logger = sink_logger(Level::INFO, DEFAULT_FILE_FORMAT);
    group.bench_function("child", |b| {
        b.iter(|| black_box(logger.child("child")));
    });

    group.bench_function("with_field", |b| {
        b.iter(|| black_box(logger.with_field("request", 42)));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(Level::INFO, DEFAULT_FILE_FORMAT);

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    let with_fields = logger.with_field("user", "alice").with_field("attempt", 3);
    let fields_logger = sink_logger(Level::INFO, "%time% %level:upper% %message% %fields%");
    let fields_logger = fields_logger.with_fields(with_fields.fields());
    group.bench_function("info_with_fields", |b| {
        b.iter(|| fields_logger.info(black_box("Info message")));
    });

    logger.set_report_caller(true);
    group.bench_function("info_with_caller", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.finish();
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    group.throughput(Throughput::Elements(1));

    let entry = LogEntry::new(Level::WARN, "Formatted message")
        .with_module("bench")
        .with_field("user", "alice");

    group.bench_function("compile_console_template", |b| {
        b.iter(|| CompiledTemplate::compile(black_box(DEFAULT_CONSOLE_FORMAT), true).unwrap());
    });

    let template = TemplateFormatter::new(true, &[DEFAULT_CONSOLE_FORMAT]);
    group.bench_function("template_colored", |b| {
        b.iter(|| template.format(black_box(&entry)).unwrap());
    });

    let plain = TemplateFormatter::new(false, &[DEFAULT_FILE_FORMAT]);
    group.bench_function("template_plain", |b| {
        b.iter(|| plain.format(black_box(&entry)).unwrap());
    });

    let json = JsonFormatter::new();
    group.bench_function("json", |b| {
        b.iter(|| json.format(black_box(&entry)).unwrap());
    });

    group.finish();
}

// ============================================================================
// Stream Catcher Benchmarks
// ============================================================================

fn bench_catcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("catcher");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(Level::TRACE, "%level% %message%");

    group.bench_function("plain_line", |b| {
        b.iter(|| {
            let mut sink = &logger;
            sink.write_all(black_box(b"nothing special here\n")).unwrap();
        });
    });

    group.bench_function("tagged_line", |b| {
        b.iter(|| {
            let mut sink = &logger;
            sink.write_all(black_box(b"something [warning] happened\n")).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_logging,
    bench_formatters,
    bench_catcher
);
criterion_main!(benches);
