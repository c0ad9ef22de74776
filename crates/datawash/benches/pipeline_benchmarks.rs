//! Pipeline performance benchmarks.
//!
//! Measures ingestion, profiling and cleaning across dataset sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use datawash::transform::TransformEngine;
use datawash::{
    CleaningOperation, MissingStrategy, OutlierMethod, Parser, Profiler, SourceFormat,
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate synthetic CSV data with the specified number of rows and columns.
fn generate_csv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    // Header row
    for i in 0..cols {
        if i > 0 {
            data.push(',');
        }
        data.push_str(&format!("column_{}", i + 1));
    }
    data.push('\n');

    // Data rows, with some duplicates and gaps
    for row in 0..rows {
        let row = if row % 10 == 9 { row - 1 } else { row };
        for col in 0..cols {
            if col > 0 {
                data.push(',');
            }
            if (row + col) % 17 == 0 {
                continue;
            }
            match col % 5 {
                0 => data.push_str(&format!("ID_{:06}", row)),
                1 => data.push_str(&format!("{:.2}", row as f64 * 1.5)),
                2 => data.push_str(&format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1)),
                3 => data.push_str(if row % 2 == 0 { "true" } else { "false" }),
                4 => data.push_str(&format!(" Category_{} ", row % 10)),
                _ => unreachable!(),
            }
        }
        data.push('\n');
    }

    data
}

/// Benchmark parsing CSV files of various sizes.
fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 10);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let parser = Parser::new();
                    black_box(parser.parse_file(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

/// Benchmark profiling with varying row counts.
fn bench_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile");

    for rows in [100, 1_000, 10_000].iter() {
        let dataset = Parser::new()
            .parse_as(&generate_csv_data(*rows, 10), SourceFormat::Delimited)
            .unwrap();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            let profiler = Profiler::new();
            b.iter(|| black_box(profiler.profile(dataset)))
        });
    }

    group.finish();
}

/// Benchmark each cleaning operation on a 10,000-row dataset.
fn bench_cleaning_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleaning_steps");

    let dataset = Parser::new()
        .parse_as(&generate_csv_data(10_000, 10), SourceFormat::Delimited)
        .unwrap();
    let profile = Profiler::new().profile(&dataset);
    let engine = TransformEngine::new();

    let operations = [
        ("remove_duplicates", CleaningOperation::RemoveDuplicates),
        (
            "fill_typed",
            CleaningOperation::HandleMissingValues {
                strategy: MissingStrategy::FillTyped,
            },
        ),
        ("standardize_text", CleaningOperation::StandardizeText),
        (
            "detect_outliers",
            CleaningOperation::DetectOutliers {
                method: OutlierMethod::Iqr { multiplier: 1.5 },
            },
        ),
        ("convert_types", CleaningOperation::ConvertTypes),
    ];

    for (name, operation) in operations.iter() {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(engine.apply(operation, &dataset, &profile)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_csv, bench_profile, bench_cleaning_steps);
criterion_main!(benches);
