//! Classification and schema building performance benchmarks.
//!
//! Measures column profiling, Data Vault model construction and the
//! end-to-end pipeline including CSV parsing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tempfile::NamedTempFile;
use vaultsmith::{
    ClassifierConfig, ColumnClassifier, DataTable, Dataset, MockProvider, Parser, SchemaBuilder,
    Vaultsmith,
};

/// Generate an orders CSV with keys, codes, money, dates and contact data.
fn generate_orders_data(rows: usize) -> String {
    let mut data = String::new();
    data.push_str("order_id,customer_id,status,amount,order_date,contact_email,notes\n");

    let statuses = ["NEW", "PAID", "SHIP", "DLVD", "CNCL"];
    let notes = ["gift wrap", "leave at door", "", "call first", "NA"];

    for row in 0..rows {
        data.push_str(&format!(
            "ORD_{:08},CUST_{:06},{},{}.{:02},2024-{:02}-{:02},user{}@example.com,{}\n",
            row + 1,
            (row % 500) + 1,
            statuses[row % statuses.len()],
            (row * 7) % 1000,
            row % 100,
            (row % 12) + 1,
            (row % 28) + 1,
            row % 250,
            notes[row % notes.len()],
        ));
    }

    data
}

fn generate_customers_data(rows: usize) -> String {
    let mut data = String::new();
    data.push_str("customer_id,full_name,region,signup_year\n");

    let regions = ["north", "south", "east", "west"];
    for row in 0..rows {
        data.push_str(&format!(
            "CUST_{:06},Customer {},{},{}\n",
            row + 1,
            row,
            regions[row % regions.len()],
            2015 + row % 10,
        ));
    }

    data
}

fn parse(data: &str) -> DataTable {
    Parser::new().parse_str(data).unwrap()
}

/// Benchmark single-column profiling at different sample sizes.
fn bench_column_profiling(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_profiling");
    let table = parse(&generate_orders_data(10_000));

    for sample_size in [100, 1000, 10_000].iter() {
        let classifier = ColumnClassifier::with_config(ClassifierConfig {
            sample_size: *sample_size,
            seed: 0,
        });

        group.bench_with_input(
            BenchmarkId::new("order_id", sample_size),
            &classifier,
            |b, classifier| b.iter(|| black_box(classifier.analyze(&table, "order_id").unwrap())),
        );
        group.bench_with_input(
            BenchmarkId::new("contact_email", sample_size),
            &classifier,
            |b, classifier| {
                b.iter(|| black_box(classifier.analyze(&table, "contact_email").unwrap()))
            },
        );
    }

    group.finish();
}

/// Benchmark profiling every column of a table.
fn bench_table_profiling(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_profiling");
    let classifier = ColumnClassifier::new();

    for rows in [100, 1000, 10_000].iter() {
        let table = parse(&generate_orders_data(*rows));

        group.throughput(Throughput::Elements((*rows * table.column_count()) as u64));
        group.bench_with_input(BenchmarkId::new("orders_rows", rows), &table, |b, table| {
            b.iter(|| black_box(classifier.analyze_table(table).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark cross-table profiling, which also builds foreign indexes.
fn bench_dataset_profiling(c: &mut Criterion) {
    let mut group = c.benchmark_group("dataset_profiling");
    group.sample_size(20);
    let classifier = ColumnClassifier::new();

    for rows in [1000, 10_000].iter() {
        let dataset = Dataset::new()
            .with_table("customers", parse(&generate_customers_data(500)))
            .with_table("orders", parse(&generate_orders_data(*rows)));

        group.bench_with_input(BenchmarkId::new("orders_rows", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(classifier.analyze_dataset(dataset).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark schema building from precomputed profiles.
fn bench_schema_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_building");
    let dataset = Dataset::new()
        .with_table("customers", parse(&generate_customers_data(500)))
        .with_table("orders", parse(&generate_orders_data(5000)));
    let profiles = ColumnClassifier::new()
        .analyze_dataset(&dataset)
        .unwrap()
        .profiles;
    let builder = SchemaBuilder::new();

    group.bench_function("customers_orders", |b| {
        b.iter(|| black_box(builder.build(&profiles, "BenchVault")))
    });

    group.finish();
}

/// Benchmark the full pipeline from file to model.
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");

    for rows in [100, 1000, 10_000].iter() {
        let data = generate_orders_data(*rows);
        let bytes = data.len();

        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(BenchmarkId::new("pattern_only", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| black_box(Vaultsmith::new().analyze(temp.path()).unwrap()),
            )
        });
        group.bench_with_input(BenchmarkId::new("mock_advisory", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let vaultsmith = Vaultsmith::new().with_advisory(MockProvider::new());
                    black_box(vaultsmith.analyze(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_column_profiling,
    bench_table_profiling,
    bench_dataset_profiling,
    bench_schema_building,
    bench_full_pipeline,
);
criterion_main!(benches);
