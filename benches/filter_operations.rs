//! Benchmarks for filter declaration and predicate compilation.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use filterkit::query::adapter::{LiteralAdapter, PositionalAdapter};
use filterkit::{Criteria, FilterMap, FilterType, Group};

/// Declare `count` NUMBER filters.
fn declare_filters(count: usize) -> FilterMap {
    let mut builder = FilterMap::builder("Bench");
    for i in 0..count {
        builder
            .declare(&format!("field_{}", i), FilterType::Number, Default::default())
            .expect("valid filter name");
    }
    builder.build()
}

/// A single group touching `count` filters.
fn create_group(count: usize) -> Group {
    (0..count)
        .map(|i| (format!("field_{}_gte", i), i as i64))
        .collect()
}

fn bench_declaration(c: &mut Criterion) {
    let mut group = c.benchmark_group("declare");
    for count in [1, 10, 50] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(declare_filters(count)))
        });
    }
    group.finish();
}

fn bench_compile_group(c: &mut Criterion) {
    let filters = declare_filters(50);
    let mut group = c.benchmark_group("compile_group");
    for count in [1, 5, 20, 50] {
        let criteria = Criteria::from(create_group(count));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &criteria, |b, criteria| {
            b.iter(|| black_box(filters.compile(black_box(criteria)).expect("declared keys")))
        });
    }
    group.finish();
}

fn bench_compile_group_list(c: &mut Criterion) {
    let filters = declare_filters(10);
    let mut group = c.benchmark_group("compile_group_list");
    for groups in [2, 8, 32] {
        let criteria = Criteria::GroupList((0..groups).map(|_| create_group(5)).collect());
        group.bench_with_input(BenchmarkId::from_parameter(groups), &criteria, |b, criteria| {
            b.iter(|| black_box(filters.compile(black_box(criteria)).expect("declared keys")))
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let filters = declare_filters(10);
    let compiled = filters
        .compile(&Criteria::from(create_group(10)))
        .expect("declared keys");

    c.bench_function("resolve_positional", |b| {
        b.iter(|| black_box(compiled.resolve_with(&PositionalAdapter::default()).expect("bound")))
    });
    c.bench_function("resolve_literal", |b| {
        b.iter(|| black_box(compiled.resolve_with(&LiteralAdapter::default()).expect("bound")))
    });
}

criterion_group!(
    benches,
    bench_declaration,
    bench_compile_group,
    bench_compile_group_list,
    bench_resolve
);
criterion_main!(benches);
