//! Resolution Benchmark
//!
//! Measures engine throughput over in-memory snapshots: wide objects, deep
//! recursive shapes, template literal expansion and warm-cache lookups.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fluentgen::{PrimitiveKind, TypeHandle, TypeResolver, TypeSnapshot};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime")
}

// =============================================================================
// Fixtures
// =============================================================================

/// `Wide { p0: string; p1: number; ... }` with `width` properties.
fn wide_object(width: usize) -> (TypeSnapshot, TypeHandle) {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let n = snap.primitive(PrimitiveKind::Number);
    let names: Vec<String> = (0..width).map(|i| format!("p{i}")).collect();
    let props: Vec<(&str, TypeHandle)> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), if i % 2 == 0 { s } else { n }))
        .collect();
    let root = snap.object("Wide", &props);
    (snap, root)
}

/// A chain `Node0 -> Node1 -> ... -> Node{len-1} -> Node0`.
fn node_chain(len: usize) -> (TypeSnapshot, TypeHandle) {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let nodes: Vec<TypeHandle> = (0..len)
        .map(|i| snap.object(&format!("Node{i}"), &[("label", s)]))
        .collect();
    for (i, node) in nodes.iter().enumerate() {
        let next = nodes[(i + 1) % len];
        snap.entry(*node).property("next", next);
    }
    (snap, nodes[0])
}

/// `` `${A}-${B}-${C}` `` over three unions of `fan_out` literals each.
fn template_product(fan_out: usize) -> (TypeSnapshot, TypeHandle) {
    let mut snap = TypeSnapshot::new();
    let mut unions = Vec::new();
    for prefix in ["a", "b", "c"] {
        let members: Vec<TypeHandle> = (0..fan_out)
            .map(|i| snap.string_literal(&format!("{prefix}{i}")))
            .collect();
        unions.push(snap.union(&members));
    }
    let root = snap.template_literal(&["", "-", "-", ""], &unions);
    (snap, root)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_wide_objects(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("resolve_wide_object");
    for width in [10usize, 100, 1000] {
        let (snap, root) = wide_object(width);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &root, |b, root| {
            b.to_async(&rt).iter(|| async {
                let mut resolver = TypeResolver::new(&snap);
                black_box(resolver.resolve(*root).await)
            })
        });
    }
    group.finish();
}

fn bench_recursive_chain(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("resolve_recursive_chain");
    for len in [4usize, 16, 64] {
        let (snap, root) = node_chain(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &root, |b, root| {
            b.to_async(&rt).iter(|| async {
                let mut resolver = TypeResolver::builder(&snap).max_depth(256).build();
                black_box(resolver.resolve(*root).await)
            })
        });
    }
    group.finish();
}

fn bench_template_expansion(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("template_expansion");
    for fan_out in [2usize, 5, 10] {
        let (snap, root) = template_product(fan_out);
        group.throughput(Throughput::Elements(fan_out.pow(3) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fan_out), &root, |b, root| {
            b.to_async(&rt).iter(|| async {
                let mut resolver = TypeResolver::new(&snap);
                black_box(resolver.resolve(*root).await)
            })
        });
    }
    group.finish();
}

fn bench_warm_cache(c: &mut Criterion) {
    let rt = runtime();
    let (snap, root) = wide_object(100);
    let mut resolver = TypeResolver::new(&snap);
    rt.block_on(resolver.resolve(root)).expect("warm-up resolution");

    c.bench_function("resolve_warm_cache", |b| {
        b.iter(|| black_box(rt.block_on(resolver.resolve(root))))
    });
}

criterion_group!(
    benches,
    bench_wide_objects,
    bench_recursive_chain,
    bench_template_expansion,
    bench_warm_cache
);
criterion_main!(benches);
