//! Benchmarks for graph building and tree rendering
//!
//! Uses synthetic layered graphs where every package depends on a few
//! packages of the next layer, so diamonds are everywhere and the rendered
//! tree is much larger than the graph.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depscope::export::{serialize_diagram, TreeRenderer};
use depscope::graph::{DependencyGraph, GraphBuilder};
use depscope::parser::{Dependency, PackageCoordinate};
use depscope::source::FixtureSource;

/// Create a layered fixture with `layers` levels of `width` packages each.
///
/// Package `i` of a layer depends on `fan_out` packages of the next layer,
/// and the last layer points back at the first to add cycles.
fn create_layered_source(layers: usize, width: usize, fan_out: usize) -> FixtureSource {
    let name = |layer: usize, i: usize| format!("group{}:pkg{}", layer, i);
    let mut source = FixtureSource::new();

    for layer in 0..layers {
        let next = (layer + 1) % layers;
        for i in 0..width {
            let deps = (0..fan_out)
                .map(|k| {
                    Dependency::new(
                        format!("group{}", next),
                        format!("pkg{}", (i + k) % width),
                        format!("{}.0.0", k),
                    )
                })
                .collect();
            source = source.with_package(&name(layer, i), deps);
        }
    }

    source
}

fn build_graph(source: &FixtureSource, depth: usize) -> DependencyGraph {
    GraphBuilder::new(source, depth)
        .build("group0:pkg0")
        .unwrap_or_default()
}

/// Benchmark the bounded breadth-first traversal
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");

    for width in [10, 50, 200].iter() {
        let source = create_layered_source(8, *width, 4);

        group.bench_with_input(BenchmarkId::new("width", width), width, |b, _| {
            b.iter(|| black_box(build_graph(&source, 8)));
        });
    }

    group.finish();
}

/// Benchmark tree rendering at increasing depths
fn bench_render_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_render");
    let source = create_layered_source(6, 20, 3);
    let root = PackageCoordinate::new("group0", "pkg0");

    for depth in [3, 5, 7].iter() {
        let graph = build_graph(&source, *depth);
        let renderer = TreeRenderer::new(&graph, *depth);

        group.bench_with_input(BenchmarkId::new("depth", depth), depth, |b, _| {
            b.iter(|| black_box(renderer.render(&root)));
        });
    }

    group.finish();
}

/// Benchmark D2 serialization
fn bench_diagram(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagram_serialize");

    for width in [50, 500].iter() {
        let source = create_layered_source(6, *width, 4);
        let graph = build_graph(&source, 6);

        group.bench_with_input(BenchmarkId::new("width", width), &graph, |b, graph| {
            b.iter(|| black_box(serialize_diagram(graph)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_render_tree, bench_diagram);
criterion_main!(benches);
