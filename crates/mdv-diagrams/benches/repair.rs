//! Benchmarks for the Mermaid repair passes and `PlantUML` encoding.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mdv_diagrams::{
    DeflateEncoder, DiagramDialect, RepairOptions, encode_plantuml_source, repair_diagram_source,
};

/// Generate a sequence diagram with `messages` message lines.
fn generate_sequence(messages: usize) -> String {
    let mut source = String::from("sequenceDiagram\n    participant end as End\n");
    for i in 0..messages {
        if i % 2 == 0 {
            source.push_str(&format!("    Alice->>end: request({i})\n"));
        } else {
            source.push_str(&format!("    end-->>Alice: plain reply {i}\n"));
        }
        if i % 10 == 0 {
            source.push_str(&format!("    Note over Alice: step #{i}\n"));
        }
    }
    source
}

/// Generate a flowchart with `nodes` nodes grouped into subgraphs of ten.
fn generate_flow(nodes: usize) -> String {
    let mut source = String::from("graph TD\n");
    for i in 0..nodes {
        if i % 10 == 0 {
            source.push_str(&format!("  subgraph G{i}[Group {i}]\n"));
        }
        source.push_str(&format!("    N{i}[Node {i} (a/b)] --> R{i}(plain {i})\n"));
        if i % 10 == 9 {
            source.push_str("  end\n");
        }
    }
    source
}

fn bench_repair_by_size(c: &mut Criterion) {
    let options = RepairOptions::default();
    let mut group = c.benchmark_group("repair_by_size");

    for size in [10, 100, 1000] {
        let sequence = generate_sequence(size);
        group.throughput(Throughput::Bytes(sequence.len() as u64));
        group.bench_with_input(BenchmarkId::new("sequence", size), &sequence, |b, source| {
            b.iter(|| repair_diagram_source(DiagramDialect::Sequence, source, &options));
        });

        let flow = generate_flow(size);
        group.throughput(Throughput::Bytes(flow.len() as u64));
        group.bench_with_input(BenchmarkId::new("flow", size), &flow, |b, source| {
            b.iter(|| repair_diagram_source(DiagramDialect::Flow, source, &options));
        });
    }

    group.finish();
}

fn bench_repair_already_clean(c: &mut Criterion) {
    let options = RepairOptions::default();
    let once = repair_diagram_source(DiagramDialect::Flow, &generate_flow(100), &options);

    c.bench_function("repair_flow_idempotent_100", |b| {
        b.iter(|| repair_diagram_source(DiagramDialect::Flow, &once, &options));
    });
}

fn bench_plantuml_encode(c: &mut Criterion) {
    let source = "@startuml\nAlice -> Bob: Authentication Request\nBob --> Alice: Authentication Response\n@enduml";

    c.bench_function("plantuml_deflate_encode", |b| {
        b.iter(|| encode_plantuml_source(source, Some(&DeflateEncoder)));
    });
}

criterion_group!(
    benches,
    bench_repair_by_size,
    bench_repair_already_clean,
    bench_plantuml_encode
);
criterion_main!(benches);
