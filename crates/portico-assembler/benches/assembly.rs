//! Document assembly benchmarks.
//!
//! Measures merging, reference resolution and canonical serialization for
//! documents built from a growing number of fragments.
//!
//! Run with: cargo bench -p portico-assembler --bench assembly

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use portico_assembler::{to_canonical_json, to_flattened, ApiMetadata, Assembler, Fragment};

/// Build an assembler with N resource fragments.
///
/// Each fragment contributes a collection route, an item route with a path
/// param, and two schemas that reference each other.
fn generate_assembler(fragment_count: usize) -> Assembler {
    let mut assembler = Assembler::new(ApiMetadata::new("Benchmark API", "1.0.0"));

    for i in 0..fragment_count {
        let resource = format!("resource{}", i);
        let item = format!("Resource{}", i);
        let page = format!("Resource{}Page", i);

        let paths = Fragment::from_value(
            resource.clone(),
            json!({
                format!("/{}", resource): {
                    "get": {
                        "operationId": format!("list_{}", resource),
                        "parameters": [
                            {"name": "limit", "in": "query", "schema": {"type": "integer", "maximum": 100}}
                        ],
                        "responses": {
                            "200": {"content": {"application/json": {
                                "schema": {"$ref": format!("#/components/schemas/{}", page)}
                            }}}
                        }
                    }
                },
                format!("/{}/{{id}}", resource): {
                    "get": {
                        "operationId": format!("get_{}", resource),
                        "responses": {
                            "200": {"content": {"application/json": {
                                "schema": {"$ref": format!("#/components/schemas/{}", item)}
                            }}}
                        }
                    }
                }
            }),
        )
        .unwrap();

        let schemas = Fragment::from_value(
            resource,
            json!({
                item.clone(): {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "format": "uuid"},
                        "name": {"type": "string", "maxLength": 255}
                    }
                },
                page: {
                    "type": "object",
                    "properties": {
                        "items": {"type": "array", "items": {"$ref": format!("#/components/schemas/{}", item)}},
                        "next": {"type": "string", "nullable": true}
                    }
                }
            }),
        )
        .unwrap();

        assembler = assembler.path_fragment(paths).schema_fragment(schemas);
    }

    assembler
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    for fragment_count in [10, 50, 100] {
        let assembler = generate_assembler(fragment_count);

        group.bench_with_input(
            BenchmarkId::new("assemble", format!("{}_fragments", fragment_count)),
            &assembler,
            |b, assembler| {
                b.iter(|| black_box(assembler.assemble().unwrap()));
            },
        );

        let document = assembler.assemble().unwrap().document;

        group.bench_with_input(
            BenchmarkId::new("canonical_json", format!("{}_fragments", fragment_count)),
            &document,
            |b, document| {
                b.iter(|| black_box(to_canonical_json(document).unwrap()));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("flattened", format!("{}_fragments", fragment_count)),
            &document,
            |b, document| {
                b.iter(|| black_box(to_flattened(document).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_assembly);
criterion_main!(benches);
