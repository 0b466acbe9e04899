//! Schema reference resolution.
//!
//! Every `#/components/schemas/<Name>` pointer in the merged paths and
//! schemas must name a key of the merged schema table. Targets are checked
//! by name only and never expanded, so cyclic schema graphs terminate.

use std::collections::{HashMap, HashSet, VecDeque};

use percent_encoding::percent_decode_str;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AssemblyError, AssemblyWarning, RefOrigin};
use crate::fragment::Table;

/// Pointer prefix for schema component references.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// HTTP methods that key operations inside a path item.
const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A schema reference and where it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaReference {
    /// Referenced schema name (pointer-unescaped).
    pub target: String,
    /// Location of the `$ref`.
    pub origin: RefOrigin,
}

/// Outcome of a successful resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Number of distinct schema names referenced.
    pub checked: usize,
    /// Non-fatal diagnostics (unreachable schemas).
    pub warnings: Vec<AssemblyWarning>,
}

/// Check that every schema reference in `paths` and `schemas` resolves.
///
/// Fails on the first dangling target in document order: routes in table
/// order, then schemas in table order.
pub fn resolve_references(paths: &Table, schemas: &Table) -> Result<Resolution, AssemblyError> {
    let references = collect_references(paths, schemas);

    let mut seen = HashSet::new();
    for reference in &references {
        if !seen.insert(reference.target.as_str()) {
            continue;
        }
        if !schemas.contains_key(&reference.target) {
            return Err(AssemblyError::UnresolvedReference {
                target: reference.target.clone(),
                origin: reference.origin.clone(),
            });
        }
    }

    debug!(
        references = references.len(),
        targets = seen.len(),
        "schema references resolved"
    );

    let warnings = unreachable_schemas(&references, schemas);
    for warning in &warnings {
        warn!(code = %warning.code, "{}", warning.message);
    }

    Ok(Resolution {
        checked: seen.len(),
        warnings,
    })
}

/// Collect schema references, one entry per distinct (origin, target) pair.
pub fn collect_references(paths: &Table, schemas: &Table) -> Vec<SchemaReference> {
    let mut collector = Collector::default();

    for (route, item) in paths {
        match item.as_object() {
            Some(item) => {
                for (key, value) in item {
                    let origin = if HTTP_METHODS.contains(&key.as_str()) {
                        RefOrigin::Operation {
                            route: route.clone(),
                            method: key.clone(),
                        }
                    } else {
                        RefOrigin::PathItem {
                            route: route.clone(),
                        }
                    };
                    collector.walk(value, &origin);
                }
            }
            None => collector.walk(
                item,
                &RefOrigin::PathItem {
                    route: route.clone(),
                },
            ),
        }
    }

    for (name, schema) in schemas {
        collector.walk(schema, &RefOrigin::Schema { name: name.clone() });
    }

    collector.references
}

/// Extract the schema name from a `#/components/schemas/...` pointer.
///
/// The pointer is a URI fragment, so the segment is percent-decoded before
/// JSON Pointer unescaping. Returns `None` for pointers into other parts of
/// the document and for external references.
pub fn schema_ref_target(pointer: &str) -> Option<String> {
    let rest = pointer.strip_prefix(SCHEMA_REF_PREFIX)?;
    let segment = rest.split('/').next().unwrap_or(rest);
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    // ~1 before ~0
    Some(decoded.replace("~1", "/").replace("~0", "~"))
}

#[derive(Default)]
struct Collector {
    references: Vec<SchemaReference>,
    seen: HashSet<SchemaReference>,
}

impl Collector {
    fn walk(&mut self, value: &Value, origin: &RefOrigin) {
        match value {
            Value::Object(obj) => {
                for (key, child) in obj {
                    if key == "$ref" {
                        if let Some(target) = child.as_str().and_then(schema_ref_target) {
                            self.record(target, origin);
                            continue;
                        }
                    }
                    self.walk(child, origin);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, origin);
                }
            }
            _ => {}
        }
    }

    fn record(&mut self, target: String, origin: &RefOrigin) {
        let reference = SchemaReference {
            target,
            origin: origin.clone(),
        };
        if self.seen.insert(reference.clone()) {
            self.references.push(reference);
        }
    }
}

/// E2031: schemas that no operation reaches, directly or through other schemas.
fn unreachable_schemas(references: &[SchemaReference], schemas: &Table) -> Vec<AssemblyWarning> {
    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    for reference in references {
        match &reference.origin {
            RefOrigin::Schema { name } => edges
                .entry(name.as_str())
                .or_default()
                .push(reference.target.as_str()),
            RefOrigin::Operation { .. } | RefOrigin::PathItem { .. } => {
                queue.push_back(reference.target.as_str())
            }
        }
    }

    let mut reached: HashSet<&str> = HashSet::new();
    while let Some(name) = queue.pop_front() {
        if !reached.insert(name) {
            continue;
        }
        if let Some(targets) = edges.get(name) {
            queue.extend(targets.iter().copied());
        }
    }

    schemas
        .keys()
        .filter(|name| !reached.contains(name.as_str()))
        .map(|name| AssemblyWarning {
            code: "E2031".to_string(),
            message: format!("schema '{}' is not referenced by any operation", name),
            location: Some(format!("components.schemas.{}", name)),
        })
        .collect()
}
