//! Fragment aggregation with collision detection.
//!
//! Fragments are expected to partition the key space. A key seen in two
//! fragments is an authoring bug and fails the merge; nothing is overwritten.

use std::collections::HashMap;

use tracing::debug;

use crate::error::AssemblyError;
use crate::fragment::{Fragment, Table};

/// Which merged table a set of fragments feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableKind {
    Paths,
    Schemas,
}

impl TableKind {
    fn label(self) -> &'static str {
        match self {
            TableKind::Paths => "paths",
            TableKind::Schemas => "schemas",
        }
    }

    fn collision(self, key: &str, first: &str, second: &str) -> AssemblyError {
        match self {
            TableKind::Paths => AssemblyError::DuplicateRoute {
                route: key.to_string(),
                first: first.to_string(),
                second: second.to_string(),
            },
            TableKind::Schemas => AssemblyError::DuplicateSchema {
                name: key.to_string(),
                first: first.to_string(),
                second: second.to_string(),
            },
        }
    }
}

/// Merge path fragments into one `paths` table.
///
/// Order is the concatenation of fragment orders, in fragment-list order.
pub fn merge_paths(fragments: &[Fragment]) -> Result<Table, AssemblyError> {
    merge_fragments(fragments, TableKind::Paths)
}

/// Merge schema fragments into one `components.schemas` table.
pub fn merge_schemas(fragments: &[Fragment]) -> Result<Table, AssemblyError> {
    merge_fragments(fragments, TableKind::Schemas)
}

fn merge_fragments(fragments: &[Fragment], kind: TableKind) -> Result<Table, AssemblyError> {
    let mut merged = Table::new();
    // Key -> name of the fragment that first declared it.
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for fragment in fragments {
        for (key, value) in &fragment.entries {
            if let Some(first) = owners.get(key.as_str()) {
                return Err(kind.collision(key, first, &fragment.name));
            }
            owners.insert(key.as_str(), fragment.name.as_str());
            merged.insert(key.clone(), value.clone());
        }

        debug!(
            table = kind.label(),
            fragment = %fragment.name,
            entries = fragment.len(),
            "merged fragment"
        );
    }

    Ok(merged)
}
