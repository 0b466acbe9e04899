//! Named fragment tables.
//!
//! A fragment is an independently authored slice of the final document:
//! either route templates mapped to path items, or schema names mapped to
//! schema objects. Values are opaque to the assembler.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered string-keyed table (insertion order is preserved).
pub type Table = Map<String, Value>;

/// A named, ordered table contributed by one functional area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Fragment name, used in collision diagnostics (e.g., "auth").
    pub name: String,
    /// Entries in authoring order.
    pub entries: Table,
}

impl Fragment {
    /// Create a fragment from an existing table.
    pub fn new(name: impl Into<String>, entries: Table) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Create a fragment from a JSON value.
    ///
    /// Returns `None` if the value is not an object.
    pub fn from_value(name: impl Into<String>, value: Value) -> Option<Self> {
        match value {
            Value::Object(entries) => Some(Self::new(name, entries)),
            _ => None,
        }
    }

    /// Append an entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the fragment has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
