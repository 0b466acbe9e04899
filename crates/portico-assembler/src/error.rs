use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while assembling or rendering a document.
///
/// Duplicate keys and dangling references are authoring defects in the
/// fragment tables. They are deterministic: re-running with the same
/// fragments reproduces the same error.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// E2010: Two path fragments declare the same route.
    #[error("E2010: duplicate route '{route}' declared in both '{first}' and '{second}'")]
    DuplicateRoute {
        route: String,
        first: String,
        second: String,
    },

    /// E2011: Two schema fragments declare the same schema name.
    #[error("E2011: duplicate schema '{name}' declared in both '{first}' and '{second}'")]
    DuplicateSchema {
        name: String,
        first: String,
        second: String,
    },

    /// E2020: A `#/components/schemas/...` reference names a missing schema.
    #[error("E2020: unresolved reference to schema '{target}' from {origin}")]
    UnresolvedReference { target: String, origin: RefOrigin },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AssemblyError {
    /// Diagnostic code for this error, if it is an authoring defect.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            AssemblyError::DuplicateRoute { .. } => Some("E2010"),
            AssemblyError::DuplicateSchema { .. } => Some("E2011"),
            AssemblyError::UnresolvedReference { .. } => Some("E2020"),
            AssemblyError::Json(_) | AssemblyError::Yaml(_) => None,
        }
    }
}

/// Where a schema reference was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RefOrigin {
    /// Inside an operation (method under a route).
    Operation { route: String, method: String },
    /// Inside a path item but outside any operation (e.g. shared parameters).
    PathItem { route: String },
    /// Inside another schema definition.
    Schema { name: String },
}

impl fmt::Display for RefOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefOrigin::Operation { route, method } => {
                write!(f, "{} {}", method.to_uppercase(), route)
            }
            RefOrigin::PathItem { route } => write!(f, "path item '{}'", route),
            RefOrigin::Schema { name } => write!(f, "schema '{}'", name),
        }
    }
}

/// A non-fatal diagnostic produced during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyWarning {
    /// Diagnostic code (e.g., "E2031").
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Where the issue was found, if it maps to a single key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
