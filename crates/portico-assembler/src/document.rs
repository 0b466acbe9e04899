//! The assembled root document.

use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;
use crate::fragment::Table;
use crate::metadata::{ApiMetadata, Info, SecurityRequirement, Server, Tag};

/// A fully assembled OpenAPI document.
///
/// Field order here is the serialized field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub openapi: String,
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub paths: Table,
    #[serde(default)]
    pub components: Components,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

/// The `components` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: Table,
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "Table::is_empty"
    )]
    pub security_schemes: Table,
}

impl Document {
    /// Parse a document from its canonical JSON form.
    pub fn from_json(input: &str) -> Result<Self, AssemblyError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Number of routes in `paths`.
    pub fn route_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of schemas in `components.schemas`.
    pub fn schema_count(&self) -> usize {
        self.components.schemas.len()
    }
}

/// Build a document from merged tables and static metadata.
///
/// Performs no validation; callers are expected to have merged and resolved
/// the tables first.
pub fn assemble_document(paths: Table, schemas: Table, metadata: &ApiMetadata) -> Document {
    Document {
        openapi: metadata.openapi.clone(),
        info: metadata.info.clone(),
        servers: metadata.servers.clone(),
        tags: metadata.tags.clone(),
        paths,
        components: Components {
            schemas,
            security_schemes: metadata.security_schemes.clone(),
        },
        security: metadata.security.clone(),
    }
}
