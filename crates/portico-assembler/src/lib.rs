//! Assembles OpenAPI documents from independently authored fragments.
//!
//! Merges path and schema fragments into unified tables, verifies every
//! `#/components/schemas/...` reference resolves, attaches static metadata,
//! and renders the result as canonical JSON, a flattened text projection, or
//! structured YAML. The crate performs no I/O.

pub mod aggregate;
pub mod assembler;
pub mod document;
pub mod error;
pub mod fragment;
pub mod metadata;
pub mod resolve;
pub mod serialize;

pub use aggregate::{merge_paths, merge_schemas};
pub use assembler::{Assembler, Assembly};
pub use document::{assemble_document, Components, Document};
pub use error::{AssemblyError, AssemblyWarning, RefOrigin};
pub use fragment::{Fragment, Table};
pub use metadata::{
    ApiMetadata, Contact, Info, License, SecurityRequirement, Server, Tag,
    DEFAULT_OPENAPI_VERSION,
};
pub use resolve::{
    collect_references, resolve_references, schema_ref_target, Resolution, SchemaReference,
    SCHEMA_REF_PREFIX,
};
pub use serialize::{flatten, render, to_canonical_json, to_flattened, to_yaml, OutputFormat};
