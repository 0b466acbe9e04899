//! One-shot assembly pipeline: aggregate, resolve, assemble.

use tracing::info;

use crate::aggregate::{merge_paths, merge_schemas};
use crate::document::{assemble_document, Document};
use crate::error::{AssemblyError, AssemblyWarning};
use crate::fragment::Fragment;
use crate::metadata::ApiMetadata;
use crate::resolve::resolve_references;

/// Result of a successful assembly run.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// The assembled document.
    pub document: Document,
    /// Non-fatal diagnostics found along the way.
    pub warnings: Vec<AssemblyWarning>,
}

/// Builder for assembling a document from fragments.
///
/// # Example
///
/// ```ignore
/// use portico_assembler::{ApiMetadata, Assembler};
///
/// let assembly = Assembler::new(ApiMetadata::new("Social API", "1.0.0"))
///     .path_fragment(auth_paths)
///     .path_fragment(post_paths)
///     .schema_fragment(auth_schemas)
///     .schema_fragment(post_schemas)
///     .assemble()?;
/// ```
///
/// Fragments merge in the order they were added. Any duplicate key or
/// dangling schema reference fails the whole run; no partial document is
/// produced.
#[derive(Debug, Clone)]
pub struct Assembler {
    metadata: ApiMetadata,
    paths: Vec<Fragment>,
    schemas: Vec<Fragment>,
}

impl Assembler {
    /// Create a new assembler for the given metadata.
    pub fn new(metadata: ApiMetadata) -> Self {
        Self {
            metadata,
            paths: Vec::new(),
            schemas: Vec::new(),
        }
    }

    /// Add a path fragment.
    pub fn path_fragment(mut self, fragment: Fragment) -> Self {
        self.paths.push(fragment);
        self
    }

    /// Add several path fragments.
    pub fn path_fragments(mut self, fragments: impl IntoIterator<Item = Fragment>) -> Self {
        self.paths.extend(fragments);
        self
    }

    /// Add a schema fragment.
    pub fn schema_fragment(mut self, fragment: Fragment) -> Self {
        self.schemas.push(fragment);
        self
    }

    /// Add several schema fragments.
    pub fn schema_fragments(mut self, fragments: impl IntoIterator<Item = Fragment>) -> Self {
        self.schemas.extend(fragments);
        self
    }

    /// Run the pipeline.
    pub fn assemble(&self) -> Result<Assembly, AssemblyError> {
        let paths = merge_paths(&self.paths)?;
        let schemas = merge_schemas(&self.schemas)?;
        let resolution = resolve_references(&paths, &schemas)?;
        let document = assemble_document(paths, schemas, &self.metadata);

        info!(
            title = %document.info.title,
            routes = document.route_count(),
            schemas = document.schema_count(),
            references = resolution.checked,
            warnings = resolution.warnings.len(),
            "document assembled"
        );

        Ok(Assembly {
            document,
            warnings: resolution.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::to_canonical_json;
    use serde_json::json;

    fn fragment(name: &str, value: serde_json::Value) -> Fragment {
        Fragment::from_value(name, value).unwrap()
    }

    fn assembler() -> Assembler {
        Assembler::new(ApiMetadata::new("Social API", "1.0.0"))
            .path_fragment(fragment(
                "auth",
                json!({
                    "/auth/login": {
                        "post": {
                            "responses": {
                                "200": {"content": {"application/json": {
                                    "schema": {"$ref": "#/components/schemas/Session"}
                                }}}
                            }
                        }
                    }
                }),
            ))
            .path_fragment(fragment(
                "posts",
                json!({
                    "/posts": {
                        "get": {
                            "responses": {
                                "200": {"content": {"application/json": {
                                    "schema": {"type": "array", "items": {"$ref": "#/components/schemas/Post"}}
                                }}}
                            }
                        }
                    }
                }),
            ))
            .schema_fragment(fragment("auth", json!({"Session": {"type": "object"}})))
            .schema_fragment(fragment("posts", json!({"Post": {"type": "object"}})))
    }

    #[test]
    fn assembles_valid_fragments() {
        let assembly = assembler().assemble().unwrap();

        assert_eq!(assembly.document.route_count(), 2);
        assert_eq!(assembly.document.schema_count(), 2);
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn duplicate_route_fails_whole_run() {
        let result = assembler()
            .path_fragment(fragment("media", json!({"/posts": {"post": {}}})))
            .assemble();

        assert!(matches!(
            result,
            Err(AssemblyError::DuplicateRoute { ref route, .. }) if route == "/posts"
        ));
    }

    #[test]
    fn duplicate_schema_fails_whole_run() {
        let result = assembler()
            .schema_fragment(fragment("media", json!({"Post": {}})))
            .assemble();

        assert!(matches!(result, Err(AssemblyError::DuplicateSchema { .. })));
    }

    #[test]
    fn dangling_reference_fails_whole_run() {
        let result = assembler()
            .path_fragment(fragment(
                "leaderboard",
                json!({"/leaderboard": {"get": {"schema": {"$ref": "#/components/schemas/Ranking"}}}}),
            ))
            .assemble();

        assert!(matches!(
            result,
            Err(AssemblyError::UnresolvedReference { ref target, .. }) if target == "Ranking"
        ));
    }

    #[test]
    fn reassembling_is_byte_identical() {
        let assembler = assembler();
        let first = to_canonical_json(&assembler.assemble().unwrap().document).unwrap();
        let second = to_canonical_json(&assembler.assemble().unwrap().document).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unreferenced_schema_is_reported_as_warning() {
        let assembly = assembler()
            .schema_fragments([fragment("limits", json!({"RateLimit": {"type": "object"}}))])
            .assemble()
            .unwrap();

        assert_eq!(assembly.warnings.len(), 1);
        assert!(assembly.warnings[0].message.contains("RateLimit"));
    }
}
