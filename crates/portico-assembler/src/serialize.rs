//! Document serialization.
//!
//! Three renderings are available:
//!
//! - **Canonical JSON**: lossless, two-space indented, field order preserved.
//! - **Flattened projection**: the canonical text with quotes, commas and
//!   brace/bracket delimiters stripped and every colon padded with a space.
//!   This is a character-level transform, not a YAML emitter: nesting is lost
//!   and colons inside values (URLs, times) are padded too. Consumers depend
//!   on the exact output, so it must stay a literal substitution.
//! - **Structured YAML**: a real YAML document produced by `serde_yaml`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::AssemblyError;

/// Characters removed by the flattened projection, applied in this order.
const FLATTEN_STRIP: [char; 6] = ['"', ',', '{', '}', '[', ']'];

/// An output rendering of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Canonical JSON.
    Json,
    /// Flattened character-substitution projection of the JSON.
    Flattened,
    /// Structured YAML.
    Yaml,
}

impl OutputFormat {
    /// All formats, in rendering order.
    pub const ALL: [OutputFormat; 3] = [Self::Json, Self::Flattened, Self::Yaml];

    /// Conventional file name for this rendering.
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Json => "openapi.json",
            OutputFormat::Flattened => "openapi.yaml",
            OutputFormat::Yaml => "openapi.structured.yaml",
        }
    }

    /// Content type used when serving this rendering.
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Flattened => "text/plain; charset=utf-8",
            OutputFormat::Yaml => "application/yaml",
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "flattened" | "flat" => Some(Self::Flattened),
            "yaml" | "structured-yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Flattened => "flattened",
            OutputFormat::Yaml => "yaml",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "unknown output format '{}' (expected json, flattened or yaml)",
                s
            )
        })
    }
}

/// Render the canonical JSON form.
pub fn to_canonical_json(document: &Document) -> Result<String, AssemblyError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Apply the flattened projection to canonical JSON text.
pub fn flatten(canonical: &str) -> String {
    let mut text = canonical.to_string();
    for ch in FLATTEN_STRIP {
        text.retain(|c| c != ch);
    }
    text.replace(':', ": ")
}

/// Render the flattened projection of a document.
pub fn to_flattened(document: &Document) -> Result<String, AssemblyError> {
    Ok(flatten(&to_canonical_json(document)?))
}

/// Render a structured YAML document.
pub fn to_yaml(document: &Document) -> Result<String, AssemblyError> {
    Ok(serde_yaml::to_string(document)?)
}

/// Render a document in the given format.
pub fn render(document: &Document, format: OutputFormat) -> Result<String, AssemblyError> {
    match format {
        OutputFormat::Json => to_canonical_json(document),
        OutputFormat::Flattened => to_flattened(document),
        OutputFormat::Yaml => to_yaml(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::assemble_document;
    use crate::fragment::Table;
    use crate::metadata::ApiMetadata;
    use serde_json::{json, Value};

    fn sample_document() -> Document {
        let paths = match json!({
            "/posts/{id}": {
                "get": {
                    "operationId": "getPost",
                    "tags": ["posts"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Post"}
                                }
                            }
                        }
                    }
                }
            }
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let mut schemas = Table::new();
        schemas.insert(
            "Post".into(),
            json!({"type": "object", "properties": {"id": {"type": "integer"}}}),
        );
        assemble_document(
            paths,
            schemas,
            &ApiMetadata::new("Social API", "1.0.0")
                .with_server("https://api.example.com", None),
        )
    }

    #[test]
    fn flatten_compact_input_is_literal() {
        // Commas are removed, not replaced, so adjacent tokens run together.
        assert_eq!(flatten(r#"{"a":"b","c":1}"#), "a: bc: 1");
    }

    #[test]
    fn flatten_pretty_input_yields_key_value_tokens() {
        let canonical = serde_json::to_string_pretty(&json!({"a": "b", "c": 1})).unwrap();
        let flattened = flatten(&canonical);

        let tokens: Vec<_> = flattened.split_whitespace().collect();
        assert_eq!(tokens.join(" "), "a: b c: 1");
    }

    #[test]
    fn flatten_pads_every_colon() {
        assert_eq!(
            flatten(r#"{"url":"https://x"}"#),
            "url: https: //x"
        );
    }

    #[test]
    fn flatten_strips_all_delimiters() {
        let flattened = flatten(r#"{"tags":["a","b"],"n":{"m":[]}}"#);
        for ch in ['"', ',', '{', '}', '[', ']'] {
            assert!(!flattened.contains(ch), "found {ch:?} in {flattened}");
        }
    }

    #[test]
    fn canonical_json_uses_two_space_indent() {
        let json = to_canonical_json(&sample_document()).unwrap();
        assert!(json.starts_with("{\n  \"openapi\": "));
    }

    #[test]
    fn canonical_json_is_idempotent() {
        let doc = sample_document();
        assert_eq!(
            to_canonical_json(&doc).unwrap(),
            to_canonical_json(&doc).unwrap()
        );
    }

    #[test]
    fn canonical_json_round_trips() {
        let doc = sample_document();
        let json = to_canonical_json(&doc).unwrap();

        let parsed = Document::from_json(&json).unwrap();
        assert_eq!(parsed, doc);

        let as_value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(as_value, serde_json::to_value(&doc).unwrap());
    }

    #[test]
    fn canonical_json_preserves_route_order() {
        let paths = match json!({"/z": {}, "/a": {}, "/m": {}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let doc = assemble_document(paths, Table::new(), &ApiMetadata::new("t", "1"));
        let json = to_canonical_json(&doc).unwrap();

        let z = json.find("\"/z\"").unwrap();
        let a = json.find("\"/a\"").unwrap();
        let m = json.find("\"/m\"").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn flattened_document_matches_projection_of_canonical() {
        let doc = sample_document();
        let canonical = to_canonical_json(&doc).unwrap();
        assert_eq!(to_flattened(&doc).unwrap(), flatten(&canonical));
    }

    #[test]
    fn structured_yaml_parses_back_to_the_same_document() {
        let doc = sample_document();
        let yaml = to_yaml(&doc).unwrap();

        let parsed: Document = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn render_dispatches_on_format() {
        let doc = sample_document();
        for format in OutputFormat::ALL {
            assert!(!render(&doc, format).unwrap().is_empty());
        }
        assert_eq!(
            render(&doc, OutputFormat::Json).unwrap(),
            to_canonical_json(&doc).unwrap()
        );
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("FLAT".parse::<OutputFormat>(), Ok(OutputFormat::Flattened));
        assert_eq!(OutputFormat::parse("yaml"), Some(OutputFormat::Yaml));
        assert!("toml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Flattened.to_string(), "flattened");
    }
}
