//! Project manifest (`portico.yaml`) parser.
//!
//! The manifest carries the static document metadata, lists the path and
//! schema fragment files in merge order, and optionally configures output.

use std::path::{Path, PathBuf};

use portico_assembler::{ApiMetadata, Assembler, Fragment, OutputFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;
use crate::logging::events;

/// Default output directory, relative to the manifest.
const DEFAULT_OUTPUT_DIR: &str = "dist";

/// A project manifest (`portico.yaml`).
///
/// Metadata and sources share the top level of the file but are read in two
/// passes, so scalars such as `version: 1.0` still land in string fields.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectManifest {
    /// Document metadata (info, servers, tags, security).
    #[serde(flatten)]
    pub metadata: ApiMetadata,
    /// Path fragment files, in merge order.
    pub paths: Vec<FragmentSource>,
    /// Schema fragment files, in merge order.
    pub schemas: Vec<FragmentSource>,
    /// Output settings.
    pub output: OutputConfig,
}

/// Fragment lists and output settings; other top-level keys are metadata.
#[derive(Debug, Deserialize)]
struct ManifestSources {
    #[serde(default)]
    paths: Vec<FragmentSource>,
    #[serde(default)]
    schemas: Vec<FragmentSource>,
    #[serde(default)]
    output: OutputConfig,
}

/// A fragment file reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentSource {
    /// Fragment name for diagnostics (default: file stem).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Path to a YAML or JSON mapping (relative to manifest or absolute).
    pub file: String,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "dist").
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Formats written by `generate` (default: json and flattened).
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            formats: default_formats(),
        }
    }
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Json, OutputFormat::Flattened]
}

impl FragmentSource {
    /// Name used in diagnostics.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => Path::new(&self.file)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&self.file)
                .to_string(),
        }
    }

    /// Load the fragment, resolving relative paths against `base_path`.
    pub fn load(&self, base_path: &Path) -> Result<Fragment, CliError> {
        let path = resolve_path(&self.file, base_path);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            CliError::Fragment(format!("failed to read {}: {}", path.display(), e))
        })?;

        // YAML parser also accepts JSON
        let value: serde_json::Value = serde_yaml::from_str(&content).map_err(|e| {
            CliError::Fragment(format!("failed to parse {}: {}", path.display(), e))
        })?;

        let name = self.display_name();
        let fragment = Fragment::from_value(name, value).ok_or_else(|| {
            CliError::Fragment(format!("{} must contain a mapping", path.display()))
        })?;

        debug!(
            event = events::FRAGMENT_LOADED,
            fragment = %fragment.name,
            file = %path.display(),
            entries = fragment.len(),
            "fragment loaded"
        );

        Ok(fragment)
    }
}

impl ProjectManifest {
    /// Load a manifest from a YAML file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Manifest(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content, path)
    }

    /// Parse a manifest from YAML content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, CliError> {
        let parse_error = |e: serde_yaml::Error| {
            CliError::Manifest(format!("failed to parse {}: {}", path.display(), e))
        };

        let metadata: ApiMetadata = serde_yaml::from_str(content).map_err(parse_error)?;
        let sources: ManifestSources = serde_yaml::from_str(content).map_err(parse_error)?;

        Ok(Self {
            metadata,
            paths: sources.paths,
            schemas: sources.schemas,
            output: sources.output,
        })
    }

    /// Load all fragments and build an assembler.
    ///
    /// The `base_path` is used to resolve relative fragment paths.
    pub fn assembler(&self, base_path: &Path) -> Result<Assembler, CliError> {
        let paths = self
            .paths
            .iter()
            .map(|source| source.load(base_path))
            .collect::<Result<Vec<_>, _>>()?;
        let schemas = self
            .schemas
            .iter()
            .map(|source| source.load(base_path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Assembler::new(self.metadata.clone())
            .path_fragments(paths)
            .schema_fragments(schemas))
    }

    /// Output directory, resolved against `base_path`.
    pub fn output_dir(&self, base_path: &Path) -> PathBuf {
        resolve_path(&self.output.dir, base_path)
    }
}

/// Directory containing the manifest, used as base for relative paths.
pub fn base_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_path(path: &str, base_path: &Path) -> PathBuf {
    if Path::new(path).is_absolute() {
        Path::new(path).to_path_buf()
    } else {
        base_path.join(path)
    }
}
