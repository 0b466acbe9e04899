//! Portico command line.
//!
//! Loads a project manifest and its fragment files, assembles the OpenAPI
//! document, and writes or prints the requested renderings.

mod error;
mod logging;
mod manifest;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use portico_assembler::{render, Assembly, AssemblyError, AssemblyWarning, OutputFormat};
use tracing::{error, info};

use crate::error::CliError;
use crate::logging::{events, init_logging, LogFormat};
use crate::manifest::{base_dir, ProjectManifest};

#[derive(Parser, Debug)]
#[command(name = "portico", about = "Assemble OpenAPI documents from fragments", version)]
struct Cli {
    /// Log level (overridden by RUST_LOG).
    #[arg(long, global = true, env = "PORTICO_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log output format.
    #[arg(long, global = true, env = "PORTICO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble the document and write it to the output directory.
    Generate {
        /// Project manifest (portico.yaml).
        #[arg(short, long, default_value = "portico.yaml")]
        manifest: String,

        /// Output directory (overrides `output.dir`).
        #[arg(short, long)]
        out_dir: Option<String>,

        /// Output format(s) (overrides `output.formats`): json, flattened, yaml.
        #[arg(short, long, num_args = 1..)]
        format: Vec<OutputFormat>,
    },

    /// Assemble the document without writing anything.
    ///
    /// Reports duplicate routes (E2010), duplicate schemas (E2011),
    /// unresolved references (E2020) and unreferenced schemas (E2031).
    Validate {
        /// Project manifest(s).
        #[arg(short, long, required = true, num_args = 1..)]
        manifest: Vec<String>,

        /// Report format (text or json).
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Assemble the document and print one rendering to stdout.
    Print {
        /// Project manifest (portico.yaml).
        #[arg(short, long, default_value = "portico.yaml")]
        manifest: String,

        /// Rendering to print: json, flattened, yaml.
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },
}

/// Load a manifest and run the assembly pipeline.
fn assemble(manifest_path: &Path) -> Result<(ProjectManifest, Assembly), CliError> {
    info!(
        event = events::ASSEMBLY_STARTED,
        manifest = %manifest_path.display(),
        "assembly started"
    );

    let manifest = ProjectManifest::load(manifest_path)?;
    let assembly = manifest.assembler(&base_dir(manifest_path))?.assemble()?;
    Ok((manifest, assembly))
}

fn print_warnings(warnings: &[AssemblyWarning]) {
    for warn in warnings {
        match &warn.location {
            Some(loc) => eprintln!("warning: {} [{}]: {}", warn.code, loc, warn.message),
            None => eprintln!("warning: {}: {}", warn.code, warn.message),
        }
    }
}

fn report_failure(context: &str, e: &CliError) -> ExitCode {
    error!(event = events::ASSEMBLY_FAILED, code = e.code(), "{}", e);
    eprintln!("error: {}: {}", context, e);
    ExitCode::from(1)
}

/// Summary of a generate run.
struct Generated {
    dir: PathBuf,
    files: usize,
    routes: usize,
    schemas: usize,
}

fn generate(
    manifest_path: &Path,
    out_dir: Option<&str>,
    formats: &[OutputFormat],
) -> Result<Generated, CliError> {
    let (manifest, assembly) = assemble(manifest_path)?;
    print_warnings(&assembly.warnings);

    let formats = if formats.is_empty() {
        manifest.output.formats.as_slice()
    } else {
        formats
    };

    // Render everything before touching the filesystem.
    let rendered = formats
        .iter()
        .map(|format| -> Result<_, AssemblyError> {
            Ok((*format, render(&assembly.document, *format)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let dir = match out_dir {
        Some(dir) => PathBuf::from(dir),
        None => manifest.output_dir(&base_dir(manifest_path)),
    };
    std::fs::create_dir_all(&dir)?;

    for (format, content) in &rendered {
        let path = dir.join(format.file_name());
        std::fs::write(&path, content)?;
        info!(
            event = events::DOCUMENT_WRITTEN,
            format = %format,
            path = %path.display(),
            bytes = content.len(),
            "document written"
        );
    }

    Ok(Generated {
        dir,
        files: rendered.len(),
        routes: assembly.document.route_count(),
        schemas: assembly.document.schema_count(),
    })
}

/// Run the generate command.
fn run_generate(manifest: &str, out_dir: Option<&str>, formats: &[OutputFormat]) -> ExitCode {
    match generate(Path::new(manifest), out_dir, formats) {
        Ok(generated) => {
            eprintln!(
                "generated {} file(s) in {} ({} routes, {} schemas)",
                generated.files,
                generated.dir.display(),
                generated.routes,
                generated.schemas
            );
            ExitCode::SUCCESS
        }
        Err(e) => report_failure("generation failed", &e),
    }
}

/// Run the print command.
fn run_print(manifest: &str, format: OutputFormat) -> ExitCode {
    let result = assemble(Path::new(manifest)).and_then(|(_, assembly)| {
        print_warnings(&assembly.warnings);
        Ok(render(&assembly.document, format)?)
    });

    match result {
        Ok(content) => {
            println!("{}", content);
            ExitCode::SUCCESS
        }
        Err(e) => report_failure("assembly failed", &e),
    }
}

/// Validation result for a single manifest.
#[derive(serde::Serialize)]
struct ValidationResult {
    file: String,
    valid: bool,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

#[derive(serde::Serialize)]
struct ValidationIssue {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

impl From<&AssemblyWarning> for ValidationIssue {
    fn from(warn: &AssemblyWarning) -> Self {
        Self {
            code: warn.code.clone(),
            message: warn.message.clone(),
            location: warn.location.clone(),
        }
    }
}

impl From<&CliError> for ValidationIssue {
    fn from(e: &CliError) -> Self {
        let location = match e {
            CliError::Assembly(AssemblyError::DuplicateRoute { route, .. }) => {
                Some(format!("paths.{}", route))
            }
            CliError::Assembly(AssemblyError::DuplicateSchema { name, .. }) => {
                Some(format!("components.schemas.{}", name))
            }
            CliError::Assembly(AssemblyError::UnresolvedReference { origin, .. }) => {
                Some(origin.to_string())
            }
            _ => None,
        };
        Self {
            code: e.code().to_string(),
            message: e.to_string(),
            location,
        }
    }
}

/// Run the validate command.
fn run_validate(manifests: &[String], output_format: &str) -> ExitCode {
    let mut results = Vec::new();

    for manifest in manifests {
        let result = match assemble(Path::new(manifest)) {
            Ok((_, assembly)) => ValidationResult {
                file: manifest.clone(),
                valid: true,
                errors: Vec::new(),
                warnings: assembly.warnings.iter().map(ValidationIssue::from).collect(),
            },
            Err(e) => {
                error!(event = events::ASSEMBLY_FAILED, code = e.code(), "{}", e);
                ValidationResult {
                    file: manifest.clone(),
                    valid: false,
                    errors: vec![ValidationIssue::from(&e)],
                    warnings: Vec::new(),
                }
            }
        };
        results.push(result);
    }

    let invalid = results.iter().filter(|r| !r.valid).count();

    if output_format == "json" {
        let output = serde_json::json!({
            "results": results,
            "summary": {
                "total": results.len(),
                "valid": results.len() - invalid,
                "invalid": invalid,
            }
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to render report: {}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        for result in &results {
            if result.valid && result.warnings.is_empty() {
                eprintln!("✓ {} is valid", result.file);
            } else if result.valid {
                eprintln!(
                    "✓ {} is valid (with {} warning(s))",
                    result.file,
                    result.warnings.len()
                );
            } else {
                eprintln!("✗ {} has {} error(s)", result.file, result.errors.len());
            }

            for err in &result.errors {
                match &err.location {
                    Some(loc) => eprintln!("  {} [{}]: {}", err.code, loc, err.message),
                    None => eprintln!("  {}: {}", err.code, err.message),
                }
            }

            for warn in &result.warnings {
                match &warn.location {
                    Some(loc) => eprintln!("  {} [{}]: {} (warning)", warn.code, loc, warn.message),
                    None => eprintln!("  {}: {} (warning)", warn.code, warn.message),
                }
            }
        }

        eprintln!();
        eprintln!(
            "validated {} manifest(s): {} valid, {} invalid",
            results.len(),
            results.len() - invalid,
            invalid
        );
    }

    if invalid > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level, cli.log_format) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    match cli.command {
        Commands::Generate {
            manifest,
            out_dir,
            format,
        } => run_generate(&manifest, out_dir.as_deref(), &format),
        Commands::Validate { manifest, format } => run_validate(&manifest, &format),
        Commands::Print { manifest, format } => run_print(&manifest, format),
    }
}
