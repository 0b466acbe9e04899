//! Structured logging for the command line.
//!
//! Logs go to stderr so that `print` output on stdout stays clean.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::CliError;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Structured JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn init_json_logging(filter: EnvFilter) -> Result<(), CliError> {
    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}

fn init_pretty_logging(filter: EnvFilter) -> Result<(), CliError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}

/// Standard log event names.
pub mod events {
    /// A generation run is starting.
    pub const ASSEMBLY_STARTED: &str = "assembly_started";

    /// A fragment file has been loaded.
    pub const FRAGMENT_LOADED: &str = "fragment_loaded";

    /// Assembly failed with an authoring defect.
    pub const ASSEMBLY_FAILED: &str = "assembly_failed";

    /// A rendered document has been written to disk.
    pub const DOCUMENT_WRITTEN: &str = "document_written";
}
