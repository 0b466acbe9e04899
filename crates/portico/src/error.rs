use portico_assembler::AssemblyError;
use thiserror::Error;

/// Errors produced by the `portico` command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// Project manifest could not be read or parsed.
    #[error("E2001: manifest error: {0}")]
    Manifest(String),

    /// A fragment file could not be read or is not a mapping.
    #[error("E2002: fragment error: {0}")]
    Fragment(String),

    /// Assembly failed.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Logging could not be initialized.
    #[error("logging init failed: {0}")]
    LoggingInit(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Diagnostic code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Manifest(_) => "E2001",
            CliError::Fragment(_) => "E2002",
            CliError::Assembly(e) => e.code().unwrap_or("E2000"),
            CliError::LoggingInit(_) | CliError::Io(_) => "E2000",
        }
    }
}
