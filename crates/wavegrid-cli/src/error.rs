//! Error types for the wavegrid CLI.

use thiserror::Error;
use wavegrid::WaveGridError;

/// CLI result type alias.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type.
#[derive(Error, Debug)]
pub enum CliError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the simulation library.
    #[error("{0}")]
    Simulation(#[from] WaveGridError),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Progress bar template could not be built.
    #[error("Progress display error: {0}")]
    Progress(String),
}

impl From<indicatif::style::TemplateError> for CliError {
    fn from(e: indicatif::style::TemplateError) -> Self {
        CliError::Progress(e.to_string())
    }
}
