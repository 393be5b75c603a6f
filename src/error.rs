//! Error handling for hugo-preproc.
//! Defines the error type shared by every stage of the processor pipeline.

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for hugo-preproc operations.
///
/// Foreign errors are wrapped as-is; failures raised while running a processor
/// are wrapped once more in [`Error::ProcessorError`] so the operator can tell
/// which processor, commit or file they came from.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file '{path}'. Original error: {reason}")]
    ConfigParseError { path: String, reason: String },

    #[error("No configuration file found. Tried: {config_files}.")]
    ConfigNotFoundError { config_files: String },

    /// Every invalid or conflicting processor found in the configuration.
    #[error("Configuration error: {}.", .0.join("; "))]
    ConfigError(Vec<String>),

    #[error("Invalid glob pattern. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Failed to walk directory. Original error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Git error. Original error: {0}")]
    Git2Error(#[from] git2::Error),

    #[error("Repository '{path}' has no commits.")]
    EmptyRepositoryError { path: String },

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Failed to build template context. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to compile script. Original error: {0}")]
    ScriptParseError(#[from] rhai::ParseError),

    #[error("Script execution failed. Original error: {0}")]
    ScriptError(String),

    /// When the command has executed but finished with an error.
    #[error("Command '{command}' failed with status: {status}")]
    CommandError { command: String, status: ExitStatus },

    #[error("{context}: {source}")]
    ProcessorError {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps the error with a description of where it happened.
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        Error::ProcessorError { context: context.into(), source: Box::new(self) }
    }
}

/// Convenience type alias for Results with hugo-preproc's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("error: {}", err);
    std::process::exit(1);
}
