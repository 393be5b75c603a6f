//! hugo-preproc turns git history and matched files into generated artifacts.
//! Processors are configured in a YAML or JSON file; each one renders templates or
//! runs scripts against the data it selects.

/// Command-line interface module for hugo-preproc
pub mod cli;

/// Common constants
pub mod constants;

/// Configuration discovery, parsing and validation
pub mod config;

/// Error types and handling for hugo-preproc
pub mod error;

/// Commit history access through libgit2
pub mod history;

/// Logger setup
pub mod logger;

/// Recursive file matching by base-name glob
pub mod matcher;

/// Core processor orchestration
/// Runs git and exec processors in configured order
pub mod processor;

/// Template rendering and its function library
pub mod renderer;

/// Embedded scripting, the host list type and importable modules
pub mod script;

/// Shell command execution
pub mod shell;

/// Writing rendered artifacts to disk
pub mod writer;
