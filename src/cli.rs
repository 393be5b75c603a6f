//! Command-line interface implementation for hugo-preproc.
//! Provides argument parsing using clap.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::constants::CONFIG_ENV;

/// Command-line arguments structure for hugo-preproc.
#[derive(Parser, Debug)]
#[command(
    name = "hugo-preproc",
    version,
    disable_version_flag = true,
    about = "A preprocessor for Hugo",
    long_about = "hugo-preproc is a pre-processor for Hugo that allows for configured\nprocessors to be run on the Hugo datafiles."
)]
pub struct Args {
    /// Config file (default is $HOME/.hugo-preproc.yaml, then ./.hugo-preproc.yaml)
    #[arg(short, long, value_name = "FILE", env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for invalid arguments
pub fn get_args() -> Args {
    Args::parse()
}
