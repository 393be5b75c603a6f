//! Configuration handling for hugo-preproc.
//! This module discovers and parses the configuration file and validates it into
//! the [`ProcessorConfig`] the pipeline runs from. Validation happens once, before
//! any processor executes.

use crate::constants::{CONFIG_FILES, DEFAULT_PATH, SCRIPT_EXTENSION};
use crate::error::{Error, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration file as written by the operator.
///
/// Every field defaults to empty; an empty string means "not set".
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub git: Vec<RawGitSource>,
    #[serde(default)]
    pub exec: Vec<RawExecSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGitSource {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub processors: Vec<RawGitProcessor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGitProcessor {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub script: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawExecSource {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub mode: String,
}

/// Which commits a git processor runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitMode {
    /// Once, against the head commit.
    Head,
    /// Once per commit, head to root.
    Each,
    /// Once, against the whole history.
    All,
}

impl FromStr for GitMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "head" => Ok(GitMode::Head),
            "each" => Ok(GitMode::Each),
            "all" => Ok(GitMode::All),
            other => Err(format!("invalid git processor mode '{other}'; should be head/each/all")),
        }
    }
}

impl fmt::Display for GitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitMode::Head => write!(f, "head"),
            GitMode::Each => write!(f, "each"),
            GitMode::All => write!(f, "all"),
        }
    }
}

/// How an exec script receives the matched files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptMode {
    /// One run per file, `file` bound to the path.
    #[default]
    Each,
    /// A single run, `files` bound to every path.
    All,
}

impl FromStr for ScriptMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "each" => Ok(ScriptMode::Each),
            "all" => Ok(ScriptMode::All),
            other => Err(format!("invalid exec script mode '{other}'; should be each/all")),
        }
    }
}

impl fmt::Display for ScriptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptMode::Each => write!(f, "each"),
            ScriptMode::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitAction {
    /// Content template; its output is written to the rendered file path.
    Template(String),
    /// Script source; the script performs its own effects.
    Script(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecAction {
    /// Shell command template, rendered and run once per matched file.
    Command(String),
    Script { body: String, mode: ScriptMode },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitProcessor {
    pub mode: GitMode,
    pub file: String,
    pub action: GitAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    pub path: PathBuf,
    pub processors: Vec<GitProcessor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecSource {
    pub path: PathBuf,
    pub pattern: String,
    pub action: ExecAction,
}

/// Validated configuration. Sources and processors keep their configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub git: Vec<GitSource>,
    pub exec: Vec<ExecSource>,
}

impl ProcessorConfig {
    /// Parses configuration content, trying JSON first and YAML second.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = match serde_json::from_str(content) {
            Ok(raw) => raw,
            Err(_) => serde_yaml::from_str(content).map_err(|e| Error::ConfigParseError {
                path: "<inline>".to_string(),
                reason: e.to_string(),
            })?,
        };
        Self::from_raw(raw)
    }

    /// Validates the raw configuration.
    ///
    /// All problems are collected before returning, so a single run reports every
    /// conflicting processor rather than only the first one.
    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let mut problems = Vec::new();
        let mut config = ProcessorConfig::default();

        for (i, source) in raw.git.into_iter().enumerate() {
            let mut processors = Vec::new();
            for (j, processor) in source.processors.into_iter().enumerate() {
                match validate_git_processor(processor) {
                    Ok(Some(processor)) => processors.push(processor),
                    Ok(None) => warn!("git {i}: processor {j}: no mode set; skipping"),
                    Err(e) => problems.push(format!("git {i}: processor {j}: {e}")),
                }
            }
            config.git.push(GitSource { path: default_path(&source.path), processors });
        }

        for (i, source) in raw.exec.into_iter().enumerate() {
            match validate_exec_source(source) {
                Ok(source) => config.exec.push(source),
                Err(e) => problems.push(format!("exec {i}: {e}")),
            }
        }

        if !problems.is_empty() {
            return Err(Error::ConfigError(problems));
        }

        debug!(
            "Validated configuration: {} git source(s), {} exec source(s)",
            config.git.len(),
            config.exec.len()
        );
        Ok(config)
    }
}

fn default_path(path: &str) -> PathBuf {
    if path.is_empty() {
        PathBuf::from(DEFAULT_PATH)
    } else {
        PathBuf::from(path)
    }
}

fn validate_git_processor(raw: RawGitProcessor) -> std::result::Result<Option<GitProcessor>, String> {
    if !raw.template.is_empty() && !raw.script.is_empty() {
        return Err("config conflict; both template and script defined".to_string());
    }
    if raw.mode.is_empty() {
        return Ok(None);
    }
    let mode = raw.mode.parse::<GitMode>()?;
    let action = if raw.script.is_empty() {
        if raw.file.is_empty() {
            return Err("a file is required when rendering a template".to_string());
        }
        GitAction::Template(raw.template)
    } else {
        GitAction::Script(resolve_script(&raw.script)?)
    };
    Ok(Some(GitProcessor { mode, file: raw.file, action }))
}

fn validate_exec_source(raw: RawExecSource) -> std::result::Result<ExecSource, String> {
    let action = match (raw.command.is_empty(), raw.script.is_empty()) {
        (false, false) => {
            return Err("config conflict; both command and script defined".to_string())
        }
        (true, true) => return Err("either a command or a script is required".to_string()),
        (false, true) => ExecAction::Command(raw.command),
        (true, false) => ExecAction::Script {
            body: resolve_script(&raw.script)?,
            mode: raw.mode.parse::<ScriptMode>()?,
        },
    };
    if raw.pattern.is_empty() {
        return Err("a pattern is required".to_string());
    }
    Ok(ExecSource { path: default_path(&raw.path), pattern: raw.pattern, action })
}

/// Returns the script source, reading it from disk when `script` names a script file.
fn resolve_script(script: &str) -> std::result::Result<String, String> {
    let candidate = script.trim();
    if candidate.lines().count() == 1 && candidate.ends_with(SCRIPT_EXTENSION) {
        debug!("Reading script from {candidate}");
        return std::fs::read_to_string(candidate)
            .map_err(|e| format!("cannot read script '{candidate}': {e}"));
    }
    Ok(script.to_string())
}

/// Directories searched for a configuration file when none is given.
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    match dirs::home_dir() {
        Some(home) => dirs.push(home),
        None => debug!("No home directory found; looking for config file only in current directory"),
    }
    dirs.push(PathBuf::from(DEFAULT_PATH));
    dirs
}

/// Finds the first configuration file in `dirs`.
pub fn find_config<P: AsRef<Path>>(dirs: &[P]) -> Result<PathBuf> {
    for dir in dirs {
        for name in CONFIG_FILES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    let tried = dirs
        .iter()
        .flat_map(|dir| CONFIG_FILES.iter().map(move |name| dir.as_ref().join(name)))
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>();
    Err(Error::ConfigNotFoundError { config_files: tried.join(", ") })
}

/// Loads and validates the configuration.
///
/// # Arguments
/// * `explicit` - Path given on the command line, if any
///
/// # Returns
/// * `Result<(PathBuf, ProcessorConfig)>` - The file used and its validated content
pub fn load_config(explicit: Option<&Path>) -> Result<(PathBuf, ProcessorConfig)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_config(&search_dirs())?,
    };
    debug!("Loading configuration from {}", path.display());

    let content = std::fs::read_to_string(&path)?;
    let config = ProcessorConfig::parse(&content).map_err(|e| match e {
        Error::ConfigParseError { reason, .. } => {
            Error::ConfigParseError { path: path.display().to_string(), reason }
        }
        other => other,
    })?;
    Ok((path, config))
}
