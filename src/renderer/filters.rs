use chrono::DateTime;
use log::warn;
use minijinja::{Error, ErrorKind};
use regex::Regex;
use std::fmt::Write;
use std::path::Path;

// Re-export the case conversion functions
pub use cruet::case::{
    camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
    screaming_snake::to_screaming_snake_case, snake::to_snake_case, title::to_title_case,
    train::to_train_case,
};

fn invalid(message: String) -> Error {
    Error::new(ErrorKind::InvalidOperation, message)
}

pub fn trim_prefix(val: &str, prefix: &str) -> String {
    val.strip_prefix(prefix).unwrap_or(val).to_string()
}

pub fn trim_suffix(val: &str, suffix: &str) -> String {
    val.strip_suffix(suffix).unwrap_or(val).to_string()
}

pub fn has_prefix(val: &str, prefix: &str) -> bool {
    val.starts_with(prefix)
}

pub fn has_suffix(val: &str, suffix: &str) -> bool {
    val.ends_with(suffix)
}

/// Tests if a string matches a regular expression. Invalid patterns never match.
pub fn matches_regex(val: &str, re: &str) -> bool {
    match Regex::new(re) {
        Ok(re) => re.is_match(val),
        Err(err) => {
            warn!("Invalid regex '{re}': {err}");
            false
        }
    }
}

/// Replaces every match of `re` in `val`; `$1`-style group references are expanded.
pub fn regex_replace(val: &str, re: &str, replacement: &str) -> Result<String, Error> {
    let re = Regex::new(re).map_err(|e| invalid(format!("invalid regex '{re}': {e}")))?;
    Ok(re.replace_all(val, replacement).into_owned())
}

/// Quotes a value for safe use as a single POSIX shell word.
pub fn shell_quote(val: &str) -> String {
    format!("'{}'", val.replace('\'', r"'\''"))
}

pub fn basename(val: &str) -> String {
    Path::new(val)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn dirname(val: &str) -> String {
    Path::new(val)
        .parent()
        .map(|parent| parent.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn extension(val: &str) -> String {
    Path::new(val)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn stem(val: &str) -> String {
    Path::new(val)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Formats a Unix timestamp (UTC) with a strftime-style format, `%Y-%m-%d` by default.
pub fn date(timestamp: i64, format: Option<&str>) -> Result<String, Error> {
    let time = DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| invalid(format!("timestamp {timestamp} is out of range")))?;
    let format = format.unwrap_or("%Y-%m-%d");

    let mut out = String::new();
    write!(out, "{}", time.format(format))
        .map_err(|_| invalid(format!("invalid date format '{format}'")))?;
    Ok(out)
}

/// Reads an environment variable, falling back to `default` when it is unset.
pub fn env_function(name: &str, default: Option<String>) -> Option<String> {
    std::env::var(name).ok().or(default)
}
