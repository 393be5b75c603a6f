//! Common constants used throughout hugo-preproc.

/// Supported configuration file names, searched in this order
pub const CONFIG_FILES: [&str; 3] =
    [".hugo-preproc.yaml", ".hugo-preproc.yml", ".hugo-preproc.json"];

/// Environment variable that may point at the configuration file
pub const CONFIG_ENV: &str = "HUGO_PREPROC_CONFIG";

/// Path used when a source leaves its `path` empty
pub const DEFAULT_PATH: &str = ".";

/// Shell used to run rendered commands
pub const SHELL: &str = "sh";

/// Extension marking a `script` value as a reference to a script file
pub const SCRIPT_EXTENSION: &str = ".rhai";

/// Script variable bound to a single matched path
pub const FILE_VAR: &str = "file";

/// Script variable bound to the list of all matched paths
pub const FILES_VAR: &str = "files";

/// Script variable bound to commit data in git processors
pub const GIT_VAR: &str = "git";

/// Length of abbreviated commit hashes
pub const SHORT_HASH_LEN: usize = 7;
