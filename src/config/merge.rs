//! CLI-over-file configuration merging.

use crate::domain::{normalize_extension, Config};
use std::path::PathBuf;

/// Values supplied on the command line. `None` means "not given, keep the
/// file/default value".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub path: Option<PathBuf>,
    pub output_file: Option<String>,
    pub include_extensions: Option<Vec<String>>,
    pub exclude_extensions: Option<Vec<String>>,
    pub exclude_globs: Option<Vec<String>>,
    pub max_file_size_kb: Option<u64>,
}

/// Apply CLI overrides on top of the file-sourced config. Extension tokens
/// from the CLI go through the same normalization as file values.
pub fn merge_cli_with_config(mut config: Config, overrides: CliOverrides) -> Config {
    if let Some(path) = overrides.path {
        config.path = Some(path);
    }
    if let Some(output_file) = overrides.output_file {
        config.output_file = output_file;
    }
    if let Some(tokens) = overrides.include_extensions {
        config.include_extensions =
            tokens.iter().filter_map(|t| normalize_extension(t)).collect();
    }
    if let Some(tokens) = overrides.exclude_extensions {
        config.exclude_extensions =
            tokens.iter().filter_map(|t| normalize_extension(t)).collect();
    }
    if let Some(globs) = overrides.exclude_globs {
        config.exclude_globs = globs;
    }
    if let Some(max_kb) = overrides.max_file_size_kb {
        config.max_file_size_kb = max_kb;
    }
    config
}
