//! Configuration loading and merging
//!
//! Settings come from an optional config file discovered at the project
//! root (or passed explicitly) and from CLI flags, with CLI values taking
//! precedence. The merged result is the immutable per-run configuration.

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};
