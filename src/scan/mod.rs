//! File selection and traversal: classification, ignore rules, the
//! inclusion pipeline, the concurrent scanner and the tree builder.

use crate::domain::Config;
use anyhow::Result;
use std::path::Path;

pub mod classify;
pub mod decide;
pub mod rules;
pub mod scanner;
pub mod tree;

pub use scanner::{CancelFlag, FileScanner, Progress, ScanOutcome};

/// Scan `root` with `config` and no progress reporting or cancellation.
pub fn scan_project<P: AsRef<Path>>(root: P, config: Config) -> Result<ScanOutcome> {
    FileScanner::new(root.as_ref().to_path_buf(), config).scan(&CancelFlag::new(), None)
}
