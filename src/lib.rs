//! code-extract: consolidate a project's source files into one Markdown overview
//!
//! Scans a directory tree, selects source files through a layered
//! inclusion/exclusion pipeline (ignore rules, extension lists, binary and
//! lockfile tables, size limit, language recognition) and writes a single
//! document holding a rendered file tree plus every selected file's fenced
//! content.

pub mod cli;
pub mod config;
pub mod domain;
pub mod render;
pub mod scan;
pub mod utils;
