//! Info command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::utils::{format_with_commas, parse_csv};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::scan::tree::render_tree;
use crate::scan::{scan_project, ScanOutcome};

#[derive(Args)]
pub struct InfoArgs {
    /// Project directory to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Always extract these extensions (comma-separated)
    #[arg(short = 'i', long, value_name = "EXTS")]
    pub include_ext: Option<String>,

    /// Never extract these extensions (comma-separated)
    #[arg(short = 'e', long, value_name = "EXTS")]
    pub exclude_ext: Option<String>,

    /// Skip relative paths matching these globs (comma-separated)
    #[arg(long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Skip files larger than this (kilobytes)
    #[arg(long, value_name = "KB")]
    pub max_file_kb: Option<u64>,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let root = args.path.canonicalize()?;
    if !root.is_dir() {
        anyhow::bail!("path is not a directory: {}", root.display());
    }

    let file_config = load_config(&root, None)?;
    let merged = merge_cli_with_config(
        file_config,
        CliOverrides {
            include_extensions: parse_csv(&args.include_ext),
            exclude_extensions: parse_csv(&args.exclude_ext),
            exclude_globs: parse_csv(&args.exclude_glob),
            max_file_size_kb: args.max_file_kb,
            ..CliOverrides::default()
        },
    );

    let outcome = scan_project(&root, merged)?;

    let project_name = root.file_name().and_then(|n| n.to_str()).unwrap_or("");
    println!("Project: {}", project_name);

    print_languages(&outcome);
    print_statistics(&outcome);

    let relative_paths: Vec<&str> =
        outcome.files.iter().map(|f| f.relative_path.as_str()).collect();
    if !relative_paths.is_empty() {
        println!("\n{}", render_tree(&relative_paths));
    }

    Ok(())
}

fn print_languages(outcome: &ScanOutcome) {
    if outcome.stats.languages.is_empty() {
        return;
    }
    let mut langs: Vec<_> = outcome.stats.languages.iter().collect();
    langs.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    println!("Languages detected:");
    for (lang, count) in langs {
        println!("  {}: {} files", lang, count);
    }
}

fn print_statistics(outcome: &ScanOutcome) {
    let stats = &outcome.stats;
    println!("Statistics:");
    println!("  Files processed: {}", stats.files_processed);
    println!("  Files extracted: {}", stats.files_extracted);
    println!("  Files skipped (ignore rules): {}", stats.skipped_ignored);
    println!("  Files skipped (exclude globs): {}", stats.skipped_glob);
    println!("  Files skipped (extension): {}", stats.skipped_extension);
    println!("  Files skipped (binary): {}", stats.skipped_binary);
    println!("  Files skipped (lockfile): {}", stats.skipped_lockfile);
    println!("  Files skipped (size): {}", stats.skipped_size);
    println!("  Files skipped (language): {}", stats.skipped_language);
    println!("  Files skipped (unreadable): {}", stats.skipped_unreadable);
    println!("  Total bytes extracted: {}", format_with_commas(stats.total_bytes_extracted));
}
