//! Extract command implementation

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;

use super::utils::parse_csv;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::ScanError;
use crate::render::{render_document, write_document};
use crate::scan::tree::render_tree;
use crate::scan::{CancelFlag, FileScanner, Progress, ScanOutcome};

#[derive(Args)]
pub struct ExtractArgs {
    /// Project directory to scan
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Path to config file (code-extract.toml or .code-extract.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Always extract these extensions (comma-separated, e.g. '.proto,.cfg')
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

    /// Name of the output document, written under the project root
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<String>,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_anchor = match args.path.as_ref() {
        Some(path) if path.exists() => path.canonicalize().unwrap_or_else(|_| cwd.clone()),
        _ => cwd.clone(),
    };

    let file_config = load_config(&config_anchor, args.config.as_deref())?;
    let merged = merge_cli_with_config(
        file_config,
        CliOverrides {
            path: args.path.clone(),
            output_file: args.output.clone(),
            include_extensions: parse_csv(&args.include_ext),
            exclude_extensions: parse_csv(&args.exclude_ext),
            exclude_globs: parse_csv(&args.exclude_glob),
            max_file_size_kb: args.max_file_kb,
        },
    );

    let root = merged.path.clone().ok_or(ScanError::MissingProjectRoot)?;
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root).into());
    }
    let root = root.canonicalize()?;

    let bar = if std::io::stderr().is_terminal() {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("Extracting {bar:40} {pos:>4}/{len:4} {msg}")
                .expect("valid progress template"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let cancel = CancelFlag::new();
    let on_progress = |progress: Progress<'_>| {
        if bar.length() != Some(progress.total as u64) {
            bar.set_length(progress.total as u64);
        }
        bar.set_position(progress.processed as u64);
        bar.set_message(progress.relative_path.to_string());
    };

    let scanner = FileScanner::new(root.clone(), merged.clone());
    let outcome = scanner.scan(&cancel, Some(&on_progress))?;
    bar.finish_and_clear();

    if outcome.cancelled {
        println!(
            "Code extraction cancelled. Processed {} files, extracted {}.",
            outcome.stats.files_processed, outcome.stats.files_extracted
        );
        return Ok(());
    }

    if outcome.files.is_empty() {
        println!("No files were processed. Check your ignore settings and file types.");
        return Ok(());
    }

    let relative_paths: Vec<&str> =
        outcome.files.iter().map(|f| f.relative_path.as_str()).collect();
    let tree = render_tree(&relative_paths);
    let document = render_document(&tree, &outcome.files);
    let output_path = root.join(&merged.output_file);
    write_document(&output_path, &document)?;

    println!(
        "Code extraction complete. Processed {} files, extracted {} to {}.",
        outcome.stats.files_processed,
        outcome.stats.files_extracted,
        merged.output_file
    );
    print_skip_breakdown(&outcome);

    Ok(())
}

fn print_skip_breakdown(outcome: &ScanOutcome) {
    let stats = &outcome.stats;
    if stats.files_skipped() == 0 {
        return;
    }

    println!("Files skipped:");
    let rows = [
        ("ignore rules", stats.skipped_ignored),
        ("exclude globs", stats.skipped_glob),
        ("extension", stats.skipped_extension),
        ("binary", stats.skipped_binary),
        ("lockfile", stats.skipped_lockfile),
        ("size limit", stats.skipped_size),
        ("language", stats.skipped_language),
        ("unreadable", stats.skipped_unreadable),
    ];
    for (label, count) in rows {
        if count > 0 {
            println!("  {label}: {count}");
        }
    }
}
