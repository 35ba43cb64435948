//! Concurrent scan orchestration: candidate enumeration, parallel rule
//! evaluation and content reads, cancellation, result merging.

use crate::domain::{AcceptedFile, Config, ScanStats, SkipReason};
use crate::scan::decide::{Decision, Verdict};
use crate::scan::rules::IgnoreRules;
use crate::utils::{normalize_path, read_text};
use anyhow::Result;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Directories never entered during enumeration, regardless of any
/// configured rule.
const DEPENDENCY_DIRS: &[&str] = &["node_modules", ".git"];

/// Cooperative cancellation signal, polled before each file's work is
/// issued. Work already in flight completes and its results are kept.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-file progress report passed to the caller's callback.
#[derive(Debug, Clone)]
pub struct Progress<'a> {
    pub processed: usize,
    pub total: usize,
    pub relative_path: &'a str,
}

/// Result of one run: extracted files in discovery order, the stat
/// counters, and whether the run was cut short.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub files: Vec<AcceptedFile>,
    pub stats: ScanStats,
    pub cancelled: bool,
}

/// Per-candidate result slot. Slots are merged in discovery order once all
/// parallel work has settled, so no shared mutable collection is needed.
enum Slot {
    Extracted(AcceptedFile),
    Skipped(SkipReason),
    NotStarted,
}

pub struct FileScanner {
    root: PathBuf,
    config: Config,
}

impl FileScanner {
    pub fn new(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// Scan the project and collect every extracted file.
    ///
    /// Candidates are enumerated sequentially, then evaluated and read in
    /// parallel. Per-file errors degrade to skips; only enumeration itself
    /// can fail the run. The returned file list is ordered by discovery
    /// (sorted relative path), independent of completion timing, so an
    /// unchanged tree always produces an identical outcome.
    pub fn scan(
        &self,
        cancel: &CancelFlag,
        on_progress: Option<&(dyn Fn(Progress<'_>) + Sync)>,
    ) -> Result<ScanOutcome> {
        let rules = IgnoreRules::load(&self.root);
        let decision = Decision::new(&self.config, &rules);

        let candidates = self.enumerate_candidates();
        let total = candidates.len();
        let processed = AtomicUsize::new(0);

        let slots: Vec<Slot> = candidates
            .par_iter()
            .map(|(path, relative_path)| {
                if cancel.is_cancelled() {
                    return Slot::NotStarted;
                }
                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(report) = on_progress {
                    report(Progress { processed: done, total, relative_path: relative_path.as_str() });
                }

                match decision.decide(path, relative_path) {
                    Verdict::Skip(reason) => Slot::Skipped(reason),
                    Verdict::Extract { language } => match read_text(path) {
                        Ok(content) => Slot::Extracted(AcceptedFile {
                            relative_path: relative_path.clone(),
                            language,
                            size_bytes: content.len() as u64,
                            content,
                        }),
                        Err(err) => {
                            tracing::warn!("failed reading {}: {err}", path.display());
                            Slot::Skipped(SkipReason::Unreadable)
                        }
                    },
                }
            })
            .collect();

        let mut outcome = ScanOutcome {
            cancelled: cancel.is_cancelled(),
            ..ScanOutcome::default()
        };
        for slot in slots {
            match slot {
                Slot::Extracted(file) => {
                    outcome.stats.files_processed += 1;
                    outcome.stats.record_extracted(&file);
                    outcome.files.push(file);
                }
                Slot::Skipped(reason) => {
                    outcome.stats.files_processed += 1;
                    outcome.stats.record_skip(reason);
                }
                Slot::NotStarted => {}
            }
        }
        Ok(outcome)
    }

    /// Enumerate candidate files under the root, skipping dependency and VCS
    /// directories. Gitignore semantics are deliberately not applied here;
    /// the ignore rules evaluate per relative path inside the decision
    /// pipeline. Candidates are sorted by relative path so discovery order
    /// is stable across runs and platforms.
    fn enumerate_candidates(&self) -> Vec<(PathBuf, String)> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .hidden(false)
            .parents(false)
            .follow_links(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
                if !is_dir {
                    return true;
                }
                entry
                    .file_name()
                    .to_str()
                    .map_or(true, |name| !DEPENDENCY_DIRS.contains(&name))
            });

        let mut candidates = Vec::new();
        for entry in builder.build().flatten() {
            let path = entry.path();
            if entry.file_type().map_or(true, |ft| ft.is_dir()) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            let relative_path = normalize_path(&relative.to_string_lossy());
            // The artifact from a previous run is overwritten, never re-scanned.
            if relative_path == self.config.output_file {
                continue;
            }
            candidates.push((path.to_path_buf(), relative_path));
        }

        candidates.sort_by(|a, b| a.1.cmp(&b.1));
        candidates
    }
}
