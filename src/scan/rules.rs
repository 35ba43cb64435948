//! Gitignore-style ignore rules, merged from the project's pattern files.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Names of the pattern files read from the project root, in load order.
/// Both are additive; patterns from one never override the other.
pub const IGNORE_FILE_NAMES: &[&str] = &[".extractignore", ".gitignore"];

/// One merged matcher over every pattern source present at the root.
///
/// Built once per run; pattern-file edits during a run are not observed.
/// With no pattern file present the matcher never ignores anything.
pub struct IgnoreRules {
    matcher: Gitignore,
}

impl IgnoreRules {
    pub fn load(root: &Path) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for name in IGNORE_FILE_NAMES {
            let file = root.join(name);
            if !file.exists() {
                continue;
            }
            if let Some(err) = builder.add(&file) {
                tracing::warn!("failed to read ignore patterns from {}: {}", file.display(), err);
            }
        }

        let matcher = match builder.build() {
            Ok(matcher) => matcher,
            Err(err) => {
                tracing::warn!("failed to build ignore matcher: {}", err);
                Gitignore::empty()
            }
        };
        Self { matcher }
    }

    /// True iff the relative path matches any loaded ignore pattern, either
    /// directly or through an ignored parent directory.
    pub fn ignores(&self, relative_path: &str) -> bool {
        self.matcher.matched_path_or_any_parents(relative_path, false).is_ignore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_pattern_files_never_ignores() {
        let tmp = TempDir::new().unwrap();
        let rules = IgnoreRules::load(tmp.path());
        assert!(!rules.ignores("src/main.rs"));
        assert!(!rules.ignores("anything/at/all.py"));
    }

    #[test]
    fn test_gitignore_patterns_apply() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "*.log\nbuild/\n").unwrap();

        let rules = IgnoreRules::load(tmp.path());
        assert!(rules.ignores("debug.log"));
        assert!(rules.ignores("nested/trace.log"));
        assert!(rules.ignores("build/out.py"));
        assert!(!rules.ignores("src/main.py"));
    }

    #[test]
    fn test_both_files_are_additive() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".extractignore"), "secrets/\n").unwrap();
        fs::write(tmp.path().join(".gitignore"), "*.tmp\n").unwrap();

        let rules = IgnoreRules::load(tmp.path());
        assert!(rules.ignores("secrets/key.py"));
        assert!(rules.ignores("scratch.tmp"));
        assert!(!rules.ignores("src/main.py"));
    }

    #[test]
    fn test_negation_within_one_source() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "*.md\n!README.md\n").unwrap();

        let rules = IgnoreRules::load(tmp.path());
        assert!(rules.ignores("notes.md"));
        assert!(!rules.ignores("README.md"));
    }
}
