//! Core domain types and fixed classification tables.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_OUTPUT_FILE: &str = "extracted_code.md";
pub const DEFAULT_MAX_FILE_KB: u64 = 1024;

/// Language tags whose files are extracted when no explicit extension rule
/// applies. Tags outside this set are classified but not extracted.
pub const RECOGNIZED_LANGUAGES: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "c",
    "cpp",
    "csharp",
    "go",
    "rust",
    "php",
    "ruby",
    "swift",
    "kotlin",
    "scala",
    "dart",
    "lua",
    "powershell",
    "shellscript",
    "sql",
    "html",
    "css",
    "less",
    "scss",
    "json",
    "xml",
    "yaml",
    "markdown",
    "plaintext",
];

/// Extensions rejected as binary before any content is read.
pub const BINARY_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".svg", ".pdf", ".doc", ".docx", ".ppt",
    ".pptx", ".xls", ".xlsx", ".zip", ".rar", ".7z", ".tar", ".gz", ".exe", ".dll", ".so",
    ".dylib", ".class", ".jar", ".war", ".ear", ".mp3", ".mp4", ".avi", ".mov", ".wmv", ".flv",
];

/// Dependency lock files, matched by exact (case-sensitive) filename.
pub const LOCKFILE_NAMES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "composer.lock",
    "Gemfile.lock",
    "poetry.lock",
    "Cargo.lock",
];

pub fn is_recognized_language(tag: &str) -> bool {
    RECOGNIZED_LANGUAGES.contains(&tag)
}

/// Map a normalized extension (lower-case, leading dot) to a language tag.
///
/// The table is deliberately broader than [`RECOGNIZED_LANGUAGES`]: a file can
/// be classified (e.g. `toml`, `perl`) yet still fall outside the recognized
/// set and be skipped.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    let tag = match ext {
        ".js" | ".mjs" | ".cjs" => "javascript",
        ".jsx" => "javascriptreact",
        ".ts" | ".mts" | ".cts" => "typescript",
        ".tsx" => "typescriptreact",
        ".py" | ".pyi" => "python",
        ".java" => "java",
        ".c" | ".h" => "c",
        ".cpp" | ".cc" | ".cxx" | ".hpp" | ".hh" => "cpp",
        ".cs" => "csharp",
        ".go" => "go",
        ".rs" => "rust",
        ".php" => "php",
        ".rb" => "ruby",
        ".swift" => "swift",
        ".kt" | ".kts" => "kotlin",
        ".scala" => "scala",
        ".dart" => "dart",
        ".lua" => "lua",
        ".ps1" | ".psm1" => "powershell",
        ".sh" | ".bash" | ".zsh" => "shellscript",
        ".sql" => "sql",
        ".html" | ".htm" => "html",
        ".css" => "css",
        ".less" => "less",
        ".scss" => "scss",
        ".json" => "json",
        ".xml" | ".xsd" | ".xsl" => "xml",
        ".yml" | ".yaml" => "yaml",
        ".md" | ".markdown" => "markdown",
        ".rst" => "restructuredtext",
        ".txt" => "plaintext",
        ".toml" => "toml",
        ".ini" | ".cfg" => "ini",
        ".bat" | ".cmd" => "bat",
        ".pl" | ".pm" => "perl",
        ".r" => "r",
        ".vue" => "vue",
        ".svelte" => "svelte",
        _ => return None,
    };
    Some(tag)
}

/// Map a lower-cased extensionless filename to a language tag.
pub fn language_for_filename(name: &str) -> Option<&'static str> {
    // Dot-prefixed ignore files (.gitignore, .dockerignore, ...) carry
    // patterns, not code.
    if name.starts_with('.') && name.ends_with("ignore") {
        return Some("ignore");
    }
    let tag = match name {
        "dockerfile" => "dockerfile",
        "makefile" | "gnumakefile" => "makefile",
        "rakefile" | "gemfile" => "ruby",
        "jenkinsfile" => "groovy",
        _ => return None,
    };
    Some(tag)
}

/// Map a shebang interpreter name to a language tag.
pub fn language_for_interpreter(interpreter: &str) -> Option<&'static str> {
    let tag = match interpreter {
        "sh" | "bash" | "zsh" | "dash" | "ksh" => "shellscript",
        "python" | "python2" | "python3" => "python",
        "node" | "nodejs" => "javascript",
        "ruby" => "ruby",
        "perl" => "perl",
        "pwsh" => "powershell",
        _ => return None,
    };
    Some(tag)
}

/// Fatal run preconditions. Everything else degrades to a per-file skip.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no project directory specified; pass --path or set `path` in the config file")]
    MissingProjectRoot,
    #[error("project directory not found: {0}")]
    RootNotFound(PathBuf),
}

/// Immutable per-run configuration, merged from file and CLI sources before
/// the scan starts. No component reads ambient settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project root to scan.
    pub path: Option<PathBuf>,

    /// Name of the consolidated document, written under the project root.
    pub output_file: String,

    /// Extensions always extracted, normalized to lower-case with a leading
    /// dot. Overridden only by ignore/glob/binary/lockfile rules.
    #[serde(deserialize_with = "extension_list")]
    pub include_extensions: Vec<String>,

    /// Extensions always skipped, same normalization.
    #[serde(deserialize_with = "extension_list")]
    pub exclude_extensions: Vec<String>,

    /// Glob patterns matched against relative paths and skipped.
    #[serde(deserialize_with = "string_list")]
    pub exclude_globs: Vec<String>,

    /// Files larger than this many kilobytes are skipped unless their
    /// extension is explicitly included.
    pub max_file_size_kb: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            include_extensions: Vec::new(),
            exclude_extensions: Vec::new(),
            exclude_globs: Vec::new(),
            max_file_size_kb: DEFAULT_MAX_FILE_KB,
        }
    }
}

/// Normalize one user-supplied extension token: trim, lower-case, leading dot.
/// Returns `None` for empty tokens.
pub fn normalize_extension(token: &str) -> Option<String> {
    let token = token.trim().trim_start_matches('.').to_ascii_lowercase();
    if token.is_empty() {
        None
    } else {
        Some(format!(".{token}"))
    }
}

/// Accepts either a list of strings or one comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_tokens(self) -> Vec<String> {
        match self {
            Self::One(s) => s.split(',').map(str::to_string).collect(),
            Self::Many(v) => v,
        }
    }
}

fn extension_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = StringOrList::deserialize(deserializer)?;
    Ok(raw.into_tokens().iter().filter_map(|t| normalize_extension(t)).collect())
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = StringOrList::deserialize(deserializer)?;
    Ok(raw
        .into_tokens()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

/// Why a candidate was not extracted. Mirrors the decision pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    ExcludedGlob,
    ExcludedExtension,
    BinaryExtension,
    Lockfile,
    TooLarge,
    UnrecognizedLanguage,
    Unreadable,
}

/// One extracted file: relative path, resolved language tag, full text.
#[derive(Debug, Clone)]
pub struct AcceptedFile {
    pub relative_path: String,
    pub language: String,
    pub content: String,
    pub size_bytes: u64,
}

/// Per-run counters. Diagnostic only; never part of the document artifact.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub files_processed: usize,
    pub files_extracted: usize,
    pub skipped_ignored: usize,
    pub skipped_glob: usize,
    pub skipped_extension: usize,
    pub skipped_binary: usize,
    pub skipped_lockfile: usize,
    pub skipped_size: usize,
    pub skipped_language: usize,
    pub skipped_unreadable: usize,
    pub total_bytes_extracted: u64,
    pub languages: BTreeMap<String, usize>,
}

impl ScanStats {
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Ignored => self.skipped_ignored += 1,
            SkipReason::ExcludedGlob => self.skipped_glob += 1,
            SkipReason::ExcludedExtension => self.skipped_extension += 1,
            SkipReason::BinaryExtension => self.skipped_binary += 1,
            SkipReason::Lockfile => self.skipped_lockfile += 1,
            SkipReason::TooLarge => self.skipped_size += 1,
            SkipReason::UnrecognizedLanguage => self.skipped_language += 1,
            SkipReason::Unreadable => self.skipped_unreadable += 1,
        }
    }

    pub fn record_extracted(&mut self, file: &AcceptedFile) {
        self.files_extracted += 1;
        self.total_bytes_extracted += file.size_bytes;
        *self.languages.entry(file.language.clone()).or_insert(0) += 1;
    }

    pub fn files_skipped(&self) -> usize {
        self.skipped_ignored
            + self.skipped_glob
            + self.skipped_extension
            + self.skipped_binary
            + self.skipped_lockfile
            + self.skipped_size
            + self.skipped_language
            + self.skipped_unreadable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tables_cover_recognized_set() {
        // Every tag produced by the extension table for core code extensions
        // must be recognized, while classification-only tags must not be.
        assert!(is_recognized_language(language_for_extension(".rs").unwrap()));
        assert!(is_recognized_language(language_for_extension(".py").unwrap()));
        assert!(!is_recognized_language(language_for_extension(".toml").unwrap()));
        assert!(!is_recognized_language(language_for_extension(".jsx").unwrap()));
        assert!(language_for_extension(".weird").is_none());
    }

    #[test]
    fn test_ignore_files_classify_as_ignore() {
        assert_eq!(language_for_filename(".gitignore"), Some("ignore"));
        assert_eq!(language_for_filename(".dockerignore"), Some("ignore"));
        assert!(!is_recognized_language("ignore"));
        assert_eq!(language_for_filename("dockerfile"), Some("dockerfile"));
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("py").as_deref(), Some(".py"));
        assert_eq!(normalize_extension(".PY").as_deref(), Some(".py"));
        assert_eq!(normalize_extension("  ts  ").as_deref(), Some(".ts"));
        assert_eq!(normalize_extension("  "), None);
        assert_eq!(normalize_extension("."), None);
    }

    #[test]
    fn test_config_deserializes_comma_separated_extensions() {
        let cfg: Config = toml::from_str("include_extensions = \"py, js,  TS\"\n").unwrap();
        assert_eq!(cfg.include_extensions, vec![".py", ".js", ".ts"]);
    }

    #[test]
    fn test_config_deserializes_extension_array() {
        let cfg: Config = toml::from_str("exclude_extensions = [\".py\", \"js\", \"  ts  \"]\n")
            .unwrap();
        assert_eq!(cfg.exclude_extensions, vec![".py", ".js", ".ts"]);
    }

    #[test]
    fn test_config_rejects_mixed_type_list() {
        let result: Result<Config, _> = toml::from_str("include_extensions = [\".py\", 123]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_record_skip_buckets() {
        let mut stats = ScanStats::default();
        stats.record_skip(SkipReason::Ignored);
        stats.record_skip(SkipReason::BinaryExtension);
        stats.record_skip(SkipReason::BinaryExtension);
        assert_eq!(stats.skipped_ignored, 1);
        assert_eq!(stats.skipped_binary, 2);
        assert_eq!(stats.files_skipped(), 3);
    }
}
