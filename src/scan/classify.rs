//! Cheap path-level classification: extension normalization, binary and
//! lockfile lookups, size gate. No content is read here.

use crate::domain::{BINARY_EXTENSIONS, LOCKFILE_NAMES};
use std::io;
use std::path::Path;

/// Lower-cased extension with a leading dot, or an empty string when the
/// path has none. Recomputed per query; normalization is cheaper than any
/// cache shared across runs would be safe.
pub fn normalized_extension(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_ascii_lowercase()),
        _ => String::new(),
    }
}

/// True iff the normalized extension is in the fixed binary set.
pub fn is_binary_extension(path: &Path) -> bool {
    let ext = normalized_extension(path);
    !ext.is_empty() && BINARY_EXTENSIONS.contains(&ext.as_str())
}

/// True iff the final path segment is a known lockfile, matched exactly and
/// case-sensitively.
pub fn is_lockfile_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| LOCKFILE_NAMES.contains(&name))
        .unwrap_or(false)
}

/// True iff the file's byte size fits within `max_kb` kilobytes. A file of
/// exactly `max_kb * 1024` bytes is allowed. Metadata failures propagate.
pub fn is_size_allowed(path: &Path, max_kb: u64) -> io::Result<bool> {
    let size = path.metadata()?.len();
    Ok(size <= max_kb.saturating_mul(1024))
}
