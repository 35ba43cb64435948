//! Path normalization

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes so relative paths compare and
    // render identically across platforms.
    path.replace('\\', "/")
}
