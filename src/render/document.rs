//! Assembly of the consolidated document: title, fenced tree, one fenced
//! section per extracted file.

use crate::domain::AcceptedFile;
use anyhow::{Context, Result};
use std::path::Path;

const TITLE: &str = "# Extracted Code Overview";

/// Build the full document text in memory.
///
/// The tree block and the file sections are driven by the same accepted
/// set; only their presentation order differs (tree order vs discovery
/// order). File contents are embedded exactly as read, untrimmed.
pub fn render_document(tree: &str, files: &[AcceptedFile]) -> String {
    let mut document = format!("{TITLE}\n\n## File Tree\n```\n{tree}```");
    for file in files {
        document.push_str(&format!(
            "\n\n## {}\n\n```{}\n{}\n```",
            file.relative_path, file.language, file.content
        ));
    }
    document.push('\n');
    document
}

/// Write the document with a single overwrite of the target path. Never
/// called with an empty accepted set; the caller signals that case instead.
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    std::fs::write(path, document)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::tree::render_tree;
    use std::fs;
    use tempfile::TempDir;

    fn accepted(path: &str, language: &str, content: &str) -> AcceptedFile {
        AcceptedFile {
            relative_path: path.to_string(),
            language: language.to_string(),
            content: content.to_string(),
            size_bytes: content.len() as u64,
        }
    }

    #[test]
    fn test_render_document_layout() {
        let files = vec![
            accepted("src/main.py", "python", "print('hi')"),
            accepted("app.js", "javascript", "console.log(1);"),
        ];
        let tree = render_tree(&["src/main.py", "app.js"]);
        let document = render_document(&tree, &files);

        assert!(document.starts_with("# Extracted Code Overview\n\n## File Tree\n```\n"));
        // Body sections keep discovery order even though the tree sorts.
        let first = document.find("## src/main.py").unwrap();
        let second = document.find("## app.js").unwrap();
        assert!(first < second);
        assert!(document.contains("\n\n## src/main.py\n\n```python\nprint('hi')\n```"));
        assert!(document.contains("\n\n## app.js\n\n```javascript\nconsole.log(1);\n```"));
        assert!(document.ends_with("```\n"));
    }

    #[test]
    fn test_render_document_preserves_content_exactly() {
        let content = "line one\n\n\tindented\ntrailing spaces   ";
        let files = vec![accepted("a.py", "python", content)];
        let document = render_document(&render_tree(&["a.py"]), &files);
        assert!(document.contains(&format!("```python\n{content}\n```")));
    }

    #[test]
    fn test_render_document_is_deterministic() {
        let files = vec![accepted("x.py", "python", "x = 1\n")];
        let tree = render_tree(&["x.py"]);
        assert_eq!(render_document(&tree, &files), render_document(&tree, &files));
    }

    #[test]
    fn test_write_document_overwrites_previous_artifact() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("extracted_code.md");
        fs::write(&target, "stale artifact from an earlier run").unwrap();

        write_document(&target, "# fresh").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "# fresh");
    }
}
