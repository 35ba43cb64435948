//! Directory tree rendering from the set of extracted relative paths.

use std::collections::BTreeMap;

/// One level of the name hierarchy. Children are keyed by name, so sibling
/// order is lexicographic by construction and re-inserting an existing name
/// is a no-op.
#[derive(Debug, Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn insert(&mut self, segments: &[&str]) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };
        self.children.entry(first.to_string()).or_default().insert(rest);
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Render the relative paths as an ASCII tree.
///
/// Output is fully determined by the path set; insertion order never shows
/// through. Every line ends with a newline.
pub fn render_tree<S: AsRef<str>>(paths: &[S]) -> String {
    let mut root = TreeNode::default();
    for path in paths {
        let segments: Vec<&str> = path
            .as_ref()
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .collect();
        root.insert(&segments);
    }

    let mut out = String::new();
    render_children(&root, "", &mut out);
    out
}

fn render_children(node: &TreeNode, prefix: &str, out: &mut String) {
    let last_index = node.children.len().saturating_sub(1);
    for (index, (name, child)) in node.children.iter().enumerate() {
        let is_last = index == last_index;
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(name);
        out.push('\n');

        if !child.is_leaf() {
            let extension = if is_last { "    " } else { "│   " };
            render_children(child, &format!("{prefix}{extension}"), out);
        }
    }
}
