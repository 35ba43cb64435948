//! Output rendering: the consolidated Markdown document.

pub mod document;

pub use document::{render_document, write_document};
