//! Documentation artifacts

mod markdown;

pub use markdown::{MarkdownDocumentation, render_markdown};
