//! Markdown documentation of the tool registry
//!
//! ```text
//! | name | verb | path | description | signature |
//! | :--- | :--- | :--- | :--- | :--- |
//! | `task_update` | **PUT** | `/tasks/{pk}/` | Update a task. | `(pk: integer, title: string = null)` |
//! ```
//!
//! Rows are sorted by tool name so the artifact is stable across builds.

use restbridge_application::{DocumentationError, DocumentationSinkPort};
use restbridge_domain::{ToolDescriptor, ToolRegistry};
use std::path::{Path, PathBuf};

const HEADER: &str = "| name | verb | path | description | signature |\n| :--- | :--- | :--- | :--- | :--- |\n";

/// Make text safe inside one table cell
fn escape_cell(text: &str) -> String {
    text.replace('\r', "")
        .trim()
        .replace('|', "\\|")
        .replace('\n', "<br>")
}

fn render_row(tool: &ToolDescriptor) -> String {
    format!(
        "| `{}` | **{}** | `{}` | {} | `{}` |\n",
        tool.name,
        tool.verb,
        escape_cell(&tool.path_template),
        escape_cell(&tool.description),
        tool.signature()
    )
}

/// Render the full document
pub fn render_markdown(registry: &ToolRegistry) -> String {
    let mut out = String::from("# Tool mappings\n\n");
    out.push_str(&format!(
        "{} tools generated from the route table.\n\n",
        registry.len()
    ));
    out.push_str(HEADER);
    for tool in registry.sorted() {
        out.push_str(&render_row(tool));
    }
    out
}

/// Writes the rendered table to a file
pub struct MarkdownDocumentation {
    path: PathBuf,
}

impl MarkdownDocumentation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentationSinkPort for MarkdownDocumentation {
    fn target(&self) -> String {
        self.path.display().to_string()
    }

    fn emit(&self, registry: &ToolRegistry) -> Result<(), DocumentationError> {
        std::fs::write(&self.path, render_markdown(registry)).map_err(|source| {
            DocumentationError::Write {
                path: self.target(),
                source,
            }
        })
    }
}
