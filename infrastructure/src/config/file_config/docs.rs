//! Documentation output (`[docs]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDocsConfig {
    /// Write the tool table after every successful build
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for FileDocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("tool_mappings.md"),
        }
    }
}
