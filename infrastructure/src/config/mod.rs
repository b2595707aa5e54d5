//! Configuration file loading for restbridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Command-line overrides (`--base-url`, `--token`, `--routes`)
//! 2. Environment variables `RESTBRIDGE_*` (`RESTBRIDGE_API__TOKEN` → `api.token`)
//! 3. `--config <path>` specified file
//! 4. Project root: `./restbridge.toml` or `./.restbridge.toml`
//! 5. Global: `$XDG_CONFIG_HOME/restbridge/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{FileApiConfig, FileConfig, FileDocsConfig, FileQueryConfig, FileRoutesConfig};
pub use loader::{ConfigLoader, ConfigOverrides, ENV_PREFIX};
