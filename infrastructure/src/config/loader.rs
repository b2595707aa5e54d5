//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["restbridge.toml", ".restbridge.toml"];

/// Prefix for environment overrides (`RESTBRIDGE_API__BASE_URL` → `api.base_url`)
pub const ENV_PREFIX: &str = "RESTBRIDGE_";

/// Unprefixed variables of the gateway `.env` convention and the keys they set
const GATEWAY_ENV: [(&str, &str); 3] = [
    ("API_BASE_URL", "api.base_url"),
    ("API_TOKEN", "api.token"),
    ("API_SCHEMA_URL", "routes.url"),
];

/// Values given on the command line; they override every other source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub routes: Option<PathBuf>,
}

impl ConfigOverrides {
    fn apply(&self, mut figment: Figment) -> Figment {
        if let Some(base_url) = &self.base_url {
            figment = figment.merge(Serialized::default("api.base_url", base_url));
        }
        if let Some(token) = &self.token {
            figment = figment.merge(Serialized::default("api.token", token));
        }
        if let Some(routes) = &self.routes {
            figment = figment.merge(Serialized::default("routes.table", routes));
        }
        figment
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Command-line overrides (`--base-url`, `--token`, `--routes`)
    /// 2. Environment: `RESTBRIDGE_*`, nested with `__`
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./restbridge.toml` or `./.restbridge.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/restbridge/config.toml`
    /// 6. Default values
    pub fn load(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path, overrides)
            .extract()
            .map_err(Box::new)
    }

    /// The merged provider chain, before extraction
    pub fn figment(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(Self::gateway_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        overrides.apply(figment)
    }

    /// `API_BASE_URL`, `API_TOKEN` and `API_SCHEMA_URL`, below `RESTBRIDGE_*`
    fn gateway_env() -> Env {
        let names: Vec<&str> = GATEWAY_ENV.iter().map(|(name, _)| *name).collect();
        Env::raw().only(&names).map(|key| {
            GATEWAY_ENV
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map(|(_, path)| (*path).into())
                .unwrap_or_else(|| key.as_str().to_string().into())
        })
    }

    /// Load only default configuration plus overrides (for --no-config)
    pub fn load_defaults(overrides: &ConfigOverrides) -> Result<FileConfig, Box<figment::Error>> {
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        overrides.apply(figment).extract().map_err(Box::new)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/restbridge/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("restbridge").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];
        lines.push(format!("  [     ] Environment: {}*", ENV_PREFIX));
        lines.push(
            "  [     ] Environment: API_BASE_URL, API_TOKEN, API_SCHEMA_URL".to_string(),
        );

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:5}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./restbridge.toml or ./.restbridge.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}
