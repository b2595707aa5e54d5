//! CLI command definitions

use clap::{Parser, Subcommand};
use restbridge_infrastructure::ConfigOverrides;
use std::path::PathBuf;

/// CLI arguments for restbridge
#[derive(Parser, Debug)]
#[command(name = "restbridge")]
#[command(author, version, about = "Expose a REST API's routes as callable agent tools")]
#[command(long_about = r#"
restbridge reads a REST API's route table and turns every route × verb into a
named tool with a typed parameter list. Calls to a tool become one HTTP
request against the API.

Configuration files are loaded from (in priority order):
1. --base-url / --token / --routes          Command-line overrides
2. RESTBRIDGE_* environment variables       (RESTBRIDGE_API__TOKEN → api.token)
3. API_BASE_URL / API_TOKEN / API_SCHEMA_URL
4. --config <path>                          Explicit config file
5. ./restbridge.toml                        Project-level config
6. ~/.config/restbridge/config.toml         Global config

Example:
  restbridge --routes routes.toml tools
  restbridge --routes routes.toml call task_retrieve '{"pk": 7}'
  restbridge --routes routes.toml --token "$API_TOKEN" serve
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files and environment
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Base URL of the backing API
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// API token, sent as `Authorization: Token <TOKEN>`
    #[arg(long, value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// Route table file (.toml or .json)
    #[arg(long, value_name = "PATH", global = true)]
    pub routes: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            routes: self.routes.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the generated tools
    Tools {
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the JSON Schema of every tool
    Schema,

    /// Write the markdown tool table
    Docs {
        /// Output file ("-" for stdout); defaults to docs.path
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Call one tool and print its result
    Call {
        /// Tool name, e.g. task_retrieve
        tool: String,

        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        arguments: String,
    },

    /// Serve the tools as an MCP server over stdin/stdout
    Serve,
}
