//! CLI entrypoint for restbridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod logging;
mod serve;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use commands::{Cli, Command};
use restbridge_application::{
    BuildRegistryInput, BuildRegistryUseCase, DocumentationSinkPort, EmitDocumentationUseCase,
    ToolSchemaPort,
};
use restbridge_domain::{Arguments, BuildError, ToolRegistry};
use restbridge_infrastructure::{
    ConfigLoader, FileConfig, HttpApiInvoker, JsonSchemaToolConverter, LocalToolHost,
    MarkdownDocumentation, RouteTableLoader, docs::render_markdown,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command.clone() else {
        bail!("No command given. Run with --help for usage.");
    };

    let config = load_config(&cli)?;
    info!("Starting restbridge against {}", config.api.base_url);

    // === Dependency Injection ===
    let invoker = Arc::new(
        HttpApiInvoker::from_config(&config.api).context("Failed to create HTTP client")?,
    );
    let use_case = BuildRegistryUseCase::new(invoker);
    let input = build_input(&config).await?;

    match command {
        Command::Tools { json } => {
            let output = use_case.describe(&input)?;
            print_tools(&output.registry, json)?;
        }
        Command::Schema => {
            let output = use_case.describe(&input)?;
            let schemas = JsonSchemaToolConverter.all_tools_schema(&output.registry);
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
        Command::Docs { output: target } => {
            let output = use_case.describe(&input)?;
            let target = target.unwrap_or_else(|| config.docs.path.clone());
            if target == Path::new("-") {
                print!("{}", render_markdown(&output.registry));
            } else {
                MarkdownDocumentation::new(&target).emit(&output.registry)?;
                eprintln!("Wrote {}", target.display());
            }
        }
        Command::Call { tool, arguments } => {
            let arguments = parse_arguments(&arguments)?;
            let mut host = LocalToolHost::new();
            use_case.execute(&input, &mut host)?;

            let result = host.invoke(&tool, arguments).await;
            println!("{}", result.render());
            if !result.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Serve => {
            let mut host = LocalToolHost::new();
            let output = use_case.execute(&input, &mut host)?;

            if config.docs.enabled {
                let sink = MarkdownDocumentation::new(&config.docs.path);
                EmitDocumentationUseCase::new(&sink).execute(&output.registry);
            }

            let tools = serve::tool_listing(&output.registry);
            let shutdown = CancellationToken::new();
            let on_interrupt = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, cancelling in-flight calls");
                    on_interrupt.cancel();
                }
            });

            serve::serve(
                Arc::new(host),
                tools,
                serve::stdin_lines()?,
                tokio::io::stdout(),
                shutdown,
            )
            .await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load and validate configuration; errors abort, warnings are logged
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let overrides = cli.overrides();
    let config = if cli.no_config {
        ConfigLoader::load_defaults(&overrides)
    } else {
        ConfigLoader::load(cli.config.as_deref(), &overrides)
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    let issues = config.validate();
    let mut failed = false;
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue.message);
            failed = true;
        } else {
            warn!("{}", issue.message);
        }
    }
    if failed {
        bail!("Invalid configuration (see errors above)");
    }

    Ok(config)
}

async fn build_input(config: &FileConfig) -> Result<BuildRegistryInput> {
    let source = config
        .routes
        .source()
        .ok_or_else(|| anyhow!("No route table configured"))?;

    let loader = RouteTableLoader::new(config.api.timeout())?;
    let table = loader.load(&source).await.map_err(BuildError::from)?;
    info!("Loaded route table from {}", source);

    let (policy, _) = config.query.parse_policy();
    Ok(BuildRegistryInput::new(table).with_policy(policy))
}

fn parse_arguments(raw: &str) -> Result<Arguments> {
    match serde_json::from_str::<serde_json::Value>(raw).context("Arguments are not valid JSON")? {
        serde_json::Value::Object(map) => Ok(map),
        other => bail!("Arguments must be a JSON object, got: {}", other),
    }
}

fn print_tools(registry: &ToolRegistry, json: bool) -> Result<()> {
    if json {
        let tools: Vec<_> = registry.sorted();
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    let width = registry.names().map(str::len).max().unwrap_or(0);
    for tool in registry.sorted() {
        println!(
            "{:width$}  {:<6} {} {}",
            tool.name,
            tool.verb.as_str(),
            tool.path_template,
            tool.signature(),
            width = width
        );
    }
    Ok(())
}
