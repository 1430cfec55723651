mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glpi_batch_core::{load_config, load_env_config, Config};

/// Config file picked up from the working directory when no path is given
const DEFAULT_CONFIG_FILE: &str = "glpi-batch.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Create GLPI tickets in batch from a CSV file", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Configuration file (env: GLPI_BATCH_CONFIG)
    #[arg(long, global = true, env = "GLPI_BATCH_CONFIG")]
    config: Option<PathBuf>,

    /// GLPI API URL, e.g. https://glpi.example.org/apirest.php
    #[arg(long, global = true)]
    url: Option<String>,

    /// Application token
    #[arg(long, global = true)]
    app_token: Option<String>,

    /// User token
    #[arg(long, global = true)]
    user_token: Option<String>,

    /// Verify the server TLS certificate
    #[arg(long, global = true)]
    verify_tls: Option<bool>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the CSV template
    Template {
        /// Destination file
        path: PathBuf,
    },
    /// Validate a CSV file without contacting GLPI
    Check {
        /// CSV file to load
        csv: PathBuf,
    },
    /// Start and end a session to verify the credentials
    TestConnection,
    /// Create one ticket per valid CSV row
    Submit {
        /// CSV file to load
        csv: PathBuf,
    },
    /// Print the effective configuration with tokens redacted
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.log_json);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Template { path } => commands::template(&path),
        Command::Check { csv } => commands::check(&csv),
        Command::TestConnection => commands::test_connection(&resolve_config(&cli.global)?).await,
        Command::Submit { csv } => commands::submit(&resolve_config(&cli.global)?, &csv).await,
        Command::Config => commands::show_config(&resolve_config(&cli.global)?),
    }
}

/// File (explicit or default) and environment, then command line flags.
fn resolve_config(args: &GlobalArgs) -> Result<Config> {
    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None if default_path.exists() => load_config(&default_path)
            .with_context(|| format!("Failed to load config from {:?}", default_path))?,
        None => load_env_config().context("Failed to load config from environment")?,
    };

    if let Some(url) = &args.url {
        config.glpi.url = url.clone();
    }
    if let Some(app_token) = &args.app_token {
        config.glpi.app_token = app_token.clone();
    }
    if let Some(user_token) = &args.user_token {
        config.glpi.user_token = user_token.clone();
    }
    if let Some(verify_tls) = args.verify_tls {
        config.glpi.verify_tls = verify_tls;
    }

    Ok(config)
}
