use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use war_ledger::api::routes::wars::summarize_war;
use war_ledger::api::state::AppState;
use war_ledger::calculate;
use war_ledger::config::AppConfig;
use war_ledger::models::WarScope;
use war_ledger::storage::{StorageError, WarRepository};

#[derive(Parser)]
#[command(name = "war-ledger")]
#[command(about = "Company war-report ledger and analytics dashboard backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./war-ledger.toml")]
    config: PathBuf,

    /// Directory of war CSV exports (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print one war's summary
    Summary {
        /// Report filename, e.g. MGvK6_11-18-25.csv
        file: String,
    },

    /// Print the company record and long-run averages
    Overview,

    /// Print a player's lifetime profile
    Player { name: String },

    /// Compare a baseline group against every other war
    Synergy {
        /// Baseline report filename
        #[arg(long)]
        war: String,

        /// Baseline group number
        #[arg(long)]
        group: u32,

        /// Wars to compare against: full or all
        #[arg(long, default_value = "full")]
        scope: WarScope,
    },

    /// Compare two players together versus apart
    Pair {
        a: String,
        b: String,

        /// Wars to compare across: full or all
        #[arg(long, default_value = "full")]
        scope: WarScope,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("loading {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn load_repository(config: &AppConfig) -> Result<WarRepository, StorageError> {
    WarRepository::load_dir(
        &config.data_dir,
        &config.ingest.file_pattern,
        config.ingest.dialect,
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting war-ledger v{}", env!("CARGO_PKG_VERSION"));
    if !cli.config.exists() {
        tracing::debug!("No config at {}, using defaults", cli.config.display());
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let repo = match load_repository(&config) {
                Ok(repo) => repo,
                Err(StorageError::PathNotFound(dir)) => {
                    tracing::warn!(
                        "Data directory {} not found, starting empty",
                        dir.display()
                    );
                    WarRepository::new()
                }
                Err(e) => return Err(e.into()),
            };

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            if let Some(dir) = &config.server.static_dir {
                tracing::info!("Serving dashboard assets from {}", dir.display());
            }

            let app = war_ledger::api::build_router(AppState::new(repo, config));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Summary { file } => {
            let repo = load_repository(&config)?;
            let name = Path::new(&file)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&file);
            let Some(war) = repo.get(name) else {
                bail!("No war named {} in {}", name, config.data_dir.display());
            };
            print_json(&summarize_war(war))?;
        }
        Commands::Overview => {
            let repo = load_repository(&config)?;
            let wars: Vec<_> = repo.wars().collect();
            match calculate::company_overview(&wars, config.legacy) {
                Some(overview) => print_json(&overview)?,
                None => println!("No wars loaded from {}", config.data_dir.display()),
            }
        }
        Commands::Player { name } => {
            let repo = load_repository(&config)?;
            let wars = repo.visible_wars(WarScope::All);
            print_json(&calculate::player_profile(&wars, &name))?;
        }
        Commands::Synergy { war, group, scope } => {
            let repo = load_repository(&config)?;
            let Some(baseline) = repo.get(&war) else {
                bail!("No war named {} in {}", war, config.data_dir.display());
            };
            let wars = repo.visible_wars(scope);
            print_json(&calculate::compare_baseline_group(baseline, group, &wars))?;
        }
        Commands::Pair { a, b, scope } => {
            let repo = load_repository(&config)?;
            let wars = repo.visible_wars(scope);
            match calculate::compare_pair(&wars, &a, &b) {
                Some(report) => print_json(&report)?,
                None => bail!("Pick two different, non-empty player names"),
            }
        }
    }

    Ok(())
}
