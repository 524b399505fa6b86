//! Shop 2 CLI - drive a storefront session without a browser.
//!
//! # Usage
//!
//! ```bash
//! # Print the starting catalog
//! shop2 catalog
//!
//! # Print a catalog loaded from a seed file
//! shop2 catalog --path ./catalog.yaml
//!
//! # Replay a scripted session and print the resulting snapshot
//! shop2 run crates/cli/scenarios/provider-checkout.yaml
//! ```
//!
//! # Commands
//!
//! - `catalog` - Show the catalog a new session starts with
//! - `run` - Replay a scenario file against an offline identity provider

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop2_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "shop2")]
#[command(author, version, about = "Shop 2 storefront session driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the catalog a new session starts with
    Catalog {
        /// Seed catalog file (overrides `SHOP2_CATALOG_PATH`)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Replay a scenario file and print the final snapshot
    Run {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Print a snapshot after every step, not just at the end
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    // Sentry goes first so the tracing layer has a client to report to
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr; stdout carries the JSON snapshots
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shop2_storefront=info,shop2_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Catalog { path } => {
            if path.is_some() {
                config.catalog_path = path;
            }
            commands::catalog::show(&config)?;
        }
        Commands::Run { scenario, verbose } => {
            commands::scenario::run(&scenario, config, verbose).await?;
        }
    }
    Ok(())
}
