//! Inventory Analytics Dashboard - command-line tool
//!
//! Loads a CSV, JSON or Excel inventory export and prints the dashboard surfaces:
//! the full filtered view, the turnover ranking, or summary statistics.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_dashboard_cli::cli::Cli;
use inventory_dashboard_cli::{commands, Config};

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "inv_dash=info,inventory_dashboard_cli=info,shared=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing::debug!("Environment: {}", config.environment);

    let cli = Cli::parse();
    let output = commands::run(&cli.command, &config)?;
    println!("{}", output);

    Ok(())
}
