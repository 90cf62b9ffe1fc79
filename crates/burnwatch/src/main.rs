// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Burnwatch - terminal dashboard for metered API usage.
//!
//! This is the binary entry point for the Burnwatch client.

use std::sync::Arc;

use burnwatch_api::{MockDataSource, UsageApiClient, UsageDataSource};
use burnwatch_config::model::BurnwatchConfig;
use burnwatch_settings::SettingsStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod plan;
mod render;
mod sessions;
mod status;
mod watch;

/// Burnwatch - terminal dashboard for metered API usage.
#[derive(Parser, Debug)]
#[command(name = "burnwatch", version, about, long_about = None)]
struct Cli {
    /// Emit structured JSON instead of formatted output.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colors and decorations.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the current session, today's totals, and burn rate.
    Status,
    /// Show consumption against plan limits.
    Plan {
        /// Plan to measure against (defaults to the saved setting).
        #[arg(long)]
        plan: Option<String>,
    },
    /// List recent usage sessions.
    Sessions {
        /// Maximum number of sessions to show.
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Live view that follows polling and realtime updates.
    Watch,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match burnwatch_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            burnwatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let settings = SettingsStore::load(config.settings.resolved_path());

    let source: Arc<dyn UsageDataSource> = if config.mock.enabled {
        Arc::new(MockDataSource::new())
    } else {
        match UsageApiClient::new(&config.api) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                eprintln!("burnwatch: {err}");
                std::process::exit(1);
            }
        }
    };

    let result = match cli.command {
        Some(Commands::Status) => status::run_status(source.as_ref(), cli.json, cli.plain).await,
        Some(Commands::Plan { plan }) => {
            let plan = plan.unwrap_or_else(|| settings.snapshot().plan.clone());
            plan::run_plan(source.as_ref(), &plan, cli.json, cli.plain).await
        }
        Some(Commands::Sessions { limit }) => {
            sessions::run_sessions(source.as_ref(), limit, cli.json, cli.plain).await
        }
        Some(Commands::Watch) => {
            let plan = settings.snapshot().plan.clone();
            watch::run_watch(&config, source, plan, cli.plain).await
        }
        Some(Commands::Config) => {
            print_config(&config, cli.json);
            Ok(())
        }
        None => {
            println!("burnwatch: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("burnwatch: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &BurnwatchConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_config(config: &BurnwatchConfig, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(config).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        match toml::to_string_pretty(config) {
            Ok(rendered) => print!("{rendered}"),
            Err(err) => eprintln!("burnwatch: could not render config: {err}"),
        }
    }
}
