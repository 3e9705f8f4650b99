mod app_config;
mod client;
mod commands;
mod oauth;
mod render;
mod session;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app_config::AppConfig;
use crate::client::ApiClient;
use crate::session::StoredToken;

#[derive(Parser)]
#[command(name = "jjprep")]
#[command(about = "Push your prep plans to a connected calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the API token (omit to clear it)
    Auth { token: Option<String> },

    /// Show whether a calendar account is connected
    Status,

    /// Connect a calendar account
    Connect,

    /// Preview a plan mapped onto calendar dates
    Preview {
        /// Path to a plan JSON file
        plan: PathBuf,

        /// First day of the plan (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Print every day instead of paging
        #[arg(long)]
        all: bool,
    },

    /// Push a plan to the connected calendar
    Push {
        /// Path to a plan JSON file
        plan: PathBuf,

        /// First day of the plan (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// IANA timezone for the events (defaults to the local timezone)
        #[arg(long)]
        timezone: Option<String>,

        /// Length of each event (e.g. "45m")
        #[arg(long, value_parser = humantime::parse_duration)]
        event_duration: Option<Duration>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Auth { token } => commands::auth::run(token),
        Commands::Status => {
            let (client, _) = build_client()?;
            commands::status::run(&client).await
        }
        Commands::Connect => {
            let (client, config) = build_client()?;
            commands::connect::run(&client, config.redirect_port).await
        }
        Commands::Preview { plan, start, all } => commands::preview::run(&plan, &start, all),
        Commands::Push {
            plan,
            start,
            timezone,
            event_duration,
        } => {
            let (client, config) = build_client()?;
            commands::push::run(
                &client,
                config.redirect_port,
                &plan,
                &start,
                timezone,
                event_duration,
            )
            .await
        }
    }
}

fn build_client() -> Result<(ApiClient, AppConfig)> {
    let config = AppConfig::load()?;
    let client = ApiClient::new(config.api_root.clone(), Arc::new(StoredToken))?;

    Ok((client, config))
}
