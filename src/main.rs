mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod render;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, CreateArgs, SetStatusArgs};
use crate::cmd::{CommandOutput, FilterArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::http::TicketApiClient;

#[derive(Parser)]
#[command(name = "ticket-desk", author, version, about = "Support ticket desk client")]
struct Cli {
    /// Base address of the ticket service, e.g. http://localhost:8000/api.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a ticket, letting the classifier fill a missing category or priority.
    Create(CreateArgs),
    /// List tickets matching the given filters.
    List(FilterArgs),
    /// Change a ticket's status and print the refreshed list.
    SetStatus(SetStatusArgs),
    /// Show aggregate ticket statistics.
    Stats,
    /// Interactive session with live list, stats and ticket form.
    Session,
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

async fn run() -> AppResult<bool> {
    let Cli { base_url, command } = Cli::parse();

    let output = match command {
        Commands::Config(args) => {
            config_cmd::run(args.command, base_url)?;
            return Ok(true);
        }
        Commands::Create(args) => ticket::create(&connect(base_url)?, args).await?,
        Commands::List(filters) => ticket::list(&connect(base_url)?, filters).await?,
        Commands::SetStatus(args) => ticket::set_status(&connect(base_url)?, args).await?,
        Commands::Stats => cmd::stats::run(&connect(base_url)?).await?,
        Commands::Session => {
            cmd::session::run(&connect(base_url)?).await?;
            return Ok(true);
        }
    };

    Ok(report(output))
}

/// Loads the effective configuration, starts logging and wires the HTTP
/// client into a fresh context.
fn connect(base_url: Option<String>) -> AppResult<AppContext> {
    let config = AppConfig::load(base_url)?;
    logging::init_logging(&config.log_level);
    tracing::debug!(base_url = %config.base_url, "configuration loaded");

    let client = Arc::new(TicketApiClient::new(
        &config.base_url,
        config.request_timeout,
    )?);
    Ok(AppContext::new(config, client.clone(), client))
}

fn report(output: CommandOutput) -> bool {
    if output.success {
        print!("{}", output.text);
    } else {
        eprint!("{}", output.text);
    }
    output.success
}
