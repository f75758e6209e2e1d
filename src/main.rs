mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
#[cfg(test)]
mod test_support;
mod workflow;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, SubmitCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::ticket::Priority;
use crate::error::AppResult;
use crate::infra::assistant::AiResponseClient;
use crate::infra::http::build_client;
use crate::infra::tickets::TicketClient;

const LOG_ENV: &str = "TICKETDESK_LOG";

#[derive(Parser)]
#[command(
    name = "ticketdesk",
    author,
    version,
    about = "Submit support tickets and get an AI-generated answer"
)]
struct Cli {
    /// Support backend base URL (overrides config and TICKETDESK_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one ticket; missing fields are prompted for.
    Submit(SubmitArgs),
    /// Show ticket history, then submit tickets until input ends.
    Session,
    /// Show the ticket history.
    History,
    /// Show a single ticket by id.
    Show {
        id: String,
    },
    /// Ask the assistant which category a text belongs to.
    Classify {
        text: String,
    },
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(short, long)]
    subject: Option<String>,
    #[arg(short, long)]
    description: Option<String>,
    /// low, medium or high.
    #[arg(short, long, value_parser = parse_priority)]
    priority: Option<Priority>,
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::from_str(value)
        .ok_or_else(|| format!("unknown priority '{value}' (expected low, medium or high)"))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> AppResult<ExitCode> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            return Ok(ExitCode::SUCCESS);
        }
        command => command,
    };

    let config = AppConfig::load(cli.api_url)?;
    let context = build_context(config)?;

    match command {
        Commands::Submit(args) => {
            let outcome = ticket::submit(
                &context,
                SubmitCommandArgs {
                    subject: args.subject,
                    description: args.description,
                    priority: args.priority,
                },
            )
            .await?;
            if outcome.is_completed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Session => ticket::session(&context).await.map(|_| ExitCode::SUCCESS),
        Commands::History => ticket::history(&context).await.map(|_| ExitCode::SUCCESS),
        Commands::Show { id } => ticket::show(&context, &id)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Classify { text } => ticket::classify(&context, &text)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Config(_) => Ok(ExitCode::SUCCESS),
    }
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    debug!(base_url = %config.api_base_url, timeout = ?config.request_timeout, "using support backend");

    let http = build_client(config.request_timeout)?;
    let ticket_store = Arc::new(TicketClient::new(http.clone(), config.api_base_url.clone()));
    let assistant = Arc::new(AiResponseClient::new(http, config.api_base_url.clone()));

    Ok(AppContext::new(config, ticket_store, assistant))
}
