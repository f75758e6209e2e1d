use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{DEFAULT_API_BASE_URL, StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring ticketdesk.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        &format!("Support backend URL (default {DEFAULT_API_BASE_URL})"),
        &mut cfg.api_base_url,
    )?;

    let mut timeout = cfg.request_timeout_secs.map(|secs| secs.to_string());
    loop {
        apply_prompt("Request timeout in seconds (0 for none)", &mut timeout)?;
        match timeout.as_deref().map(str::parse::<u64>) {
            None => {
                cfg.request_timeout_secs = None;
                break;
            }
            Some(Ok(secs)) => {
                cfg.request_timeout_secs = Some(secs);
                break;
            }
            Some(Err(_)) => {
                println!("Please enter a whole number of seconds.");
                timeout = cfg.request_timeout_secs.map(|secs| secs.to_string());
            }
        }
    }

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Support backend URL: {}", display_value(&cfg.api_base_url));
    println!(
        "Request timeout: {}",
        cfg.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(|secs| format!("{secs}s"))
            .unwrap_or_else(|| "<not set>".to_string())
    );

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>) -> AppResult<()> {
    match prompt(field, target.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match current {
        Some(value) => write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prompt_actions() {
        assert_eq!(PromptAction::parse("\n"), PromptAction::Keep);
        assert_eq!(PromptAction::parse(" - \n"), PromptAction::Clear);
        assert_eq!(
            PromptAction::parse("http://support.local\n"),
            PromptAction::Set("http://support.local".to_string())
        );
    }

    #[test]
    fn displays_unset_values() {
        assert_eq!(display_value(&None), "<not set>");
        assert_eq!(display_value(&Some(String::new())), "<not set>");
        assert_eq!(display_value(&Some("x".to_string())), "x");
    }
}
