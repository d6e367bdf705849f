use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{AppConfig, StoredConfig, config_file_path};
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
    /// Show the stored and the effective configuration.
    Show,
}

pub fn run(command: ConfigCommand, base_url_override: Option<String>) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(base_url_override),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring ticket-desk.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        "Ticket service base URL (e.g., http://localhost:8000/api)",
        &mut cfg.base_url,
    )?;
    apply_number_prompt("Search debounce in milliseconds", &mut cfg.search_debounce_ms)?;
    apply_number_prompt("Request timeout in seconds", &mut cfg.request_timeout_secs)?;
    apply_prompt("Log level (error/warn/info/debug)", &mut cfg.log_level)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show(base_url_override: Option<String>) -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Base URL: {}", display_value(&cfg.base_url));
    println!(
        "Search debounce (ms): {}",
        display_value(&cfg.search_debounce_ms.map(|v| v.to_string()))
    );
    println!(
        "Request timeout (s): {}",
        display_value(&cfg.request_timeout_secs.map(|v| v.to_string()))
    );
    println!("Log level: {}", display_value(&cfg.log_level));

    let effective = AppConfig::load(base_url_override)?;
    println!();
    println!("Effective base URL: {}", effective.base_url);
    println!(
        "Effective search debounce: {} ms",
        effective.search_debounce.as_millis()
    );
    println!(
        "Effective request timeout: {} s",
        effective.request_timeout.as_secs()
    );
    println!("Effective log level: {}", effective.log_level);

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

fn apply_number_prompt(field: &str, target: &mut Option<u64>) -> AppResult<()> {
    loop {
        let current = target.map(|value| value.to_string());
        match prompt(field, current.as_deref())? {
            PromptAction::Keep => return Ok(()),
            PromptAction::Clear => {
                *target = None;
                return Ok(());
            }
            PromptAction::Set(value) => match value.parse() {
                Ok(number) => {
                    *target = Some(number);
                    return Ok(());
                }
                Err(_) => println!("'{value}' is not a whole number, try again."),
            },
        }
    }
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
    let trimmed = input.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
