use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::sync::Arc;

use cityweather_core::{Config, KvStore, WeatherApiClient};

use crate::app;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherapi.com API key.
    Configure,

    /// Start the interactive session (the default when no command is given).
    Run,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Configure => configure(),
            Command::Run => run_app().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("weatherapi.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn run_app() -> anyhow::Result<()> {
    let config = Config::load()?;
    let api_key = config.require_api_key()?.to_string();

    let client = Arc::new(WeatherApiClient::new(api_key));
    let store = Arc::new(KvStore::open_default().await?);

    app::run(client, store).await
}
