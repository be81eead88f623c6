mod app;
mod cli;
mod config;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{Cli, Command};
use crate::config::AppConfig;

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_app(config: Option<&Path>) -> Result<App> {
    let cfg = AppConfig::load(config)?;
    App::build(&cfg)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            build_app(cli.config.as_deref())?.serve().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve { authorization } => {
            let app = build_app(cli.config.as_deref())?;
            match app.resolve_header(&authorization).await {
                Ok(principal) => {
                    println!("{}", serde_json::to_string_pretty(&principal)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{} {e}", e.status_code());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::HashPassword { password } => {
            println!(
                "{}",
                static_identity_store_plugin::password_sha256_hex(&password)
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}
