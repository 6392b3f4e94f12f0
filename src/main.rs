mod app;
mod cli;
mod config;
mod services;
mod ui;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::services::api::{ActionForm, ApiClientConfig, DashboardClient, DashboardRequest};
use anyhow::Result;
use clap::Parser;
use std::panic;
use std::time::Duration;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        eprintln!("LoanLens panic: {info}");
        if let Some(location) = info.location() {
            eprintln!(
                "  at {}:{}",
                location.file(),
                location.line()
            );
        }
    }));

    let cli = cli::Cli::parse();
    let settings = AppConfig::load(&cli)?;

    if let Some(command) = cli.command.clone() {
        return handle_command(command, &settings);
    }

    app::run(settings)
}

fn handle_command(command: Command, settings: &AppConfig) -> Result<()> {
    match command {
        Command::Fetch {
            action,
            id,
            filter,
            base_url,
        } => {
            let form = ActionForm {
                primary: id,
                optional: filter,
            };
            let request = DashboardRequest::from_form(action.into(), &form)?;

            let base = base_url.unwrap_or_else(|| settings.api_base_url.clone());
            let api_config = ApiClientConfig::try_from_url(&base)?
                .with_timeout(Duration::from_secs(settings.request_timeout_secs));
            let client = DashboardClient::new(api_config)?;

            let runtime = Runtime::new()?;
            let value = runtime.block_on(client.execute(&request))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
