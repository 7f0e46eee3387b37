// cloudopt: Cloud Cost Optimizer Dashboard
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use cloudopt::cli::{Cli, Commands};
use cloudopt::commands::{
    handle_alert_command, handle_config_action, handle_dashboard_command, handle_predict_command,
    handle_recommend_command, handle_snapshot_command,
};
use cloudopt::config::{Config, Secrets};
use cloudopt::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::default_path()?,
    };

    let interactive = matches!(cli.command, None | Some(Commands::Dashboard));
    init_logging(cli.verbose, interactive, &config_path);

    let load_config = || Config::load_from(&config_path);
    let secrets = Secrets::from_env();

    match cli.command {
        None | Some(Commands::Dashboard) => {
            handle_dashboard_command(&load_config()?, &secrets).await?
        }
        Some(Commands::Snapshot { servers }) => {
            handle_snapshot_command(servers, &load_config()?, &secrets, cli.json).await?
        }
        Some(Commands::Predict { usage }) => {
            handle_predict_command(&usage, &load_config()?, cli.json, cli.verbose)?
        }
        Some(Commands::Recommend { usage }) => {
            handle_recommend_command(&usage, &load_config()?, &secrets, cli.json).await?
        }
        Some(Commands::Alert { message }) => {
            handle_alert_command(&message, &load_config()?, &secrets, cli.json).await?
        }
        Some(Commands::Config { action }) => handle_config_action(action, &config_path, cli.json)?,
    }

    Ok(())
}
