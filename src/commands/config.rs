use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn handle_config_action(action: ConfigAction, config_path: &Path, json_output: bool) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::default()
                .save_to(config_path)
                .context("Failed to initialize config")?;
            print_status(
                json_output,
                &format!("Configuration initialized at: {}", config_path.display()),
            );
        }
        ConfigAction::Show => {
            let config = Config::load_from(config_path).context("Failed to load config")?;
            if json_output {
                let json = serde_json::to_string_pretty(&config)
                    .context("Failed to serialize config to JSON")?;
                println!("{}", json);
            } else {
                let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("Configuration ({})", config_path.display());
                println!("{}", toml_str);
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(config_path).context("Failed to load config")?;
            config
                .set_value(&key, &value)
                .context("Invalid configuration")?;
            config.save_to(config_path).context("Failed to save config")?;
            print_status(json_output, &format!("Configuration updated: {} = {}", key, value));
        }
    }
    Ok(())
}

fn print_status(json_output: bool, message: &str) {
    if json_output {
        println!(
            "{}",
            serde_json::json!({ "status": "success", "message": message })
        );
    } else {
        println!("{}", message);
    }
}
