use anyhow::{Result, bail};

use crate::alerts::AlertSender;
use crate::config::{Config, Secrets, env};

pub async fn handle_alert_command(
    message: &str,
    config: &Config,
    secrets: &Secrets,
    json_output: bool,
) -> Result<()> {
    let alerts = AlertSender::new(secrets.telegram(), config.alerts.api_base.clone());
    if !alerts.is_enabled() {
        bail!(
            "Telegram alerts are not configured: set {} and {}",
            env::TELEGRAM_BOT_TOKEN,
            env::TELEGRAM_CHAT_ID
        );
    }

    alerts.send(message).await?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({ "status": "success", "message": "Alert sent" })
        );
    } else {
        println!("Alert sent");
    }
    Ok(())
}
