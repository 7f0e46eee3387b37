use anyhow::Result;

use crate::config::{Config, Secrets};
use crate::dashboard::{App, Dashboard};
use crate::session::DashboardSession;

pub async fn handle_dashboard_command(config: &Config, secrets: &Secrets) -> Result<()> {
    if secrets.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; recommendations will be unavailable");
    }

    let session = DashboardSession::from_config(config, secrets);
    let mut dashboard = Dashboard::new(App::new(session), config.dashboard.tick_rate())?;

    let result = dashboard.run().await;
    dashboard.cleanup()?;
    result
}
