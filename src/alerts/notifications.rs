use crate::alerts::transport::{AlertTransport, HttpTransport};
use crate::config::TelegramCredentials;
use anyhow::{Context, Result};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Sends short text alerts to a Telegram chat through the Bot API.
pub struct AlertSender<T = HttpTransport> {
    credentials: Option<TelegramCredentials>,
    api_base: String,
    transport: T,
}

impl AlertSender<HttpTransport> {
    pub fn new(credentials: Option<TelegramCredentials>, api_base: impl Into<String>) -> Self {
        Self::with_transport(credentials, api_base, HttpTransport::new())
    }
}

impl<T: AlertTransport> AlertSender<T> {
    pub fn with_transport(
        credentials: Option<TelegramCredentials>,
        api_base: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            credentials,
            api_base: api_base.into(),
            transport,
        }
    }

    /// Post `message` to the configured chat.
    ///
    /// Without a bot token and chat id this returns `Ok(())` without touching
    /// the network. Delivery failures are returned to the caller as-is.
    pub async fn send(&self, message: &str) -> Result<()> {
        let Some(credentials) = &self.credentials else {
            return Ok(());
        };

        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            credentials.bot_token
        );

        tracing::info!(chat_id = %credentials.chat_id, "sending alert: {}", message);

        self.transport
            .post_form(&url, &[("chat_id", credentials.chat_id.as_str()), ("text", message)])
            .await
            .context("Failed to send Telegram alert")
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
