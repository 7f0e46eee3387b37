// Secrets read from the process environment
use std::env;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

/// API credentials. Each one is optional; what is missing only disables the
/// feature that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub gemini_api_key: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Secrets {
    /// Read secrets after loading an optional `.env` file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            gemini_api_key: read(GEMINI_API_KEY),
            telegram_bot_token: read(TELEGRAM_BOT_TOKEN),
            telegram_chat_id: read(TELEGRAM_CHAT_ID),
        }
    }

    /// Both the bot token and the chat id, or nothing.
    pub fn telegram(&self) -> Option<TelegramCredentials> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramCredentials {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn secrets(pairs: &[(&str, &str)]) -> Secrets {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Secrets::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_telegram_requires_both_values() {
        assert!(secrets(&[]).telegram().is_none());
        assert!(secrets(&[(TELEGRAM_BOT_TOKEN, "t")]).telegram().is_none());
        assert!(secrets(&[(TELEGRAM_CHAT_ID, "c")]).telegram().is_none());

        let both = secrets(&[(TELEGRAM_BOT_TOKEN, "t"), (TELEGRAM_CHAT_ID, "c")]);
        assert_eq!(
            both.telegram(),
            Some(TelegramCredentials {
                bot_token: "t".to_string(),
                chat_id: "c".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let s = secrets(&[(GEMINI_API_KEY, "  "), (TELEGRAM_BOT_TOKEN, ""), (TELEGRAM_CHAT_ID, "c")]);
        assert!(s.gemini_api_key.is_none());
        assert!(s.telegram().is_none());
    }
}
