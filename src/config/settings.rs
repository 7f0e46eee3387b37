use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub dashboard: DashboardConfig,
    pub generation: GenerationConfig,
    pub alerts: AlertsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub refresh_interval_secs: u64,
    pub tick_rate_ms: u64,
    pub initial_servers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsConfig {
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub decimal_places: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dashboard: DashboardConfig {
                refresh_interval_secs: 10,
                tick_rate_ms: 1000,
                initial_servers: 2,
            },
            generation: GenerationConfig {
                model: crate::models::gemini::DEFAULT_MODEL.to_string(),
                endpoint: crate::models::gemini::DEFAULT_ENDPOINT.to_string(),
            },
            alerts: AlertsConfig {
                api_base: crate::alerts::DEFAULT_TELEGRAM_API_BASE.to_string(),
            },
            output: OutputConfig {
                decimal_places: 2,
            },
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl Config {
    /// Load `config_path`, writing defaults there on first run.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Range checks shared by file loading and `set_value`.
    pub fn validate(&self) -> Result<()> {
        if self.dashboard.tick_rate_ms == 0 {
            anyhow::bail!("Tick rate must be greater than 0");
        }
        if self.dashboard.initial_servers == 0 {
            anyhow::bail!("Initial servers must be at least 1");
        }
        if self.generation.model.trim().is_empty() {
            anyhow::bail!("Model name cannot be empty");
        }
        if self.output.decimal_places > 10 {
            anyhow::bail!("Decimal places must be between 0 and 10");
        }
        Ok(())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = self.to_commented_toml()?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Generate TOML configuration with comments explaining every option
    pub fn to_commented_toml(&self) -> Result<String> {
        let mut output = String::new();

        output.push_str("# cloudopt Configuration File\n");
        output.push_str("#\n");
        output.push_str("# API keys are not stored here. Set them in the environment or a .env file:\n");
        output.push_str("#   GEMINI_API_KEY      enables cost-saving recommendations\n");
        output.push_str("#   TELEGRAM_BOT_TOKEN  together with TELEGRAM_CHAT_ID enables scaling alerts\n");
        output.push_str("#   TELEGRAM_CHAT_ID\n");
        output.push('\n');

        output.push_str("[dashboard]\n");
        output.push_str("# Seconds between mock metric refreshes\n");
        output.push_str(&format!("refresh_interval_secs = {}\n", self.dashboard.refresh_interval_secs));
        output.push_str("# How often the dashboard re-runs while idle (milliseconds)\n");
        output.push_str(&format!("tick_rate_ms = {}\n", self.dashboard.tick_rate_ms));
        output.push_str("# Simulated server count at session start (minimum 1)\n");
        output.push_str(&format!("initial_servers = {}\n", self.dashboard.initial_servers));
        output.push('\n');

        output.push_str("[generation]\n");
        output.push_str("# Gemini model used for recommendations\n");
        output.push_str(&format!("model = {}\n", toml_string(&self.generation.model)));
        output.push_str(&format!("endpoint = {}\n", toml_string(&self.generation.endpoint)));
        output.push('\n');

        output.push_str("[alerts]\n");
        output.push_str("# Telegram Bot API base URL\n");
        output.push_str(&format!("api_base = {}\n", toml_string(&self.alerts.api_base)));
        output.push('\n');

        output.push_str("[output]\n");
        output.push_str("# Decimal places for predicted cost display\n");
        output.push_str(&format!("decimal_places = {}\n", self.output.decimal_places));

        Ok(output)
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".config").join("cloudopt").join("config.toml"))
    }

    /// Set one dotted key. The config is left untouched if the new value fails validation.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        updated.assign(key, value)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn assign(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "dashboard.refresh_interval_secs" => {
                self.dashboard.refresh_interval_secs = value
                    .parse()
                    .with_context(|| format!("Invalid interval value: {}", value))?;
            }
            "dashboard.tick_rate_ms" => {
                self.dashboard.tick_rate_ms = value
                    .parse()
                    .with_context(|| format!("Invalid tick rate value: {}", value))?;
            }
            "dashboard.initial_servers" => {
                self.dashboard.initial_servers = value
                    .parse()
                    .with_context(|| format!("Invalid server count: {}", value))?;
            }
            "generation.model" => self.generation.model = value.to_string(),
            "generation.endpoint" => self.generation.endpoint = value.to_string(),
            "alerts.api_base" => self.alerts.api_base = value.to_string(),
            "output.decimal_places" => {
                self.output.decimal_places = value
                    .parse()
                    .with_context(|| format!("Invalid decimal places value: {}", value))?;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }
}

/// Quoted and escaped TOML string literal.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_commented_toml_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.dashboard.refresh_interval_secs = 3;
        config.generation.model = "gemini-1.5-flash".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_quoted_strings_survive_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_value("generation.model", "tuned \"cost\" model").unwrap();
        config.set_value("generation.endpoint", "http://localhost\\gemini").unwrap();
        config.set_value("alerts.api_base", "https://bots.example/\"tg\"").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.generation.model, "tuned \"cost\" model");
        assert_eq!(loaded.generation.endpoint, "http://localhost\\gemini");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_zero_tick_rate_in_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let contents = Config::default()
            .to_commented_toml()
            .unwrap()
            .replace("tick_rate_ms = 1000", "tick_rate_ms = 0");
        fs::write(&path, contents).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string().contains("Tick rate")));

        let contents = Config::default()
            .to_commented_toml()
            .unwrap()
            .replace("initial_servers = 2", "initial_servers = 0");
        fs::write(&path, contents).unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_set_value_validates() {
        let mut config = Config::default();

        config.set_value("dashboard.initial_servers", "4").unwrap();
        assert_eq!(config.dashboard.initial_servers, 4);

        assert!(config.set_value("dashboard.initial_servers", "0").is_err());
        assert!(config.set_value("dashboard.tick_rate_ms", "fast").is_err());
        assert!(config.set_value("dashboard.tick_rate_ms", "0").is_err());
        assert!(config.set_value("generation.model", "  ").is_err());
        assert!(config.set_value("output.decimal_places", "11").is_err());
        assert!(config.set_value("nope.key", "1").is_err());
        assert_eq!(config.dashboard.initial_servers, 4);
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.dashboard.refresh_interval(), Duration::from_secs(10));
        assert_eq!(config.dashboard.tick_rate(), Duration::from_millis(1000));
    }
}
