use clap::{Args, Parser, Subcommand};

use crate::metrics::UsageSnapshot;

#[derive(Parser)]
#[command(name = "cloudopt")]
#[command(about = "Cloud Cost Optimizer Dashboard")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON output format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize fresh configuration
    Init,
    /// Set configuration value
    Set {
        /// Configuration key (e.g., dashboard.refresh_interval_secs)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Usage values for one-shot commands. Omitted values are drawn at random.
#[derive(Args, Debug, Clone, Default)]
pub struct SnapshotArgs {
    /// CPU utilization percent
    #[arg(long)]
    pub cpu: Option<u32>,

    /// Storage used in GB
    #[arg(long)]
    pub storage: Option<u32>,

    /// API calls
    #[arg(long)]
    pub api_calls: Option<u32>,

    /// Monthly cost in dollars
    #[arg(long)]
    pub cost: Option<u32>,
}

impl SnapshotArgs {
    /// Fill any missing value from `fallback`.
    pub fn resolve(&self, fallback: UsageSnapshot) -> UsageSnapshot {
        UsageSnapshot::new(
            self.cpu.unwrap_or(fallback.cpu_utilization),
            self.storage.unwrap_or(fallback.storage_used_gb),
            self.api_calls.unwrap_or(fallback.api_calls),
            self.cost.unwrap_or(fallback.monthly_cost),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,

    /// Generate one usage snapshot and apply the scaling policy
    Snapshot {
        /// Current server count
        #[arg(long, default_value = "2")]
        servers: u32,
    },

    /// Predict future cost for a usage snapshot
    Predict {
        #[command(flatten)]
        usage: SnapshotArgs,
    },

    /// Ask the text-generation service for cost-saving suggestions
    Recommend {
        #[command(flatten)]
        usage: SnapshotArgs,
    },

    /// Send a test alert through the configured Telegram bot
    Alert {
        /// Message text
        message: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}
