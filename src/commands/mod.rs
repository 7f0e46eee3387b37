// Command handlers module
pub mod alert;
pub mod config;
pub mod dashboard;
pub mod predict;
pub mod recommend;
pub mod snapshot;

// Re-export command handlers for easy access
pub use alert::handle_alert_command;
pub use config::handle_config_action;
pub use dashboard::handle_dashboard_command;
pub use predict::handle_predict_command;
pub use recommend::handle_recommend_command;
pub use snapshot::handle_snapshot_command;
