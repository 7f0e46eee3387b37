pub mod env;
pub mod settings;

pub use env::{Secrets, TelegramCredentials};
pub use settings::Config;
