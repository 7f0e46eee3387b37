pub mod notifications;
pub mod transport;

pub use notifications::{AlertSender, DEFAULT_TELEGRAM_API_BASE};
pub use transport::{AlertTransport, HttpTransport};
