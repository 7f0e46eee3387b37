// Interactive terminal dashboard
pub mod app;
pub mod terminal;
pub mod ui;

pub use app::{App, LoginField, LoginForm, StatusMessage};
pub use terminal::Dashboard;
