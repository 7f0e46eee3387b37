// Session state and screen navigation
pub mod dashboard;
pub mod navigation;

pub use dashboard::{DashboardSession, DashboardView};
pub use navigation::{AuthMode, LoginError, NavigationError, Provider, Role, Screen, SessionContext};
