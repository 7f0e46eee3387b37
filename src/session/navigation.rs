// Screen navigation for a single interactive session
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Screens in the order a session walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Login,
    RoleSelection,
    Dashboard,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Login => "login",
            Screen::RoleSelection => "role selection",
            Screen::Dashboard => "dashboard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Company,
    Developer,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Company, Role::Developer];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Company => "Company",
            Role::Developer => "Developer",
        }
    }
}

/// Cloud provider tag the user picked on the dashboard. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Provider {
    #[default]
    None,
    Aws,
    Azure,
    GoogleCloud,
    Other,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::None,
        Provider::Aws,
        Provider::Azure,
        Provider::GoogleCloud,
        Provider::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Provider::None => "None",
            Provider::Aws => "AWS",
            Provider::Azure => "Azure",
            Provider::GoogleCloud => "Google Cloud",
            Provider::Other => "Other",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Provider {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Provider {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggle(&self) -> AuthMode {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("expected the {expected} screen, session is on the {actual} screen")]
    WrongScreen { expected: Screen, actual: Screen },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Please enter email and password.")]
    MissingCredentials,
    #[error("Registration is not available.")]
    RegistrationUnavailable,
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Everything the session knows about the user. Created at session start,
/// dropped when the session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    screen: Screen,
    auth_mode: AuthMode,
    user: Option<String>,
    role: Option<Role>,
    provider: Provider,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            auth_mode: AuthMode::Login,
            user: None,
            role: None,
            provider: Provider::None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    fn expect_screen(&self, expected: Screen) -> Result<(), NavigationError> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(NavigationError::WrongScreen {
                expected,
                actual: self.screen,
            })
        }
    }

    pub fn set_auth_mode(&mut self, mode: AuthMode) {
        self.auth_mode = mode;
    }

    /// Accept any non-empty email and password and move on to role selection.
    pub fn submit_login(&mut self, email: &str, password: &str) -> Result<(), LoginError> {
        self.expect_screen(Screen::Login)?;

        if self.auth_mode == AuthMode::Register {
            return Err(LoginError::RegistrationUnavailable);
        }
        if email.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        tracing::info!(user = %email, "login accepted");
        self.user = Some(email.to_string());
        self.screen = Screen::RoleSelection;
        Ok(())
    }

    pub fn confirm_role(&mut self, role: Role) -> Result<(), NavigationError> {
        self.expect_screen(Screen::RoleSelection)?;

        self.role = Some(role);
        self.screen = Screen::Dashboard;
        Ok(())
    }

    pub fn select_provider(&mut self, provider: Provider) -> Result<(), NavigationError> {
        self.expect_screen(Screen::Dashboard)?;
        self.provider = provider;
        Ok(())
    }

    pub fn shows_credits(&self) -> bool {
        self.role == Some(Role::Developer)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
