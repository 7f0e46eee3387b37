// Interactive application state: form input, selection cursors and the last
// dashboard view. Independent of the terminal so it can be driven in tests.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::alerts::{AlertTransport, HttpTransport};
use crate::models::{GeminiClient, TextGenerator};
use crate::session::{AuthMode, DashboardSession, DashboardView, LoginError, Role, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
}

impl LoginForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Success(String),
    Error(String),
}

pub struct App<G = GeminiClient, T = HttpTransport> {
    session: DashboardSession<G, T>,
    pub login_form: LoginForm,
    pub role_cursor: usize,
    pub view: Option<DashboardView>,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
    should_quit: bool,
}

impl<G: TextGenerator, T: AlertTransport> App<G, T> {
    pub fn new(session: DashboardSession<G, T>) -> Self {
        Self {
            session,
            login_form: LoginForm::default(),
            role_cursor: 0,
            view: None,
            status: None,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &DashboardSession<G, T> {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.session.context().screen()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected_role(&self) -> Role {
        Role::ALL[self.role_cursor % Role::ALL.len()]
    }

    /// Route a key press to the handler of the active screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
        {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::F(1) {
            self.show_help = !self.show_help;
            return;
        }

        match self.screen() {
            Screen::Login => self.handle_login_key(key),
            Screen::RoleSelection => self.handle_role_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.login_form.toggle_focus(),
            KeyCode::Left | KeyCode::Right => {
                let context = self.session.context_mut();
                let mode = context.auth_mode().toggle();
                context.set_auth_mode(mode);
                self.status = None;
            }
            KeyCode::Backspace => {
                self.login_form.focused_mut().pop();
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char(c) => self.login_form.focused_mut().push(c),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let email = self.login_form.email.clone();
        let password = self.login_form.password.clone();

        match self.session.context_mut().submit_login(&email, &password) {
            Ok(()) => {
                self.login_form.password.clear();
                self.status = Some(StatusMessage::Success("✅ Login Successful!".to_string()));
            }
            Err(LoginError::RegistrationUnavailable) => {
                self.status = Some(StatusMessage::Info(LoginError::RegistrationUnavailable.to_string()));
            }
            Err(e) => self.status = Some(StatusMessage::Error(format!("❌ {}", e))),
        }
    }

    fn handle_role_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Left | KeyCode::BackTab => {
                self.role_cursor = (self.role_cursor + Role::ALL.len() - 1) % Role::ALL.len();
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
                self.role_cursor = (self.role_cursor + 1) % Role::ALL.len();
            }
            KeyCode::Enter => {
                let role = self.selected_role();
                match self.session.context_mut().confirm_role(role) {
                    Ok(()) => self.status = None,
                    Err(e) => self.status = Some(StatusMessage::Error(e.to_string())),
                }
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        let context = self.session.context_mut();
        let provider = context.provider();
        let result = match key.code {
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => context.select_provider(provider.next()),
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => context.select_provider(provider.previous()),
            KeyCode::Char('q') => {
                self.should_quit = true;
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.status = Some(StatusMessage::Error(e.to_string()));
        }
    }

    /// Re-run the active screen's per-turn logic.
    pub async fn run_turn(&mut self) {
        match self.screen() {
            Screen::Login | Screen::RoleSelection => {}
            Screen::Dashboard => self.run_dashboard_turn().await,
        }
    }

    async fn run_dashboard_turn(&mut self) {
        match self.session.dashboard_turn().await {
            Ok(view) => {
                self.status = view.error.clone().map(StatusMessage::Error);
                self.view = Some(view);
            }
            Err(e) => {
                self.status = Some(StatusMessage::Error(format!("{:#}", e)));
            }
        }
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.session.context().auth_mode()
    }
}
