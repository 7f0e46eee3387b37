// Rendering for the three screens using ratatui
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};

use crate::alerts::AlertTransport;
use crate::dashboard::app::{App, LoginField, StatusMessage};
use crate::metrics::UsageSnapshot;
use crate::models::TextGenerator;
use crate::session::{AuthMode, Provider, Role, Screen};

/// Draw whichever screen the session is on.
pub fn render<G: TextGenerator, T: AlertTransport>(f: &mut Frame, app: &App<G, T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Screen content
            Constraint::Length(1), // Status line
        ])
        .split(f.size());

    render_header(f, chunks[0], app.screen());
    match app.screen() {
        Screen::Login => render_login(f, chunks[1], app),
        Screen::RoleSelection => render_role_selection(f, chunks[1], app),
        Screen::Dashboard => render_dashboard(f, chunks[1], app),
    }
    render_status_line(f, chunks[2], app);

    if app.show_help {
        render_help_popup(f);
    }
}

fn render_header(f: &mut Frame, area: Rect, screen: Screen) {
    let title = match screen {
        Screen::Login => "🔐 User Login / Registration",
        Screen::RoleSelection => "Select Your Role",
        Screen::Dashboard => "📊 AI Cloud Optimizer Dashboard",
    };
    let header = Paragraph::new(Line::from(Span::styled(
        title,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title("🌩 AI Cloud Optimizer"));
    f.render_widget(header, area);
}

fn render_login<G: TextGenerator, T: AlertTransport>(f: &mut Frame, area: Rect, app: &App<G, T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let mode_spans: Vec<Span> = [AuthMode::Login, AuthMode::Register]
        .iter()
        .flat_map(|mode| {
            let selected = *mode == app.auth_mode();
            let marker = if selected { "(•) " } else { "( ) " };
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            [Span::styled(format!("{}{}", marker, mode.label()), style), Span::raw("   ")]
        })
        .collect();
    let mode = Paragraph::new(Line::from(mode_spans))
        .block(Block::default().borders(Borders::ALL).title("Login or Register (←/→)"));
    f.render_widget(mode, chunks[0]);

    let focus_style = |field: LoginField| {
        if app.login_form.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let email = Paragraph::new(app.login_form.email.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Email")
            .border_style(focus_style(LoginField::Email)),
    );
    f.render_widget(email, chunks[1]);

    let masked = "•".repeat(app.login_form.password.chars().count());
    let password = Paragraph::new(masked).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Password")
            .border_style(focus_style(LoginField::Password)),
    );
    f.render_widget(password, chunks[2]);

    let hint = Paragraph::new("Tab: switch field | Enter: submit | Esc: quit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[3]);
}

fn render_role_selection<G: TextGenerator, T: AlertTransport>(f: &mut Frame, area: Rect, app: &App<G, T>) {
    let items: Vec<ListItem> = Role::ALL
        .iter()
        .map(|role| {
            let selected = *role == app.selected_role();
            let marker = if selected { "(•) " } else { "( ) " };
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!("{}{}", marker, role.label()), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Are you a Company or a Developer? (↑/↓, Enter to continue)"),
    );
    f.render_widget(list, area);
}

fn render_dashboard<G: TextGenerator, T: AlertTransport>(f: &mut Frame, area: Rect, app: &App<G, T>) {
    let context = app.session().context();
    let role = context.role().map_or("guest", |r| r.label());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Welcome + provider
            Constraint::Length(8), // Usage + servers
            Constraint::Min(0),    // Recommendations
            Constraint::Length(if context.shows_credits() { 1 } else { 0 }),
        ])
        .split(area);

    let provider_spans: Vec<Span> = Provider::ALL
        .iter()
        .flat_map(|provider| {
            let style = if *provider == context.provider() {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {} ", provider.label()), style), Span::raw(" ")]
        })
        .collect();
    let welcome = Paragraph::new(Line::from(provider_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Welcome, {}! 🔍 Select Project API Usage (←/→)", role)),
    );
    f.render_widget(welcome, chunks[0]);

    let Some(view) = &app.view else {
        let waiting = Paragraph::new("Loading live cloud usage...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(waiting, chunks[1]);
        return;
    };

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_usage_panel(f, middle[0], &view.snapshot);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(middle[1]);

    let cpu = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("CPU Utilization"))
        .gauge_style(Style::default().fg(cpu_color(view.snapshot.cpu_utilization)))
        .percent(view.snapshot.cpu_utilization.min(100) as u16);
    f.render_widget(cpu, right[0]);

    let predicted = view
        .predicted_cost
        .map_or_else(|| "-".to_string(), |cost| format!("${:.2}", cost));
    let servers = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("🖥 Active Servers: "),
            Span::styled(view.active_servers.to_string(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw("📈 AI Predicted Cost: "),
            Span::styled(predicted, Style::default().fg(Color::Green)),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Auto-Scaling"));
    f.render_widget(servers, right[1]);

    let suggestions = match (&view.recommendations, &view.error) {
        (Some(text), _) => text.clone(),
        (None, Some(error)) => format!("Unavailable: {}", error),
        (None, None) => String::new(),
    };
    let recommendations = Paragraph::new(suggestions)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("🤖 AI Cost Optimization"));
    f.render_widget(recommendations, chunks[2]);

    if context.shows_credits() {
        let credits = Paragraph::new("👨‍💻 Credits: Developed by the cloudopt contributors")
            .style(Style::default().fg(Color::Gray));
        f.render_widget(credits, chunks[3]);
    }
}

fn render_usage_panel(f: &mut Frame, area: Rect, snapshot: &UsageSnapshot) {
    let rows = [
        ("CPU Utilization", format!("{}%", snapshot.cpu_utilization)),
        ("Storage Used", format!("{} GB", snapshot.storage_used_gb)),
        ("API Calls", snapshot.api_calls.to_string()),
        ("Monthly Cost", format!("${}", snapshot.monthly_cost)),
    ];
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::raw(format!("{:<17}", label)),
                Span::styled(value, Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let usage = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("📊 Live Cloud Usage"));
    f.render_widget(usage, area);
}

fn cpu_color(cpu: u32) -> Color {
    if cpu > 80 {
        Color::Red
    } else if cpu < 30 {
        Color::Blue
    } else {
        Color::Green
    }
}

fn render_status_line<G: TextGenerator, T: AlertTransport>(f: &mut Frame, area: Rect, app: &App<G, T>) {
    let (text, color) = match &app.status {
        Some(StatusMessage::Info(text)) => (text.as_str(), Color::Cyan),
        Some(StatusMessage::Success(text)) => (text.as_str(), Color::Green),
        Some(StatusMessage::Error(text)) => (text.as_str(), Color::Red),
        None => ("F1: help | Esc: quit", Color::Gray),
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
}

fn render_help_popup(f: &mut Frame) {
    let area = centered_rect(60, 50, f.size());
    let help = Paragraph::new(vec![
        Line::from("Login:       type, Tab switches field, ←/→ Login/Register, Enter submits"),
        Line::from("Role:        ↑/↓ choose, Enter continues"),
        Line::from("Dashboard:   ←/→ select provider, q quits"),
        Line::from(""),
        Line::from("Metrics refresh on their own interval; any key re-runs the dashboard."),
        Line::from("F1 closes this help, Esc or Ctrl+C quits."),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertSender;
    use crate::alerts::notifications::testing::RecordingTransport;
    use crate::metrics::MockMetricsGenerator;
    use crate::models::GenerationError;
    use crate::session::DashboardSession;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    struct FixedGenerator;

    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok("Move logs to cold storage".to_string())
        }
    }

    fn app() -> App<FixedGenerator, RecordingTransport> {
        let metrics = MockMetricsGenerator::new(Duration::from_secs(10), 2);
        let alerts = AlertSender::with_transport(None, "https://api.telegram.org", RecordingTransport::default());
        App::new(DashboardSession::with_services(metrics, FixedGenerator, alerts, StdRng::seed_from_u64(12)))
    }

    fn screen_text(app: &App<FixedGenerator, RecordingTransport>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_login_screen_renders_form() {
        let text = screen_text(&app());
        assert!(text.contains("Email"));
        assert!(text.contains("Password"));
        assert!(text.contains("Register"));
    }

    #[tokio::test]
    async fn test_dashboard_renders_view() {
        let mut app = app();
        for c in "a@b.c".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(screen_text(&app).contains("Developer"));

        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        app.run_turn().await;

        let text = screen_text(&app);
        assert!(text.contains("Active Servers"));
        assert!(text.contains("25000"));
        assert!(text.contains("Move logs to cold storage"));
        assert!(text.contains("Welcome, Company!"));
    }

    #[test]
    fn test_cpu_color_thresholds() {
        assert_eq!(cpu_color(85), Color::Red);
        assert_eq!(cpu_color(20), Color::Blue);
        assert_eq!(cpu_color(50), Color::Green);
    }
}
