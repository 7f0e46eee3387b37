// Terminal lifecycle and the interactive event loop
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;

use crate::alerts::AlertTransport;
use crate::dashboard::app::App;
use crate::dashboard::ui;
use crate::models::TextGenerator;

pub struct Dashboard<G, T> {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App<G, T>,
    tick_rate: Duration,
    restored: bool,
}

impl<G: TextGenerator, T: AlertTransport> Dashboard<G, T> {
    pub fn new(app: App<G, T>, tick_rate: Duration) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Dashboard {
            terminal,
            app,
            tick_rate,
            restored: false,
        })
    }

    /// Draw, wait for a key or the next tick, re-run the active screen, repeat.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.terminal.draw(|f| ui::render(f, &self.app))?;

            if self.app.should_quit() {
                break;
            }

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.app.handle_key(key);
                    }
                }
            }

            if self.app.should_quit() {
                break;
            }

            self.app.run_turn().await;
        }

        Ok(())
    }
}

impl<G, T> Dashboard<G, T> {
    pub fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl<G, T> Drop for Dashboard<G, T> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
