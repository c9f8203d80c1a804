//! Main application framework

use crate::input::{Action, event_to_action};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;

/// Application state trait
pub trait AppState {
    /// Handle an input action, return true to continue, false to quit
    fn handle_action(&mut self, action: Action) -> bool;

    /// Render the UI
    fn render(&mut self, frame: &mut ratatui::Frame);

    /// Called once per loop iteration (animations, timers)
    fn tick(&mut self) {}
}

/// Main application runner
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
}

impl App {
    /// Create a new application
    pub fn new() -> io::Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            tick_rate: Duration::from_millis(80),
        })
    }

    /// Run the event loop until the state asks to quit or input ends
    pub async fn run_async<S: AppState>(&mut self, state: &mut S) -> io::Result<()> {
        let mut event_stream = EventStream::new();

        loop {
            self.terminal.draw(|frame| state.render(frame))?;

            // Handle events with timeout for ticks
            match tokio::time::timeout(self.tick_rate, event_stream.next()).await {
                Ok(Some(Ok(evt))) => {
                    if let Some(action) = event_to_action(evt) {
                        if !state.handle_action(action) {
                            return Ok(());
                        }
                    }
                }
                Ok(Some(Err(e))) => return Err(e),
                // Stream ended
                Ok(None) => return Ok(()),
                Err(_) => {}
            }

            state.tick();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
