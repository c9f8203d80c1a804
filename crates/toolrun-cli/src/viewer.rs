//! Terminal viewer replaying an event log

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use std::time::{Duration, Instant};
use toolrun_core::{AgentTurnState, FinishedTurn, TurnEvent, TurnTracker, summarize};
use toolrun_tui::{
    AppState, Theme,
    input::Action,
    widgets::{Spinner, ToolList},
};

use crate::replay::status_line;

/// Viewer state
pub struct ReplayViewer {
    events: Vec<TurnEvent>,
    /// Index of the next event to apply
    cursor: usize,
    tracker: TurnTracker,
    /// Last finished turn, shown until the next turn starts
    finished: Option<FinishedTurn>,
    paused: bool,
    interval: Duration,
    last_step: Instant,
    spinner_start: Instant,
    scroll: usize,
    /// Follow the bottom of the list as it grows
    follow: bool,
    status: String,
    theme: Theme,
    progress_label: String,
    result_preview: usize,
}

impl ReplayViewer {
    pub fn new(events: Vec<TurnEvent>, interval: Duration, theme: Theme) -> Self {
        Self {
            events,
            cursor: 0,
            tracker: TurnTracker::new(),
            finished: None,
            paused: false,
            interval,
            last_step: Instant::now(),
            spinner_start: Instant::now(),
            scroll: 0,
            follow: true,
            status: "Ready".to_string(),
            theme,
            progress_label: toolrun_tui::widgets::tool_list::DEFAULT_PROGRESS_LABEL.to_string(),
            result_preview: toolrun_tui::widgets::tool_list::DEFAULT_RESULT_PREVIEW,
        }
    }

    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = label.into();
        self
    }

    pub fn with_result_preview(mut self, chars: usize) -> Self {
        self.result_preview = chars;
        self
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// Apply the next event, if any
    pub fn step(&mut self) {
        let Some(event) = self.events.get(self.cursor).cloned() else {
            return;
        };
        self.cursor += 1;
        self.last_step = Instant::now();

        if matches!(event, TurnEvent::TurnStart { .. }) {
            self.finished = None;
            self.spinner_start = Instant::now();
        }
        match self.tracker.apply(event) {
            Ok(Some(turn)) => {
                self.status = format!("Turn {} finished", turn.turn_id);
                self.finished = Some(turn);
            }
            Ok(None) => {
                self.status = format!("Event {}/{}", self.cursor, self.events.len());
            }
            Err(e) => {
                tracing::warn!("Event {} rejected: {}", self.cursor, e);
                self.status = format!("Event {} rejected: {}", self.cursor, e);
            }
        }
        if self.follow {
            self.scroll = usize::MAX;
        }
    }

    /// Start over from the first event
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.tracker.reset();
        self.finished = None;
        self.scroll = 0;
        self.follow = true;
        self.status = "Restarted".to_string();
        self.last_step = Instant::now();
    }

    /// State currently on screen
    pub fn displayed_state(&self) -> Option<&AgentTurnState> {
        self.tracker
            .state()
            .or_else(|| self.finished.as_ref().map(|turn| &turn.state))
    }

    fn turn_id(&self) -> Option<&str> {
        self.tracker
            .active()
            .map(|turn| turn.turn_id.as_str())
            .or_else(|| self.finished.as_ref().map(|turn| turn.turn_id.as_str()))
    }

    fn render_turn(&mut self, frame: &mut Frame, area: Rect) {
        let title = match self.turn_id() {
            Some(id) => format!(" toolrun │ {} ", id),
            None => " toolrun ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let Some(state) = self.displayed_state() else {
            let waiting = Paragraph::new(Line::from(Span::styled(
                "  Waiting for a turn to start...",
                self.theme.dim_style(),
            )));
            frame.render_widget(waiting, inner);
            return;
        };

        let documents = state.related_documents();
        let summary = summarize(state);
        let list = ToolList::new(&summary, &self.theme)
            .related_documents(&documents)
            .progress_label(&self.progress_label)
            .result_preview(self.result_preview)
            .with_start_time(self.spinner_start);

        let content_height = list.height(inner.width as usize);
        let max_scroll = content_height.saturating_sub(inner.height as usize);
        let scroll = self.scroll.min(max_scroll);
        frame.render_widget(list.scroll(scroll), inner);

        if content_height > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));
            let mut scrollbar_state = ScrollbarState::new(content_height)
                .position(scroll)
                .viewport_content_length(inner.height as usize);
            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }

        self.scroll = scroll;
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let mode = if self.paused {
            "paused"
        } else if self.is_done() {
            "done"
        } else {
            "playing"
        };
        let turn = self
            .displayed_state()
            .map(|state| status_line(&summarize(state)))
            .unwrap_or_default();
        let left = format!("{} │ {} │ {}", mode, self.status, turn);

        let turn_running = self
            .tracker
            .summary()
            .is_some_and(|summary| summary.is_running());
        if turn_running && !self.paused {
            // Use animated spinner while a turn is in flight
            let spinner = Spinner::new(&left, &self.theme).with_start_time(self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }
        let right = "space: pause │ n: step │ r: restart │ q: quit";

        let left_width = left.chars().count();
        let right_width = right.chars().count();
        let available = area.width as usize;

        let line = if left_width + right_width + 2 <= available {
            let spacing = available - left_width - right_width;
            Line::from(vec![
                Span::styled(left, self.theme.dim_style()),
                Span::raw(" ".repeat(spacing)),
                Span::styled(right, self.theme.dim_style()),
            ])
        } else {
            Line::from(Span::styled(left, self.theme.dim_style()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl AppState for ReplayViewer {
    fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::TogglePause => self.paused = !self.paused,
            Action::Step => self.step(),
            Action::Restart => self.restart(),
            Action::Up => {
                self.follow = false;
                self.scroll = self.scroll.saturating_sub(1);
            }
            Action::Down => self.scroll = self.scroll.saturating_add(1),
            Action::PageUp => {
                self.follow = false;
                self.scroll = self.scroll.saturating_sub(10);
            }
            Action::PageDown => self.scroll = self.scroll.saturating_add(10),
            Action::Home => {
                self.follow = false;
                self.scroll = 0;
            }
            Action::End => {
                self.follow = true;
                self.scroll = usize::MAX;
            }
            Action::Unknown => {}
        }
        true
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        self.render_turn(frame, chunks[0]);
        self.render_status(frame, chunks[1]);
    }

    fn tick(&mut self) {
        if !self.paused && !self.is_done() && self.last_step.elapsed() >= self.interval {
            self.step();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::parse_events;
    use ratatui::{Terminal, backend::TestBackend};

    const LOG: &str = r#"{"type":"turn_start","turn_id":"turn-1"}
{"type":"tool_use_start","tool_use_id":"t1","name":"search","input":null}
{"type":"tool_result","tool_use_id":"t1","status":"succeeded"}
{"type":"turn_end"}
"#;

    fn viewer() -> ReplayViewer {
        ReplayViewer::new(parse_events(LOG).unwrap(), Duration::ZERO, Theme::dark())
    }

    #[test]
    fn test_step_through_turn() {
        let mut viewer = viewer();
        assert!(viewer.displayed_state().is_none());

        viewer.step();
        assert!(viewer.displayed_state().unwrap().is_empty());

        viewer.step();
        viewer.step();
        viewer.step();
        assert!(viewer.is_done());

        // Finished turn stays on screen
        let state = viewer.displayed_state().unwrap();
        assert_eq!(state.len(), 1);
        assert!(!summarize(state).is_running());
    }

    #[test]
    fn test_tick_respects_pause() {
        let mut viewer = viewer();
        viewer.handle_action(Action::TogglePause);
        viewer.tick();
        assert_eq!(viewer.cursor, 0);

        viewer.handle_action(Action::TogglePause);
        viewer.tick();
        assert_eq!(viewer.cursor, 1);
    }

    #[test]
    fn test_rejected_event_updates_status() {
        let events = parse_events(r#"{"type":"turn_end"}"#).unwrap();
        let mut viewer = ReplayViewer::new(events, Duration::ZERO, Theme::dark());
        viewer.step();
        assert!(viewer.status.contains("rejected"));
    }

    #[test]
    fn test_restart() {
        let mut viewer = viewer();
        viewer.step();
        viewer.step();
        viewer.handle_action(Action::Restart);
        assert_eq!(viewer.cursor, 0);
        assert!(viewer.displayed_state().is_none());
    }

    #[test]
    fn test_quit() {
        let mut viewer = viewer();
        assert!(!viewer.handle_action(Action::Quit));
        assert!(viewer.handle_action(Action::Unknown));
    }

    #[test]
    fn test_render_shows_tool_card() {
        let mut viewer = viewer();
        for _ in 0..4 {
            viewer.step();
        }
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal.draw(|frame| viewer.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("turn-1"));
        assert!(screen.contains("✓ search"));
        assert!(screen.contains("done"));
    }
}
