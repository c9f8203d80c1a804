//! Knowledge sync status badge

use crate::theme::Theme;
use crate::widgets::spinner::frame_at;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Widget,
};
use std::time::Instant;
use toolrun_core::SyncStatus;

/// Icon plus label for a [`SyncStatus`]
pub struct SyncStatusBadge<'a> {
    status: SyncStatus,
    theme: &'a Theme,
    start_time: Instant,
    actionable: bool,
}

impl<'a> SyncStatusBadge<'a> {
    pub fn new(status: SyncStatus, theme: &'a Theme) -> Self {
        Self {
            status,
            theme,
            start_time: Instant::now(),
            actionable: false,
        }
    }

    /// Spinner animation origin
    pub fn with_start_time(mut self, start: Instant) -> Self {
        self.start_time = start;
        self
    }

    /// Mark a failed label as something the user can open for details
    pub fn actionable(mut self, actionable: bool) -> Self {
        self.actionable = actionable;
        self
    }

    /// The badge as a single line
    pub fn line(&self) -> Line<'static> {
        let icon = match self.status.indicator() {
            Some(c) => c.to_string(),
            None => frame_at(self.start_time.elapsed()).to_string(),
        };
        let mut label_style = self.theme.dim_style();
        if self.status.is_failed() && self.actionable {
            label_style = self
                .theme
                .link_style()
                .add_modifier(Modifier::BOLD);
        }

        Line::from(vec![
            Span::styled(icon, self.theme.sync_status_style(self.status)),
            Span::raw(" "),
            Span::styled(self.status.label(), label_style),
        ])
    }
}

impl Widget for SyncStatusBadge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_line(area.x, area.y, &self.line(), area.width);
    }
}
