//! Tool list widget: one agent turn's header and tool cards

use crate::theme::Theme;
use crate::widgets::spinner::frame_at;
use crate::widgets::thought::render_thought;
use crate::widgets::{truncate_chars, truncate_to_width};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::time::Instant;
use toolrun_core::{HeaderText, RelatedDocument, ToolInvocation, ToolStatus, TurnSummary};

/// Default label shown while running without a thought
pub const DEFAULT_PROGRESS_LABEL: &str = "Thinking...";

/// Default number of characters kept from a tool result
pub const DEFAULT_RESULT_PREVIEW: usize = 200;

/// Widget for displaying a [`TurnSummary`]
pub struct ToolList<'a> {
    summary: &'a TurnSummary<'a>,
    theme: &'a Theme,
    related_documents: &'a [RelatedDocument],
    progress_label: &'a str,
    result_preview: usize,
    start_time: Instant,
    scroll: usize,
}

impl<'a> ToolList<'a> {
    /// Create a new tool list
    pub fn new(summary: &'a TurnSummary<'a>, theme: &'a Theme) -> Self {
        Self {
            summary,
            theme,
            related_documents: &[],
            progress_label: DEFAULT_PROGRESS_LABEL,
            result_preview: DEFAULT_RESULT_PREVIEW,
            start_time: Instant::now(),
            scroll: 0,
        }
    }

    /// Documents the thought may cite
    pub fn related_documents(mut self, documents: &'a [RelatedDocument]) -> Self {
        self.related_documents = documents;
        self
    }

    pub fn progress_label(mut self, label: &'a str) -> Self {
        self.progress_label = label;
        self
    }

    /// Maximum characters of result text shown per card
    pub fn result_preview(mut self, chars: usize) -> Self {
        self.result_preview = chars;
        self
    }

    /// Spinner animation origin
    pub fn with_start_time(mut self, start: Instant) -> Self {
        self.start_time = start;
        self
    }

    /// Set scroll offset
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Number of lines the list occupies at `width`
    pub fn height(&self, width: usize) -> usize {
        self.lines(width).len()
    }

    /// Render all rows
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if let Some(header) = self.summary.header() {
            let prefix = if header.spinner {
                format!("{} ", frame_at(self.start_time.elapsed()))
            } else {
                String::new()
            };
            let body_width = width.saturating_sub(prefix.chars().count());
            let body = match header.text {
                HeaderText::Thought(thought) => {
                    render_thought(thought, self.related_documents, self.theme, body_width)
                }
                HeaderText::Progress => vec![Line::from(Span::styled(
                    self.progress_label.to_string(),
                    self.theme.dim_style(),
                ))],
            };

            let indent = " ".repeat(prefix.chars().count());
            for (i, line) in body.into_iter().enumerate() {
                let lead = if i == 0 {
                    Span::styled(prefix.clone(), self.theme.accent_style())
                } else {
                    Span::raw(indent.clone())
                };
                let mut spans = vec![lead];
                spans.extend(line.spans);
                lines.push(Line::from(spans));
            }
        }

        for tool in &self.summary.entries {
            lines.extend(self.render_card(tool, width));
        }

        lines
    }

    fn render_card(&self, tool: &ToolInvocation, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let status_style = self.theme.tool_status_style(tool.status);

        let icon = match tool.status {
            ToolStatus::Running => frame_at(self.start_time.elapsed()),
            ToolStatus::Succeeded => "✓",
            ToolStatus::Failed => "✗",
        };

        let mut title = vec![
            Span::styled(format!("{} ", icon), status_style),
            Span::styled(
                tool.name.clone(),
                status_style.add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(elapsed) = tool.elapsed() {
            title.push(Span::styled(
                format!(" ({:.1}s)", elapsed.as_secs_f64()),
                self.theme.dim_style(),
            ));
        }
        let used: usize = title.iter().map(|s| s.width()).sum();
        if let Some(input) = input_preview(&tool.input) {
            let room = width.saturating_sub(used + 1);
            if room > 1 {
                title.push(Span::raw(" "));
                title.push(Span::styled(
                    truncate_to_width(&input, room),
                    self.theme.dim_style(),
                ));
            }
        }
        lines.push(Line::from(title));

        let detail_width = width.saturating_sub(4);
        if let Some(text) = tool.result_text() {
            let preview = truncate_chars(&text, self.result_preview);
            let style = if tool.status == ToolStatus::Failed {
                self.theme.error_style()
            } else {
                self.theme.dim_style()
            };
            for (i, line) in textwrap::wrap(&preview, detail_width.max(1))
                .into_iter()
                .enumerate()
            {
                let lead = if i == 0 { "  └ " } else { "    " };
                lines.push(Line::from(vec![
                    Span::styled(lead, self.theme.border_style()),
                    Span::styled(line.into_owned(), style),
                ]));
            }
        }

        let related = tool.related_count();
        if related > 0 {
            let noun = if related == 1 { "document" } else { "documents" };
            lines.push(Line::from(vec![
                Span::styled("  └ ", self.theme.border_style()),
                Span::styled(format!("{} related {}", related, noun), self.theme.dim_style()),
            ]));
        }

        lines
    }
}

impl Widget for ToolList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let visible: Vec<Line> = self
            .lines(area.width as usize)
            .into_iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible).render(area, buf);
    }
}

/// Compact one-line JSON of the tool input, or None when there is nothing to show
fn input_preview(input: &serde_json::Value) -> Option<String> {
    match input {
        serde_json::Value::Null => None,
        serde_json::Value::Object(map) if map.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
