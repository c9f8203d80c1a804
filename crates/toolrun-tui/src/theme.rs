//! Color theme support

use ratatui::style::{Color, Modifier, Style};
use toolrun_core::{SyncStatus, ToolStatus};

/// Color theme for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Primary text color
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (spinner, headers)
    pub accent: Color,
    /// Failed tools and sync jobs
    pub error: Color,
    /// Succeeded tools and sync jobs
    pub success: Color,
    /// Running tools
    pub running: Color,
    /// Border color
    pub border: Color,
    /// Inline code color
    pub code: Color,
    /// Citation and source link color
    pub link: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            error: Color::Red,
            success: Color::Green,
            running: Color::Yellow,
            border: Color::DarkGray,
            code: Color::Magenta,
            link: Color::Blue,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            error: Color::Red,
            success: Color::Green,
            running: Color::Rgb(180, 120, 0),
            border: Color::Gray,
            code: Color::Magenta,
            link: Color::Blue,
        }
    }

    /// Look up a theme by name ("dark" or "light")
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Get base style
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get dimmed style
    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Get accent style
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Get bold accent style
    pub fn accent_bold(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Get error style
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Get success style
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn code_style(&self) -> Style {
        Style::default().fg(self.code)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.link)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Get border style
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for a tool card's status icon and name
    pub fn tool_status_style(&self, status: ToolStatus) -> Style {
        match status {
            ToolStatus::Running => Style::default().fg(self.running),
            ToolStatus::Succeeded => self.success_style(),
            ToolStatus::Failed => self.error_style().add_modifier(Modifier::BOLD),
        }
    }

    /// Style for a sync status badge
    pub fn sync_status_style(&self, status: SyncStatus) -> Style {
        match status {
            SyncStatus::Queued | SyncStatus::Running => self.accent_style(),
            SyncStatus::Succeeded => self.success_style(),
            SyncStatus::Failed => self.error_style(),
        }
    }
}
