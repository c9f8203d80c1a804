//! toolrun-tui: Terminal widgets for agent tool runs
//!
//! Renders turn summaries and sync status with ratatui, plus a small
//! crossterm application runner.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::{App, AppState};
pub use theme::Theme;
