//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for toolrun
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Color theme ("dark" or "light")
    pub theme: Option<String>,
    /// Delay between replayed events in the viewer
    pub replay_interval_ms: Option<u64>,
    /// Characters of tool result text shown per card
    pub result_preview_chars: Option<usize>,
    /// Header label while a turn runs without a thought
    pub progress_label: Option<String>,
}

impl Config {
    pub const DEFAULT_REPLAY_INTERVAL_MS: u64 = 400;

    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("toolrun")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for TOOLRUN_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("TOOLRUN_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from a file, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            theme: Some("dark".to_string()),
            replay_interval_ms: Some(Self::DEFAULT_REPLAY_INTERVAL_MS),
            result_preview_chars: Some(toolrun_tui::widgets::tool_list::DEFAULT_RESULT_PREVIEW),
            progress_label: Some(toolrun_tui::widgets::tool_list::DEFAULT_PROGRESS_LABEL.to_string()),
        };

        default_config.save_to(&path)?;
        Ok(path)
    }

    /// Resolved theme; unknown names fall back to dark
    pub fn theme(&self) -> toolrun_tui::Theme {
        match self.theme.as_deref() {
            Some(name) => toolrun_tui::Theme::by_name(name).unwrap_or_else(|| {
                tracing::warn!("Unknown theme {:?}, using dark", name);
                toolrun_tui::Theme::dark()
            }),
            None => toolrun_tui::Theme::dark(),
        }
    }

    pub fn replay_interval_ms(&self) -> u64 {
        self.replay_interval_ms
            .unwrap_or(Self::DEFAULT_REPLAY_INTERVAL_MS)
    }

    pub fn result_preview_chars(&self) -> usize {
        self.result_preview_chars
            .unwrap_or(toolrun_tui::widgets::tool_list::DEFAULT_RESULT_PREVIEW)
    }

    pub fn progress_label(&self) -> &str {
        self.progress_label
            .as_deref()
            .unwrap_or(toolrun_tui::widgets::tool_list::DEFAULT_PROGRESS_LABEL)
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# toolrun configuration file
# Place at ~/.config/toolrun/config.toml (Linux/Mac) or %APPDATA%\toolrun\config.toml (Windows)

# Color theme (dark, light)
theme = "dark"

# Delay between replayed events in `toolrun view`, in milliseconds
replay_interval_ms = 400

# Characters of tool result text shown on each tool card
result_preview_chars = 200

# Header label while a turn runs and the agent has no thought yet
progress_label = "Thinking..."
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(config.theme.as_deref(), Some("dark"));
        assert_eq!(config.replay_interval_ms(), 400);
        assert_eq!(config.result_preview_chars(), 200);
        assert_eq!(config.progress_label(), "Thinking...");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("progress_label = \"Working\"").unwrap();
        assert_eq!(config.progress_label(), "Working");
        assert_eq!(config.replay_interval_ms(), Config::DEFAULT_REPLAY_INTERVAL_MS);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let path = std::env::temp_dir().join("toolrun-missing-config-does-not-exist.toml");
        let config = Config::load_from(&path);
        assert!(config.theme.is_none());
    }

    #[test]
    fn test_invalid_file_gives_default() {
        let path = std::env::temp_dir().join(format!("toolrun-bad-config-{}.toml", std::process::id()));
        fs::write(&path, "replay_interval_ms = \"soon\"").unwrap();
        let config = Config::load_from(&path);
        assert!(config.replay_interval_ms.is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("toolrun-config-{}", std::process::id()))
            .join("config.toml");
        let config = Config {
            theme: Some("light".into()),
            replay_interval_ms: Some(50),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.theme.as_deref(), Some("light"));
        assert_eq!(loaded.replay_interval_ms(), 50);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let config = Config {
            theme: Some("neon".into()),
            ..Default::default()
        };
        assert_eq!(config.theme().accent, toolrun_tui::Theme::dark().accent);
    }
}
