//! Global settings surface
//!
//! Defaults that apply to every bar unless a block directive overrides them.
//! Loaded once at startup and passed by reference into the parser and the
//! legend renderer.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Global defaults for all bars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Placeholder name substituted with the current progress in legends
    #[serde(default = "default_progress_term")]
    pub progress_term: String,

    /// Placeholder name substituted with the total in legends
    #[serde(default = "default_total_term")]
    pub total_term: String,

    #[serde(default = "default_bar_color")]
    pub bar_color: String,

    #[serde(default = "default_background_color")]
    pub background_color: String,

    #[serde(default = "default_animation")]
    pub animation: String,

    #[serde(default = "default_transition_duration")]
    pub transition_duration: String,

    #[serde(default = "default_legend_font_size")]
    pub legend_font_size: String,

    /// Value representing a full bar when no total directive is given
    #[serde(default = "default_total")]
    pub total: i64,

    /// Allow resetting a bar to zero with a secondary activation
    #[serde(default = "default_enable_reset")]
    pub enable_reset_on_right_click: bool,
}

// Default value functions
fn default_progress_term() -> String {
    "current_progress".to_string()
}

fn default_total_term() -> String {
    "total".to_string()
}

fn default_bar_color() -> String {
    "#4caf50".to_string()
}

fn default_background_color() -> String {
    "#e0e0e0".to_string()
}

fn default_animation() -> String {
    "smooth".to_string()
}

fn default_transition_duration() -> String {
    "0.5s".to_string()
}

fn default_legend_font_size() -> String {
    "0.8em".to_string()
}

fn default_total() -> i64 {
    100
}

fn default_enable_reset() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            progress_term: default_progress_term(),
            total_term: default_total_term(),
            bar_color: default_bar_color(),
            background_color: default_background_color(),
            animation: default_animation(),
            transition_duration: default_transition_duration(),
            legend_font_size: default_legend_font_size(),
            total: default_total(),
            enable_reset_on_right_click: default_enable_reset(),
        }
    }
}

impl Settings {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::files::APP_DIR);
        path.push(crate::constants::files::SETTINGS_FILENAME);
        path
    }

    /// Load settings from the default location, creating the file on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load settings from a JSON file or create it with defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Settings file not found, creating defaults");
            let settings = Settings::default();
            settings.save_to(path)?;
            return Ok(settings);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings JSON from {:?}", path))?;

        Ok(settings)
    }

    /// Save settings as pretty JSON, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, json).with_context(|| format!("Failed to write settings to {:?}", path))?;

        Ok(())
    }
}
