use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Highest opacity the host lets the user pick, so the settings window it
/// dims never becomes unreadable.
pub const MAX_HOST_OPACITY: f32 = 0.9;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application configuration stored in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimConfig {
    pub opacity: f32,
    pub is_enabled: bool,
    /// Last non-zero opacity, restored when the dimmer is toggled back on
    #[serde(default = "default_last_opacity")]
    pub last_opacity: f32,
    /// RGB fill colour of the overlay
    #[serde(default)]
    pub dim_color: [u8; 3],
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default = "default_hotkey_toggle")]
    pub hotkey_toggle: String,
    #[serde(default = "default_hotkey_increase")]
    pub hotkey_increase: String,
    #[serde(default = "default_hotkey_decrease")]
    pub hotkey_decrease: String,
    #[serde(default = "default_hotkey_follow")]
    pub hotkey_follow: String,
}

fn default_last_opacity() -> f32 {
    0.3
}

fn default_hotkey_toggle() -> String {
    "Ctrl+Alt+End".into()
}

fn default_hotkey_increase() -> String {
    "Ctrl+Alt+Up".into()
}

fn default_hotkey_decrease() -> String {
    "Ctrl+Alt+Down".into()
}

fn default_hotkey_follow() -> String {
    "Ctrl+Alt+Home".into()
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            opacity: 0.3,
            is_enabled: true,
            last_opacity: default_last_opacity(),
            dim_color: [0, 0, 0],
            debug_logging: false,
            hotkey_toggle: default_hotkey_toggle(),
            hotkey_increase: default_hotkey_increase(),
            hotkey_decrease: default_hotkey_decrease(),
            hotkey_follow: default_hotkey_follow(),
        }
    }
}

impl DimConfig {
    /// Flip the dimmer, remembering the opacity it had when switched off.
    pub fn toggle(&mut self) {
        if self.is_enabled {
            if self.opacity > 0.0 {
                self.last_opacity = self.opacity;
            }
            self.is_enabled = false;
            self.opacity = 0.0;
        } else {
            self.is_enabled = true;
            self.opacity = self.last_opacity;
        }
    }

    /// Nudge opacity by `delta`, re-enabling the dimmer if it was off.
    pub fn adjust_opacity(&mut self, delta: f32) {
        if !self.is_enabled {
            self.is_enabled = true;
            self.opacity = self.last_opacity;
        }
        self.opacity = (self.opacity + delta).clamp(0.0, MAX_HOST_OPACITY);
        if self.opacity > 0.0 {
            self.last_opacity = self.opacity;
        }
    }

    /// Set opacity from the slider. A non-zero value switches the dimmer on.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, MAX_HOST_OPACITY);
        if self.opacity > 0.0 {
            self.last_opacity = self.opacity;
            self.is_enabled = true;
        }
    }

    /// Opacity the overlay should actually use, zero when switched off.
    pub fn effective_opacity(&self) -> f32 {
        if self.is_enabled {
            self.opacity
        } else {
            0.0
        }
    }
}

pub fn config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("DimScreen").join("config.json")
}

pub fn load_from(path: &Path) -> Result<DimConfig, ConfigError> {
    if !path.exists() {
        return Ok(DimConfig::default());
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn save_to(path: &Path, config: &DimConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(config)?;
    fs::write(path, data)?;
    Ok(())
}

pub fn load_config() -> DimConfig {
    let path = config_path();
    load_from(&path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), "falling back to default config: {e}");
        DimConfig::default()
    })
}

pub fn save_config(config: &DimConfig) {
    let path = config_path();
    if let Err(e) = save_to(&path, config) {
        tracing::warn!(path = %path.display(), "failed to save config: {e}");
    }
}
