//! Host configuration parsed from environment variables.
//!
//! Paths have no fallback beyond their defaults; numeric knobs that fail to
//! parse fall back to their defaults the same way the flush tuning knobs do.
//! Only values that parse but make no sense are rejected.

use std::path::PathBuf;
use std::time::Duration;

use canvas::config::EditorConfig;
use canvas::consts::UNDO_CAPACITY;
use canvas::input::Platform;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_STATE_PATH: &str = "grid-state.json";
pub const DEFAULT_CANVAS_PATH: &str = "grid-canvas.png";
pub const DEFAULT_EXPORT_DIR: &str = ".";
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
pub const DEFAULT_AUTOSAVE_MS: u64 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be positive, got {value}")]
    NotPositive { var: &'static str, value: String },
    #[error("unknown GRID_PLATFORM: {0} (expected 'mac' or 'other')")]
    Platform(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file holding the persisted editor state.
    pub state_path: PathBuf,
    /// PNG holding the canvas bitmap between sessions.
    pub canvas_path: PathBuf,
    /// Directory that exports land in.
    pub export_dir: PathBuf,
    /// Directory of pre-rasterized glyph masks (`glyphs-<size>.png`).
    pub glyph_sheet_dir: Option<PathBuf>,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub autosave: Duration,
    pub editor: EditorConfig,
}

impl Config {
    /// Build the host config from environment variables.
    ///
    /// Optional:
    /// - `GRID_STATE_PATH`: default `grid-state.json`
    /// - `GRID_CANVAS_PATH`: default `grid-canvas.png`
    /// - `GRID_EXPORT_DIR`: default `.`
    /// - `GRID_GLYPH_SHEET`: glyph mask directory, none by default
    /// - `GRID_UNDO_CAPACITY`: default 17
    /// - `GRID_VIEWPORT_WIDTH` / `GRID_VIEWPORT_HEIGHT`: default 1280×800
    /// - `GRID_AUTOSAVE_MS`: default 3000
    /// - `GRID_PLATFORM`: `mac` or `other` (default)
    pub fn from_env() -> Result<Self, ConfigError> {
        let viewport_width = env_parse("GRID_VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH);
        let viewport_height = env_parse("GRID_VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT);
        require_positive("GRID_VIEWPORT_WIDTH", viewport_width)?;
        require_positive("GRID_VIEWPORT_HEIGHT", viewport_height)?;

        let autosave_ms = env_parse("GRID_AUTOSAVE_MS", DEFAULT_AUTOSAVE_MS);
        if autosave_ms == 0 {
            return Err(ConfigError::NotPositive { var: "GRID_AUTOSAVE_MS", value: "0".into() });
        }

        let editor = EditorConfig {
            undo_capacity: env_parse("GRID_UNDO_CAPACITY", UNDO_CAPACITY),
            platform: parse_platform(std::env::var("GRID_PLATFORM").ok().as_deref())?,
            ..EditorConfig::default()
        };

        Ok(Self {
            state_path: env_path("GRID_STATE_PATH", DEFAULT_STATE_PATH),
            canvas_path: env_path("GRID_CANVAS_PATH", DEFAULT_CANVAS_PATH),
            export_dir: env_path("GRID_EXPORT_DIR", DEFAULT_EXPORT_DIR),
            glyph_sheet_dir: std::env::var_os("GRID_GLYPH_SHEET").map(PathBuf::from),
            viewport_width,
            viewport_height,
            autosave: Duration::from_millis(autosave_ms),
            editor,
        })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var_os(key).map_or_else(|| PathBuf::from(default), PathBuf::from)
}

fn require_positive(var: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { var, value: value.to_string() })
    }
}

fn parse_platform(raw: Option<&str>) -> Result<Platform, ConfigError> {
    match raw.unwrap_or("other") {
        "mac" | "macos" => Ok(Platform::Mac),
        "other" => Ok(Platform::Other),
        other => Err(ConfigError::Platform(other.to_owned())),
    }
}
