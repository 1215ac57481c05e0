//! JSON-lines input protocol read from stdin.
//!
//! One JSON object per line, tagged by `type`:
//!
//! ```text
//! {"type":"pointer_down","x":610,"y":420}
//! {"type":"pointer_move","x":700,"y":420}
//! {"type":"pointer_up"}
//! {"type":"key","key":"z","ctrl":true}
//! {"type":"text","text":"hello"}
//! {"type":"open","path":"photo.jpg"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::PathBuf;

use canvas::input::{Button, Modifiers, Mode, PointerId};
use canvas::prefs::Color;
use canvas::region::Direction;
use serde::Deserialize;

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

fn primary() -> Button {
    Button::Primary
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        #[serde(default)]
        id: PointerId,
        #[serde(default = "primary")]
        button: Button,
        x: f64,
        y: f64,
    },
    PointerMove {
        #[serde(default)]
        id: PointerId,
        x: f64,
        y: f64,
    },
    PointerUp {
        #[serde(default)]
        id: PointerId,
        #[serde(default = "primary")]
        button: Button,
    },
    Wheel {
        delta_y: f64,
    },
    Key {
        key: String,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    /// Type every character of `text`.
    Text {
        text: String,
    },
    Mode {
        mode: Mode,
    },
    Direction {
        direction: Direction,
    },
    Colors {
        foreground: Color,
        background: Color,
    },
    /// Stand-in for the file dialog and drag-and-drop.
    Open {
        path: PathBuf,
    },
    /// Paste a file, or the host clipboard when `path` is absent.
    Paste {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Resize {
        width: f64,
        height: f64,
    },
    /// Flush state and canvas to disk now.
    Save,
    Quit,
}

/// Parse one input line. `line_no` is only used for error messages.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<ScriptEvent>, ScriptError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| ScriptError::Json { line: line_no, source })
}
