//! Input model: editing modes, raw pointer/keyboard vocabulary, and the
//! events the state machine consumes.
//!
//! Hosts translate platform input into [`Event`]s, either directly or through
//! the helpers here: [`translate_key`] for keyboard shortcuts and
//! [`PointerTracker`] for pointer-id bookkeeping (drag direction and
//! two-pointer gestures).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::DRAG_DIRECTION_THRESHOLD_PX;
use crate::error::ParseError;
use crate::prefs::TextColors;
use crate::region::Direction;

/// Which primary-button gesture is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Click selects a cell; typing writes into it (default).
    #[default]
    #[serde(alias = "normal")]
    Select,
    /// Drag pans the camera.
    Pan,
    /// Drag draws a new selection size.
    Resize,
    /// Drag draws the export page frame.
    Page,
}

impl Mode {
    /// Modes in shortcut order (command+1 … command+4).
    pub const ALL: [Mode; 4] = [Mode::Select, Mode::Pan, Mode::Resize, Mode::Page];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Pan => "pan",
            Self::Resize => "resize",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" | "normal" => Ok(Self::Select),
            "pan" => Ok(Self::Pan),
            "resize" => Ok(Self::Resize),
            "page" => Ok(Self::Page),
            _ => Err(ParseError::Mode(s.to_owned())),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform's command modifier is held.
    #[must_use]
    pub fn command(self, platform: Platform) -> bool {
        match platform {
            Platform::Mac => self.meta,
            Platform::Other => self.ctrl,
        }
    }
}

/// Host platform, which decides the command modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Command is the Meta (⌘) key.
    Mac,
    /// Command is the Ctrl key.
    #[default]
    Other,
}

/// An image blob handed over by paste, drop, or the file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    /// Media type as reported by the host, e.g. `image/png`.
    pub mime: String,
    pub data: Arc<[u8]>,
}

impl ImageBlob {
    #[must_use]
    pub fn new(mime: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self { mime: mime.into(), data: data.into() }
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime.contains("image")
    }
}

/// Everything the state machine reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer moved to a screen position.
    PointerMove(Point),
    ButtonDown(Button),
    ButtonUp(Button),
    /// Wheel scrolled at the last pointer position (positive = down).
    Wheel { delta_y: f64 },
    /// A second pointer went down; both pointers' down positions.
    PinchStart { a: Point, b: Point },
    /// Either pointer of a pinch moved; both pointers' current positions.
    PinchMove { a: Point, b: Point },
    PinchEnd,
    /// A primary drag crossed the direction threshold.
    Dragged(Direction),
    SetMode(Mode),
    /// A printable character was typed.
    Char(char),
    Backspace,
    /// Return to the start of the next line of the typing run.
    Enter,
    Arrow(Direction),
    ShiftArrow(Direction),
    CommandArrow(Direction),
    CommandShiftArrow(Direction),
    /// Direction picked from UI chrome.
    SetDirection(Direction),
    /// Direction picked by keyboard shortcut; also re-anchors the run.
    DirectionShortcut(Direction),
    /// Rotate the auto-advance direction clockwise.
    RotateDirection,
    ZoomIn,
    ZoomOut,
    Undo,
    Redo,
    ToggleGrid,
    ToggleAutoAdvance,
    CycleFit,
    OpenImage,
    /// Export the page frame.
    Export,
    Copy,
    Cut,
    /// Clipboard contents; only image items are used.
    Paste(Vec<ImageBlob>),
    /// Image chosen by file dialog or drop.
    ImageSelected(ImageBlob),
    TextColorsChanged(TextColors),
}

/// Translate a key press into editor events.
///
/// `key` is the key name as reported by the host (`"a"`, `"ArrowLeft"`,
/// `"Enter"`). Unknown keys produce no events.
#[must_use]
pub fn translate_key(key: &str, modifiers: Modifiers, platform: Platform) -> Vec<Event> {
    let command = modifiers.command(platform);

    if let Some(direction) = arrow_direction(key) {
        let event = match (command, modifiers.shift) {
            (true, true) => Event::CommandShiftArrow(direction),
            (true, false) => Event::CommandArrow(direction),
            (false, true) => Event::ShiftArrow(direction),
            (false, false) => Event::Arrow(direction),
        };
        return vec![event];
    }

    match key {
        "Tab" => return vec![Event::RotateDirection],
        "Escape" => return vec![Event::SetMode(Mode::Select)],
        "Enter" => return vec![Event::SetMode(Mode::Select), Event::Enter],
        "Backspace" => return vec![Event::Backspace],
        _ => {}
    }

    if command {
        let event = match key.to_ascii_lowercase().as_str() {
            "o" => Event::OpenImage,
            "m" => Event::ToggleAutoAdvance,
            "g" => Event::ToggleGrid,
            "p" => Event::Export,
            "f" => Event::CycleFit,
            "z" if modifiers.shift => Event::Redo,
            "z" => Event::Undo,
            "+" | "=" => Event::ZoomIn,
            "-" => Event::ZoomOut,
            "h" => Event::DirectionShortcut(Direction::Left),
            "j" => Event::DirectionShortcut(Direction::Down),
            "k" => Event::DirectionShortcut(Direction::Up),
            "l" => Event::DirectionShortcut(Direction::Right),
            "1" => Event::SetMode(Mode::ALL[0]),
            "2" => Event::SetMode(Mode::ALL[1]),
            "3" => Event::SetMode(Mode::ALL[2]),
            "4" => Event::SetMode(Mode::ALL[3]),
            _ => return Vec::new(),
        };
        return vec![event];
    }

    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => vec![Event::Char(c)],
        _ => Vec::new(),
    }
}

fn arrow_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// Host-assigned pointer identifier.
pub type PointerId = u32;

/// Pointer bookkeeping between raw pointer callbacks and [`Event`]s.
///
/// Tracks pressed pointers by id. A primary drag reports its dominant
/// direction once it has travelled past the threshold; a second pressed
/// pointer turns the gesture into a pinch.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    pressed: Vec<(PointerId, Point)>,
    down_at: Vec<(PointerId, Point)>,
    primary_dragging: bool,
    threshold: f64,
    pinching: bool,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DRAG_DIRECTION_THRESHOLD_PX)
    }
}

impl PointerTracker {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { pressed: Vec::new(), down_at: Vec::new(), primary_dragging: false, threshold, pinching: false }
    }

    #[must_use]
    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }

    pub fn down(&mut self, id: PointerId, button: Button, pos: Point) -> Vec<Event> {
        upsert(&mut self.pressed, id, pos);
        upsert(&mut self.down_at, id, pos);

        if self.pressed.len() == 2 {
            self.pinching = true;
            return vec![Event::PinchStart { a: self.down_at[0].1, b: self.down_at[1].1 }];
        }

        if button == Button::Primary {
            self.primary_dragging = true;
        }
        vec![Event::PointerMove(pos), Event::ButtonDown(button)]
    }

    pub fn moved(&mut self, id: PointerId, pos: Point) -> Vec<Event> {
        let mut events = vec![Event::PointerMove(pos)];
        if self.pressed.iter().any(|(p, _)| *p == id) {
            upsert(&mut self.pressed, id, pos);
        }

        match self.pressed.len() {
            1 if self.primary_dragging => {
                if let Some(direction) = self.drag_direction(id, pos) {
                    events.push(Event::Dragged(direction));
                }
            }
            2 if self.pinching => {
                events.push(Event::PinchMove { a: self.pressed[0].1, b: self.pressed[1].1 });
            }
            _ => {}
        }
        events
    }

    pub fn up(&mut self, id: PointerId, button: Button) -> Vec<Event> {
        if button == Button::Primary {
            self.primary_dragging = false;
        }
        let mut events = vec![Event::ButtonUp(button)];

        self.pressed.retain(|(p, _)| *p != id);
        self.down_at.retain(|(p, _)| *p != id);
        if self.pinching && self.pressed.len() < 2 {
            self.pinching = false;
            events.push(Event::PinchEnd);
        }
        events
    }

    fn drag_direction(&self, id: PointerId, pos: Point) -> Option<Direction> {
        let (_, start) = self.down_at.iter().find(|(p, _)| *p == id)?;
        let dx = pos.x - start.x;
        let dy = pos.y - start.y;
        if dx.abs() <= self.threshold && dy.abs() <= self.threshold {
            return None;
        }
        Direction::from_drag(dx, dy)
    }
}

fn upsert(list: &mut Vec<(PointerId, Point)>, id: PointerId, pos: Point) {
    match list.iter_mut().find(|(p, _)| *p == id) {
        Some(entry) => entry.1 = pos,
        None => list.push((id, pos)),
    }
}
