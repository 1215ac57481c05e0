//! User preferences that survive the session: colors, toggles, fit mode.

#[cfg(test)]
#[path = "prefs_test.rs"]
mod prefs_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::region::Direction;

/// Opaque RGB color, persisted as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Color(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }
}

impl TryFrom<String> for Color {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// How an image is placed into a destination cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Stretch to the cell, ignoring aspect ratio.
    Fill,
    /// Letterbox inside the cell, preserving aspect ratio.
    Contain,
    /// Fill the cell, preserving aspect ratio and cropping the overflow.
    #[default]
    Cover,
}

impl FitMode {
    /// Next mode in the cycle fill → contain → cover → fill.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Fill => Self::Contain,
            Self::Contain => Self::Cover,
            Self::Cover => Self::Fill,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Contain => "contain",
            Self::Cover => "cover",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fill" => Ok(Self::Fill),
            "contain" => Ok(Self::Contain),
            "cover" => Ok(Self::Cover),
            _ => Err(ParseError::FitMode(s.to_owned())),
        }
    }
}

/// Foreground and background used when rasterizing glyph sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColors {
    pub foreground: Color,
    pub background: Color,
}

impl Default for TextColors {
    fn default() -> Self {
        Self { foreground: Color::BLACK, background: Color::WHITE }
    }
}

/// Persisted editor preferences.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Snap grid overlay is visible.
    pub show_grid: bool,
    /// Selection moves after every glyph or image write.
    pub auto_advance: bool,
    /// Direction of auto-advance.
    pub direction: Direction,
    pub fit: FitMode,
    pub colors: TextColors,
    /// Host shows the info readout.
    pub show_info: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_grid: true,
            auto_advance: true,
            direction: Direction::Right,
            fit: FitMode::Cover,
            colors: TextColors::default(),
            show_info: false,
        }
    }
}
