//! Canvas-pixel rectangles and the snapping arithmetic that moves them.
//!
//! Every operation here is pure: it computes a complete replacement
//! [`Region`] and leaves committing it to the caller, so a mutation is never
//! observed half-applied.

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::PIXEL_LIMIT;
use crate::error::ParseError;

/// Axis-aligned integer rectangle in canvas-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Auto-advance and drag direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Unit step `(dx, dy)` in canvas-pixel space (y down).
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Next direction clockwise: right → down → left → up → right.
    #[must_use]
    pub fn clockwise(self) -> Self {
        match self {
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
            Self::Up => Self::Right,
        }
    }

    /// Whether typing in this direction fills rows (as opposed to columns).
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Dominant direction of a screen-space drag (y down), if any axis moved.
    #[must_use]
    pub fn from_drag(dx: f64, dy: f64) -> Option<Self> {
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Some(Self::Right)
            } else {
                Some(Self::Left)
            }
        } else if dy > 0.0 {
            Some(Self::Down)
        } else if dy < 0.0 {
            Some(Self::Up)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_start_matches("arrow") {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ParseError::Direction(s.to_owned())),
        }
    }
}

impl Region {
    #[must_use]
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether the canvas pixel `(px, py)` lies inside the region.
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= f64::from(self.x)
            && py >= f64::from(self.y)
            && px < f64::from(self.x) + f64::from(self.w)
            && py < f64::from(self.y) + f64::from(self.h)
    }

    /// Offset of the region within its own cell lattice.
    #[must_use]
    pub fn lattice_offset(&self) -> (i32, i32) {
        (self.x.rem_euclid(self.w.max(1)), self.y.rem_euclid(self.h.max(1)))
    }

    /// Move to the cell of this region's lattice containing `pixel`.
    ///
    /// The lattice keeps the region's current offset within its cell
    /// (`offset = pos mod size`), so a selection that is not aligned to the
    /// origin stays on its own grid instead of jumping to absolute multiples.
    #[must_use]
    pub fn snapped_to(&self, pixel: Point) -> Self {
        let w = self.w.max(1);
        let h = self.h.max(1);
        let (off_x, off_y) = self.lattice_offset();
        let x = cell_start(pixel.x - f64::from(off_x), w).saturating_add(off_x);
        let y = cell_start(pixel.y - f64::from(off_y), h).saturating_add(off_y);
        Self { x, y, ..*self }
    }

    /// Smallest `unit`-aligned region containing the rectangle spanned by two
    /// canvas-pixel points. Never narrower or shorter than one unit.
    #[must_use]
    pub fn spanning(a: Point, b: Point, unit: i32) -> Self {
        let unit = unit.max(1);
        let min_x = cell_start(a.x.min(b.x), unit);
        let min_y = cell_start(a.y.min(b.y), unit);
        let max_x = cell_end(a.x.max(b.x), unit).max(min_x.saturating_add(unit));
        let max_y = cell_end(a.y.max(b.y), unit).max(min_y.saturating_add(unit));
        Self { x: min_x, y: min_y, w: max_x.saturating_sub(min_x), h: max_y.saturating_sub(min_y) }
    }

    /// Like [`Region::spanning`], with every edge clamped to
    /// `[0, width] × [0, height]`. `None` when nothing of the span lies on the
    /// canvas.
    #[must_use]
    pub fn spanning_clamped(a: Point, b: Point, unit: i32, width: i32, height: i32) -> Option<Self> {
        let raw = Self::spanning(a, b, unit);
        let min_x = raw.x.clamp(0, width);
        let min_y = raw.y.clamp(0, height);
        let max_x = raw.x.saturating_add(raw.w).clamp(0, width);
        let max_y = raw.y.saturating_add(raw.h).clamp(0, height);
        if max_x <= min_x || max_y <= min_y {
            return None;
        }
        Some(Self { x: min_x, y: min_y, w: max_x - min_x, h: max_y - min_y })
    }

    /// Shift by `(dx, dy)` pixels.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self { x: self.x.saturating_add(dx), y: self.y.saturating_add(dy), ..*self }
    }

    /// Shift by one full region width or height toward `direction`.
    #[must_use]
    pub fn stepped(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.translated(dx.saturating_mul(self.w), dy.saturating_mul(self.h))
    }

    /// Auto-advance after a write. Returns `self` unchanged when disabled.
    #[must_use]
    pub fn advanced(&self, direction: Direction, enabled: bool) -> Self {
        if enabled { self.stepped(direction) } else { *self }
    }

    /// Undo one auto-advance step. Returns `self` unchanged when disabled.
    #[must_use]
    pub fn retreated(&self, direction: Direction, enabled: bool) -> Self {
        if enabled { self.stepped(opposite(direction)) } else { *self }
    }

    /// Resize with the top-left corner anchored: the right or bottom edge
    /// moves by `step` toward `direction`. Size never drops below `step`.
    #[must_use]
    pub fn grown_from_top_left(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            w: self.w.saturating_add(dx * step).max(step),
            h: self.h.saturating_add(dy * step).max(step),
            ..*self
        }
    }

    /// Resize with the bottom-right corner anchored: the left or top edge
    /// moves by `step` toward `direction`. An axis that would shrink below
    /// `step` is left untouched, origin included.
    #[must_use]
    pub fn grown_from_bottom_right(&self, direction: Direction, step: i32) -> Self {
        let (mut dx, mut dy) = direction.delta();
        if self.w.saturating_sub(dx * step) < step {
            dx = 0;
        }
        if self.h.saturating_sub(dy * step) < step {
            dy = 0;
        }
        Self {
            x: self.x.saturating_add(dx * step),
            y: self.y.saturating_add(dy * step),
            w: self.w.saturating_sub(dx * step),
            h: self.h.saturating_sub(dy * step),
        }
    }

    /// Start of the next line of a typing run that began at `anchor`.
    ///
    /// Horizontal runs drop one row and return to the anchor's column;
    /// vertical runs move one column right and return to the anchor's row.
    #[must_use]
    pub fn line_return(&self, anchor: &Region, direction: Direction) -> Self {
        if direction.is_horizontal() {
            Self { x: anchor.x, y: self.y.saturating_add(self.h), ..*self }
        } else {
            Self { x: self.x.saturating_add(self.w), y: anchor.y, ..*self }
        }
    }
}

/// Start of the `size`-wide cell containing `v`, with `v` clamped to
/// `±PIXEL_LIMIT` first so the cast cannot saturate.
fn cell_start(v: f64, size: i32) -> i32 {
    let v = v.clamp(-f64::from(PIXEL_LIMIT), f64::from(PIXEL_LIMIT));
    ((v / f64::from(size)).floor() as i32).saturating_mul(size)
}

/// End of the `size`-wide cell whose closed range ends at or after `v`.
fn cell_end(v: f64, size: i32) -> i32 {
    let v = v.clamp(-f64::from(PIXEL_LIMIT), f64::from(PIXEL_LIMIT));
    ((v / f64::from(size)).ceil() as i32).saturating_mul(size)
}

fn opposite(direction: Direction) -> Direction {
    direction.clockwise().clockwise()
}

/// Point marking where a typing run starts, drawn on the anchor cell's edge
/// facing away from the advance direction.
#[must_use]
pub fn return_marker(anchor: &Region, direction: Direction) -> Point {
    let x = f64::from(anchor.x);
    let y = f64::from(anchor.y);
    let w = f64::from(anchor.w);
    let h = f64::from(anchor.h);
    match direction {
        Direction::Right => Point::new(x, y + h * 0.5),
        Direction::Down => Point::new(x + w * 0.5, y),
        Direction::Left => Point::new(x + w, y + h * 0.5),
        Direction::Up => Point::new(x + w * 0.5, y + h),
    }
}

/// Layout of the cell grid overlay drawn around the selection lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapGrid {
    pub cell_w: i32,
    pub cell_h: i32,
    /// Number of cells across the overlay.
    pub cols: i32,
    /// Number of cells down the overlay.
    pub rows: i32,
    /// Horizontal offset of the overlay from its centered position, in canvas pixels.
    pub offset_x: i32,
    /// Vertical offset (y up) of the overlay from its centered position, in canvas pixels.
    pub offset_y: i32,
}

impl SnapGrid {
    /// Grid covering the whole canvas plus a margin cell on every side, aligned
    /// to the lattice of `selection`.
    #[must_use]
    pub fn for_selection(selection: &Region, canvas_width: i32, canvas_height: i32) -> Self {
        let w = selection.w.max(1);
        let h = selection.h.max(1);
        let cols = (f64::from(canvas_width) / f64::from(w) + 2.0).ceil() as i32;
        let rows = (f64::from(canvas_height) / f64::from(h) + 2.0).ceil() as i32;
        Self {
            cell_w: w,
            cell_h: h,
            cols,
            rows,
            offset_x: selection.x.rem_euclid(w) - w,
            offset_y: (canvas_height - selection.y).rem_euclid(h) - h,
        }
    }

    /// Overlay width in canvas pixels.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.cols * self.cell_w
    }

    /// Overlay height in canvas pixels.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.rows * self.cell_h
    }
}
