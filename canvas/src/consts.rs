//! Shared numeric constants for the canvas crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Width of the drawing surface in canvas pixels.
pub const CANVAS_WIDTH: i32 = 2048;

/// Height of the drawing surface in canvas pixels.
pub const CANVAS_HEIGHT: i32 = 2048;

/// Base alignment grid, in canvas pixels.
pub const SNAP_UNIT: i32 = 16;

/// Largest canvas-pixel coordinate region math accepts. Points beyond it,
/// such as those under a far-panned camera, are clamped first.
pub const PIXEL_LIMIT: i32 = 1 << 24;

// ── Camera ──────────────────────────────────────────────────────

/// Closest allowed camera distance from the canvas plane.
pub const ZOOM_MIN: f64 = 0.5;

/// Farthest allowed camera distance from the canvas plane.
pub const ZOOM_MAX: f64 = 32.0;

/// Camera distance at session start.
pub const INITIAL_CAMERA_Z: f64 = 3.0;

/// Vertical field of view of the perspective camera, in degrees.
pub const FIELD_OF_VIEW_DEG: f64 = 75.0;

/// Camera depth at which one canvas pixel maps to one screen pixel of the
/// startup viewport. Overlays are sized against this depth.
pub const REFERENCE_DEPTH: f64 = 5.0;

/// Screen-pixel equivalent of one discrete zoom-in/zoom-out command.
pub const ZOOM_STEP_PX: f64 = 128.0;

// ── Input ───────────────────────────────────────────────────────

/// Pointer travel in screen pixels before a primary drag picks a direction.
pub const DRAG_DIRECTION_THRESHOLD_PX: f64 = 3.0;

// ── History ─────────────────────────────────────────────────────

/// Number of snapshot slots in the undo ring.
pub const UNDO_CAPACITY: usize = 17;

// ── Glyphs ──────────────────────────────────────────────────────

/// Glyph sheet cell heights, smallest first.
pub const GLYPH_SIZES: [i32; 6] = [16, 32, 64, 128, 256, 512];

/// Width of a generated glyph sheet in pixels.
pub const GLYPH_SHEET_WIDTH: i32 = 2048;

/// Quiet period before a glyph atlas regeneration runs, in milliseconds.
pub const GLYPH_REGEN_DEBOUNCE_MS: u64 = 200;

/// Characters available for typing, in atlas order.
pub const GLYPH_CHARS: &str = " abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789%$€¥£¢&*@#|áâàäåãæçéêèëíîìï:;-–—•,.…'\"`„‹›«»/\\?!¿¡()[]{}©®§+×=_°~^<>";
