//! Editor tuning knobs. Defaults match the constants in [`crate::consts`].

use std::time::Duration;

use crate::consts::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DRAG_DIRECTION_THRESHOLD_PX, GLYPH_REGEN_DEBOUNCE_MS, SNAP_UNIT, UNDO_CAPACITY,
    ZOOM_MAX, ZOOM_MIN, ZOOM_STEP_PX,
};
use crate::input::Platform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub snap_unit: i32,
    pub undo_capacity: usize,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Screen pixels of one zoom-in/zoom-out command.
    pub zoom_step_px: f64,
    pub drag_threshold_px: f64,
    pub glyph_debounce: Duration,
    pub platform: Platform,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            snap_unit: SNAP_UNIT,
            undo_capacity: UNDO_CAPACITY,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_step_px: ZOOM_STEP_PX,
            drag_threshold_px: DRAG_DIRECTION_THRESHOLD_PX,
            glyph_debounce: Duration::from_millis(GLYPH_REGEN_DEBOUNCE_MS),
            platform: Platform::Other,
        }
    }
}
