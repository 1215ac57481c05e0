//! Session state the host may persist, and the change notifications that
//! tell it when to.
//!
//! The editor publishes a [`Change`] after every committed mutation of a
//! persisted field. Hosts subscribe with
//! [`Editor::on_change`](crate::engine::Editor::on_change) and write
//! whatever they like; on startup they hand a [`PersistedState`] back to seed
//! the session. Every field is optional so older or partial saves load.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::camera::{Camera, Projection};
use crate::config::EditorConfig;
use crate::input::Mode;
use crate::prefs::Preferences;
use crate::region::Region;

/// Persisted field that just changed, with its new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    Selection(Region),
    ReturnAnchor(Region),
    Page(Region),
    Camera(Camera),
    Mode(Mode),
    Preferences(Preferences),
}

impl Change {
    /// Stable key naming the field, for key/value stores.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Selection(_) => "selection",
            Self::ReturnAnchor(_) => "returnSource",
            Self::Page(_) => "page",
            Self::Camera(_) => "cameraPosition",
            Self::Mode(_) => "mode",
            Self::Preferences(_) => "preferences",
        }
    }
}

/// Saved session values used to seed a new editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    pub selection: Option<Region>,
    #[serde(alias = "returnSource")]
    pub return_anchor: Option<Region>,
    pub page: Option<Region>,
    #[serde(alias = "cameraPosition")]
    pub camera: Option<Camera>,
    pub mode: Option<Mode>,
    pub preferences: Option<Preferences>,
}

impl PersistedState {
    /// Fold a change notification into the saved state.
    pub fn apply(&mut self, change: &Change) {
        match *change {
            Change::Selection(r) => self.selection = Some(r),
            Change::ReturnAnchor(r) => self.return_anchor = Some(r),
            Change::Page(r) => self.page = Some(r),
            Change::Camera(c) => self.camera = Some(c),
            Change::Mode(m) => self.mode = Some(m),
            Change::Preferences(p) => self.preferences = Some(p),
        }
    }

    /// Drop seeded values that would break region or camera invariants.
    ///
    /// Selection and anchor must have positive sizes that are multiples of
    /// the snap unit and lie within one canvas size of the canvas. The page
    /// must lie on the canvas. The camera must be finite and within one
    /// canvas size of the canvas center.
    #[must_use]
    pub fn sanitized(mut self, config: &EditorConfig, projection: &Projection) -> Self {
        let width = config.canvas_width;
        let height = config.canvas_height;
        let unit = config.snap_unit.max(1);
        let cell = |r: &Region| {
            r.w > 0
                && r.h > 0
                && r.w % unit == 0
                && r.h % unit == 0
                && near_canvas(r.x, r.w, width)
                && near_canvas(r.y, r.h, height)
        };
        let on_canvas = |r: &Region| {
            r.w > 0
                && r.h > 0
                && r.x >= 0
                && r.y >= 0
                && i64::from(r.x) + i64::from(r.w) <= i64::from(width)
                && i64::from(r.y) + i64::from(r.h) <= i64::from(height)
        };
        let reach_x = projection.pixel_to_world(f64::from(width));
        let reach_y = projection.pixel_to_world(f64::from(height));
        let camera_ok = |c: &Camera| {
            c.z.is_finite() && c.x.is_finite() && c.y.is_finite() && c.x.abs() <= reach_x && c.y.abs() <= reach_y
        };

        self.selection = keep("selection", self.selection, cell);
        self.return_anchor = keep("return anchor", self.return_anchor, cell);
        self.page = keep("page", self.page, on_canvas);
        self.camera = keep("camera", self.camera, camera_ok);
        self
    }
}

/// Whether `[start, start + len)` lies within `[-extent, 2 * extent]`.
fn near_canvas(start: i32, len: i32, extent: i32) -> bool {
    let extent = i64::from(extent);
    let start = i64::from(start);
    start >= -extent && start + i64::from(len) <= 2 * extent
}

fn keep<T: std::fmt::Debug>(field: &str, value: Option<T>, valid: impl Fn(&T) -> bool) -> Option<T> {
    match value {
        Some(v) if !valid(&v) => {
            warn!(field, value = ?v, "seeded value out of range; using default");
            None
        }
        other => other,
    }
}
