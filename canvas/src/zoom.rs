//! Pan and zoom controller: the only code that moves the camera.
//!
//! Zoom is a camera distance `z` clamped to `[min, max]`. Every zoom
//! re-anchors the camera so the world point under the zoom center stays
//! under it. Drag pans and two-pointer gestures are recomputed from the
//! camera captured at gesture start on every move, never accumulated, so
//! rounding error does not drift the view.

#[cfg(test)]
#[path = "zoom_test.rs"]
mod zoom_test;

use crate::camera::{Camera, Point, Viewport};
use crate::consts::{ZOOM_MAX, ZOOM_MIN};

/// Camera and pointer captured when a drag pan starts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanOrigin {
    camera: Camera,
    screen: Point,
}

/// Camera and pointer pair captured when a two-pointer gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchOrigin {
    camera: Camera,
    a: Point,
    b: Point,
}

/// Owner of the camera state.
#[derive(Debug, Clone)]
pub struct ZoomPan {
    camera: Camera,
    min_z: f64,
    max_z: f64,
    pan: Option<PanOrigin>,
    pinch: Option<PinchOrigin>,
}

impl Default for ZoomPan {
    fn default() -> Self {
        Self::new(Camera::default(), ZOOM_MIN, ZOOM_MAX)
    }
}

impl ZoomPan {
    /// Seed the controller. The seed's `z` is clamped into range.
    #[must_use]
    pub fn new(camera: Camera, min_z: f64, max_z: f64) -> Self {
        let mut this = Self { camera, min_z, max_z, pan: None, pinch: None };
        this.camera.z = this.clamp_z(camera.z);
        this
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    fn clamp_z(&self, z: f64) -> f64 {
        if z.is_nan() {
            return self.camera.z;
        }
        z.clamp(self.min_z, self.max_z)
    }

    /// Distance after scaling `z` by a wheel-style delta relative to `height`.
    ///
    /// Positive deltas move the camera away. A delta at or beyond the full
    /// viewport height saturates at the far limit.
    fn scaled_z(&self, z: f64, height: f64, delta: f64) -> f64 {
        let percent = (height - delta) / height;
        if percent <= 0.0 {
            return self.max_z;
        }
        self.clamp_z(z / percent)
    }

    /// Zoom by a wheel delta while keeping the world point under `screen` fixed.
    pub fn zoom_at_point(&mut self, viewport: &Viewport, screen: Point, delta_y: f64) -> Camera {
        if !delta_y.is_finite() || viewport.height <= 0.0 {
            return self.camera;
        }
        let next_z = self.scaled_z(self.camera.z, viewport.height, delta_y);
        self.camera = reanchor(self.camera, self.camera, viewport, screen, next_z);
        self.camera
    }

    /// Discrete zoom about the viewport center. Positive `step_px` zooms in.
    pub fn zoom_centered(&mut self, viewport: &Viewport, step_px: f64) -> Camera {
        self.zoom_at_point(viewport, viewport.center(), -step_px)
    }

    /// Shift the camera by a screen-pixel delta at the current zoom.
    ///
    /// Dragging right moves the content right, so the camera moves left;
    /// screen y is inverted relative to world y.
    pub fn pan_by_screen_delta(&mut self, viewport: &Viewport, dx: f64, dy: f64) -> Camera {
        let per_px = self.camera.world_per_screen_px(viewport);
        self.camera.x -= dx * per_px;
        self.camera.y += dy * per_px;
        self.camera
    }

    /// Capture the camera and pointer at the start of a drag pan.
    pub fn begin_pan(&mut self, screen: Point) {
        self.pan = Some(PanOrigin { camera: self.camera, screen });
    }

    /// Place the camera so the content under the pan origin follows `screen`.
    /// No-op when no pan is in progress.
    pub fn pan_to(&mut self, viewport: &Viewport, screen: Point) -> Camera {
        let Some(origin) = self.pan else {
            return self.camera;
        };
        let per_px = origin.camera.world_per_screen_px(viewport);
        self.camera.x = origin.camera.x - (screen.x - origin.screen.x) * per_px;
        self.camera.y = origin.camera.y + (screen.y - origin.screen.y) * per_px;
        self.camera
    }

    pub fn end_pan(&mut self) {
        self.pan = None;
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Capture the camera and both pointers at the start of a pinch.
    pub fn begin_pinch(&mut self, a: Point, b: Point) {
        self.pinch = Some(PinchOrigin { camera: self.camera, a, b });
    }

    /// Combined pinch-zoom and two-finger pan for the pointers' current
    /// positions. No-op when no pinch is in progress.
    pub fn pinch_to(&mut self, viewport: &Viewport, a: Point, b: Point) -> Camera {
        let Some(origin) = self.pinch else {
            return self.camera;
        };
        let per_px = origin.camera.world_per_screen_px(viewport);
        let mid_down = origin.a.midpoint(origin.b);
        let mid_now = a.midpoint(b);

        let panned = Camera {
            x: origin.camera.x - (mid_now.x - mid_down.x) * per_px,
            y: origin.camera.y + (mid_now.y - mid_down.y) * per_px,
            z: origin.camera.z,
        };

        let down_dist = origin.a.distance(origin.b);
        let ratio = if down_dist > 0.0 { a.distance(b) / down_dist } else { 1.0 };
        let next_z = if ratio > 0.0 { self.clamp_z(origin.camera.z / ratio) } else { self.max_z };

        self.camera = reanchor(panned, origin.camera, viewport, mid_now, next_z);
        self.camera
    }

    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }
}

/// Move `base` to depth `next_z`, shifting it so the world point that `scale`
/// shows under `screen` remains under `screen` at the new depth.
fn reanchor(base: Camera, scale: Camera, viewport: &Viewport, screen: Point, next_z: f64) -> Camera {
    let per_px = scale.world_per_screen_px(viewport);
    let next = Camera { z: next_z, ..scale };
    let next_per_px = next.world_per_screen_px(viewport);
    let rel_x = screen.x - viewport.width * 0.5;
    let rel_y = -(screen.y - viewport.height * 0.5);
    Camera {
        x: base.x - rel_x * (next_per_px - per_px),
        y: base.y - rel_y * (next_per_px - per_px),
        z: next_z,
    }
}
