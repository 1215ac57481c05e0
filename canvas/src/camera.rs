//! Camera state and the three coordinate spaces of the editor.
//!
//! - **Screen space**: CSS pixels of the viewport, origin top-left, y down.
//! - **World space**: the plane the perspective camera looks at, origin at the
//!   canvas center, y up. Pan and zoom move the camera through this space.
//! - **Canvas-pixel space**: the fixed 2048×2048 address space of the drawing
//!   surface, origin top-left, y down. Independent of the current zoom.
//!
//! The camera looks straight down the -z axis, so unprojecting a screen ray
//! and intersecting it with the z = 0 plane reduces to a scale by the visible
//! height at the camera's depth.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, FIELD_OF_VIEW_DEG, INITIAL_CAMERA_Z, REFERENCE_DEPTH};
use crate::region::Region;

/// A point in screen, world, or canvas-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// World-space camera position. `z` is the distance from the canvas plane and
/// doubles as the zoom factor: larger `z` shows more of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: INITIAL_CAMERA_Z }
    }
}

impl Camera {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// World units spanned by one screen pixel at the camera's depth.
    #[must_use]
    pub fn world_per_screen_px(&self, viewport: &Viewport) -> f64 {
        if viewport.height <= 0.0 {
            return 0.0;
        }
        visible_height(viewport.fov_deg, self.z) / viewport.height
    }

    /// Unproject a screen point through the camera onto the z = 0 plane.
    ///
    /// A degenerate viewport maps every point to the camera's own position.
    #[must_use]
    pub fn screen_to_world(&self, viewport: &Viewport, screen: Point) -> Point {
        let per_px = self.world_per_screen_px(viewport);
        Point {
            x: self.x + (screen.x - viewport.width * 0.5) * per_px,
            y: self.y - (screen.y - viewport.height * 0.5) * per_px,
        }
    }

    /// Project a world point on the z = 0 plane back to screen pixels.
    #[must_use]
    pub fn world_to_screen(&self, viewport: &Viewport, world: Point) -> Point {
        let per_px = self.world_per_screen_px(viewport);
        if per_px == 0.0 {
            return viewport.center();
        }
        Point {
            x: (world.x - self.x) / per_px + viewport.width * 0.5,
            y: viewport.height * 0.5 - (world.y - self.y) / per_px,
        }
    }
}

/// Current size of the on-screen viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
}

impl Viewport {
    /// Dimensions are floored at one pixel so no transform divides by zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: width.max(1.0), height: height.max(1.0), fov_deg: FIELD_OF_VIEW_DEG }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// World rectangle an overlay mesh should occupy for a canvas region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

/// Fixed mapping between world space and canvas-pixel space.
///
/// The scale is taken at [`REFERENCE_DEPTH`] against the viewport height the
/// session started with, never the current zoom. Overlays sized with
/// [`Projection::pixel_to_world`] therefore keep a constant size relative to
/// the canvas no matter how far the camera moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_deg: f64,
    /// Viewport height in CSS pixels at session start.
    pub init_height: f64,
    pub canvas_width: i32,
    pub canvas_height: i32,
}

impl Projection {
    #[must_use]
    pub fn new(init_height: f64) -> Self {
        Self {
            fov_deg: FIELD_OF_VIEW_DEG,
            init_height: init_height.max(1.0),
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }

    /// World length of one canvas pixel.
    #[must_use]
    pub fn base_pixel(&self) -> f64 {
        visible_height(self.fov_deg, REFERENCE_DEPTH) / self.init_height.max(1.0)
    }

    /// Convert a canvas-pixel length to a world length.
    #[must_use]
    pub fn pixel_to_world(&self, value: f64) -> f64 {
        value * self.base_pixel()
    }

    /// Convert a world point to canvas pixels (origin top-left, y down).
    #[must_use]
    pub fn world_to_canvas_pixel(&self, world: Point) -> Point {
        let base = self.base_pixel();
        let half_w = f64::from(self.canvas_width) * 0.5;
        let half_h = f64::from(self.canvas_height) * 0.5;
        Point {
            x: world.x / base + half_w,
            y: f64::from(self.canvas_height) - (world.y / base + half_h),
        }
    }

    /// Convert a canvas-pixel point to world space.
    #[must_use]
    pub fn canvas_pixel_to_world(&self, pixel: Point) -> Point {
        let half_w = f64::from(self.canvas_width) * 0.5;
        let half_h = f64::from(self.canvas_height) * 0.5;
        Point {
            x: self.pixel_to_world(pixel.x - half_w),
            y: self.pixel_to_world(-(pixel.y - half_h)),
        }
    }

    /// Where an overlay outlining `region` sits in world space.
    #[must_use]
    pub fn overlay_placement(&self, region: Region) -> OverlayPlacement {
        let center = Point::new(
            f64::from(region.x) + f64::from(region.w) * 0.5,
            f64::from(region.y) + f64::from(region.h) * 0.5,
        );
        OverlayPlacement {
            center: self.canvas_pixel_to_world(center),
            width: self.pixel_to_world(f64::from(region.w)),
            height: self.pixel_to_world(f64::from(region.h)),
        }
    }
}

/// Height of the world area visible at `depth` for a vertical field of view.
#[must_use]
pub fn visible_height(fov_deg: f64, depth: f64) -> f64 {
    2.0 * (fov_deg.to_radians() * 0.5).tan() * depth
}
