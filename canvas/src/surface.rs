//! Boundaries to the external collaborators: the scene renderer and the
//! bitmap drawing surface.
//!
//! The editor only ever writes through these traits. It never reads
//! rendering state back, and the collaborators never mutate editor state.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::camera::{Camera, Point};
use crate::glyph::GlyphRef;
use crate::prefs::{Color, FitMode};
use crate::region::{Direction, Region, SnapGrid};

/// Region overlays the renderer draws over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Selection,
    /// Live preview while a resize drag is in progress.
    Resize,
    /// Export frame.
    Page,
}

/// Scene renderer (consumed).
pub trait Renderer {
    /// Schedule a redraw of the scene.
    fn request_redraw(&mut self);

    /// Move or resize an overlay to outline `region`.
    fn update_overlay(&mut self, kind: OverlayKind, region: Region);

    fn set_overlay_visible(&mut self, kind: OverlayKind, visible: bool);

    /// Mirror the camera.
    fn set_camera_position(&mut self, camera: Camera);

    /// Replace the selection-lattice grid overlay.
    fn regenerate_snap_grid(&mut self, grid: &SnapGrid);

    fn set_snap_grid_visible(&mut self, visible: bool);

    /// The fixed 16-pixel base grid shown while drawing frames.
    fn set_base_grid_visible(&mut self, visible: bool);

    /// Emphasize the page frame while page mode is active.
    fn set_page_highlight(&mut self, highlighted: bool);

    /// Place the typing-run start marker (canvas pixels) and direction arrow.
    fn set_return_marker(&mut self, at: Point, direction: Direction);
}

/// Bitmap drawing surface addressed in canvas pixels (consumed).
///
/// `Snapshot` is an owned full-canvas copy; `Image` is a decoded image the
/// host produced.
pub trait CanvasSurface {
    type Snapshot;
    type Image;

    /// Stretch the glyph's sheet cell over `dest`.
    fn draw_glyph(&mut self, glyph: &GlyphRef, dest: Region);

    fn fill_region(&mut self, region: Region, color: Color);

    /// Reset `region` to transparent.
    fn clear_region(&mut self, region: Region);

    /// Draw `image` into `dest` according to `fit`. See [`place_image`].
    fn draw_image(&mut self, image: &Self::Image, dest: Region, fit: FitMode);

    fn snapshot(&self) -> Self::Snapshot;

    fn restore(&mut self, snapshot: &Self::Snapshot);
}

/// Where a fitted image lands, in canvas pixels.
///
/// `x`, `y`, `w`, `h` is the full scaled image rectangle; anything outside
/// `clip` (the destination cell) must not be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub clip: Region,
}

/// Compute the placement of an `image_w × image_h` image into `dest`.
///
/// - `Fill` stretches to the cell.
/// - `Contain` scales to fit inside the cell, centered, preserving aspect.
/// - `Cover` scales to cover the cell, centered, preserving aspect; overflow
///   is clipped.
#[must_use]
pub fn place_image(image_w: u32, image_h: u32, dest: Region, fit: FitMode) -> Placement {
    let dst_w = f64::from(dest.w);
    let dst_h = f64::from(dest.h);
    let mut w = dst_w;
    let mut h = dst_h;

    if image_w > 0 && image_h > 0 && dest.w > 0 && dest.h > 0 {
        let aspect = f64::from(image_w) / f64::from(image_h);
        let dst_aspect = dst_w / dst_h;
        match fit {
            FitMode::Fill => {}
            FitMode::Contain => {
                if aspect > dst_aspect {
                    h = dst_w / aspect;
                } else {
                    w = dst_h * aspect;
                }
            }
            FitMode::Cover => {
                if aspect > dst_aspect {
                    w = dst_h * aspect;
                } else {
                    h = dst_w / aspect;
                }
            }
        }
    }

    Placement {
        x: f64::from(dest.x) + dst_w * 0.5 - w * 0.5,
        y: f64::from(dest.y) + dst_h * 0.5 - h * 0.5,
        w,
        h,
        clip: dest,
    }
}
