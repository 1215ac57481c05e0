//! Headless scene renderer.
//!
//! There is no window: the renderer keeps the scene description the editor
//! pushes (camera, overlays, grids, marker) and traces what a real renderer
//! would draw. Redraw requests between two frames coalesce into one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use canvas::camera::{Camera, Point, Projection};
use canvas::region::{Direction, Region, SnapGrid};
use canvas::surface::{OverlayKind, Renderer};
use tracing::{debug, trace};

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub region: Region,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub overlays: HashMap<OverlayKind, Overlay>,
    pub snap_grid: Option<SnapGrid>,
    pub snap_grid_visible: bool,
    pub base_grid_visible: bool,
    pub page_highlight: bool,
    pub return_marker: Option<(Point, Direction)>,
}

pub struct LogRenderer {
    projection: Projection,
    scene: Scene,
    redraw_pending: bool,
    frames: u64,
}

impl LogRenderer {
    #[must_use]
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            scene: Scene {
                camera: Camera::default(),
                overlays: HashMap::new(),
                snap_grid: None,
                snap_grid_visible: false,
                base_grid_visible: false,
                page_highlight: false,
                return_marker: None,
            },
            redraw_pending: false,
            frames: 0,
        }
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw one frame if a redraw was requested since the last one.
    pub fn frame(&mut self) -> bool {
        if !self.redraw_pending {
            return false;
        }
        self.redraw_pending = false;
        self.frames += 1;
        let scene = &self.scene;
        for (kind, overlay) in &scene.overlays {
            if overlay.visible {
                let placement = self.projection.overlay_placement(overlay.region);
                trace!(?kind, center = ?placement.center, width = placement.width, height = placement.height, "overlay");
            }
        }
        debug!(
            frame = self.frames,
            camera = ?scene.camera,
            grid = scene.snap_grid_visible,
            page_highlight = scene.page_highlight,
            "frame drawn"
        );
        true
    }

    fn overlay_mut(&mut self, kind: OverlayKind) -> &mut Overlay {
        self.scene.overlays.entry(kind).or_insert(Overlay { region: Region::new(0, 0, 1, 1), visible: false })
    }
}

impl Renderer for LogRenderer {
    fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    fn update_overlay(&mut self, kind: OverlayKind, region: Region) {
        self.overlay_mut(kind).region = region;
    }

    fn set_overlay_visible(&mut self, kind: OverlayKind, visible: bool) {
        self.overlay_mut(kind).visible = visible;
    }

    fn set_camera_position(&mut self, camera: Camera) {
        self.scene.camera = camera;
    }

    fn regenerate_snap_grid(&mut self, grid: &SnapGrid) {
        trace!(cols = grid.cols, rows = grid.rows, cell_w = grid.cell_w, cell_h = grid.cell_h, "snap grid rebuilt");
        self.scene.snap_grid = Some(*grid);
    }

    fn set_snap_grid_visible(&mut self, visible: bool) {
        self.scene.snap_grid_visible = visible;
    }

    fn set_base_grid_visible(&mut self, visible: bool) {
        self.scene.base_grid_visible = visible;
    }

    fn set_page_highlight(&mut self, highlighted: bool) {
        self.scene.page_highlight = highlighted;
    }

    fn set_return_marker(&mut self, at: Point, direction: Direction) {
        self.scene.return_marker = Some((at, direction));
    }
}

/// Shared handle: the editor owns one clone, the frame loop another.
#[derive(Clone)]
pub struct SharedRenderer(pub Rc<RefCell<LogRenderer>>);

impl SharedRenderer {
    #[must_use]
    pub fn new(renderer: LogRenderer) -> Self {
        Self(Rc::new(RefCell::new(renderer)))
    }

    pub fn frame(&self) -> bool {
        self.0.borrow_mut().frame()
    }
}

impl Renderer for SharedRenderer {
    fn request_redraw(&mut self) {
        self.0.borrow_mut().request_redraw();
    }

    fn update_overlay(&mut self, kind: OverlayKind, region: Region) {
        self.0.borrow_mut().update_overlay(kind, region);
    }

    fn set_overlay_visible(&mut self, kind: OverlayKind, visible: bool) {
        self.0.borrow_mut().set_overlay_visible(kind, visible);
    }

    fn set_camera_position(&mut self, camera: Camera) {
        self.0.borrow_mut().set_camera_position(camera);
    }

    fn regenerate_snap_grid(&mut self, grid: &SnapGrid) {
        self.0.borrow_mut().regenerate_snap_grid(grid);
    }

    fn set_snap_grid_visible(&mut self, visible: bool) {
        self.0.borrow_mut().set_snap_grid_visible(visible);
    }

    fn set_base_grid_visible(&mut self, visible: bool) {
        self.0.borrow_mut().set_base_grid_visible(visible);
    }

    fn set_page_highlight(&mut self, highlighted: bool) {
        self.0.borrow_mut().set_page_highlight(highlighted);
    }

    fn set_return_marker(&mut self, at: Point, direction: Direction) {
        self.0.borrow_mut().set_return_marker(at, direction);
    }
}
