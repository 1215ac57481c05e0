//! The editor: state machine, region model, camera, and undo history wired
//! together.
//!
//! [`Editor`] owns every piece of mutable editor state. Input arrives as
//! [`Event`]s (or raw pointer/key callbacks that are translated into them),
//! the pure transition table in [`crate::machine`] decides which actions run,
//! and the editor executes them against its state. Rendering and drawing go
//! out through the [`Renderer`] and [`CanvasSurface`] traits; anything only
//! the host can do (clipboard, file dialogs, image decoding, export) comes
//! back as an [`Effect`].
//!
//! Every committed change to a persisted field is published to the
//! [`Editor::on_change`] listeners.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::time::Instant;

use tracing::{debug, warn};

use crate::camera::{Camera, Point, Projection, Viewport};
use crate::config::EditorConfig;
use crate::debounce::Debouncer;
use crate::error::ImageError;
use crate::glyph::GlyphAtlas;
use crate::history::{UndoEntry, UndoRing};
use crate::input::{Button, Event, ImageBlob, Modifiers, Mode, PointerId, PointerTracker, translate_key};
use crate::machine::{Action, MachineState, dispatch};
use crate::persist::{Change, PersistedState};
use crate::prefs::{Color, Preferences, TextColors};
use crate::region::{Direction, Region, SnapGrid, return_marker};
use crate::surface::{CanvasSurface, OverlayKind, Renderer};
use crate::zoom::ZoomPan;

/// Screen position whose cell becomes the selection on a fresh session.
const DEFAULT_SELECTION_SCREEN: Point = Point { x: 128.0, y: 128.0 };

/// Work the host must carry out on the editor's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Copy the canvas pixels under `Region` to the clipboard.
    Copy(Region),
    /// Write the page frame out as an image file.
    Export(Region),
    /// Show a file picker; the chosen file comes back as
    /// [`Event::ImageSelected`].
    OpenImageDialog,
    /// Decode `blob` and report back through [`Editor::image_ready`].
    DecodeImage { ticket: u64, blob: ImageBlob },
    /// Focus the text input that receives typed characters.
    FocusKeyboard,
    /// Drop keyboard focus (two-pointer gestures).
    BlurKeyboard,
}

/// Change listener registered with [`Editor::on_change`].
pub type ChangeListener = Box<dyn FnMut(&Change)>;

/// Region and view state owned by the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorState {
    /// Cell that the next glyph or image writes into.
    pub selection: Region,
    /// Live preview of a resize drag.
    pub resize: Region,
    /// Export frame.
    pub page: Region,
    /// Start of the current typing run.
    pub return_anchor: Region,
    pub prefs: Preferences,
    /// Last known pointer position in screen pixels.
    pub pointer: Point,
    pub viewport: Viewport,
    pub projection: Projection,
}

impl EditorState {
    /// Canvas pixel under a screen point for the given camera.
    #[must_use]
    pub fn screen_to_canvas(&self, camera: &Camera, screen: Point) -> Point {
        let world = camera.screen_to_world(&self.viewport, screen);
        self.projection.world_to_canvas_pixel(world)
    }
}

/// The interaction core.
pub struct Editor<S: CanvasSurface> {
    config: EditorConfig,
    state: EditorState,
    machine: MachineState,
    zoom: ZoomPan,
    history: UndoRing<S::Snapshot>,
    surface: S,
    renderer: Box<dyn Renderer>,
    atlas: Box<dyn GlyphAtlas>,
    listeners: Vec<ChangeListener>,
    pointers: PointerTracker,
    /// World point where the current resize or page drag started.
    drag_origin: Option<Point>,
    /// Page frame preview of the current page drag, if it touches the canvas.
    page_preview: Option<Region>,
    glyph_regen: Debouncer<TextColors>,
    next_ticket: u64,
}

impl<S: CanvasSurface> Editor<S> {
    /// Start a session.
    ///
    /// Missing `seed` fields fall back to defaults: camera at `(0, 0, 3)`, a
    /// 16×32 selection snapped under screen point (128, 128), the anchor on
    /// the selection, and the page frame covering the whole canvas. The
    /// collaborators are brought in sync and the starting canvas is recorded
    /// as the first undo entry.
    pub fn new(
        config: EditorConfig,
        viewport: Viewport,
        seed: PersistedState,
        surface: S,
        renderer: Box<dyn Renderer>,
        mut atlas: Box<dyn GlyphAtlas>,
    ) -> Self {
        let mut projection = Projection::new(viewport.height);
        projection.fov_deg = viewport.fov_deg;
        projection.canvas_width = config.canvas_width;
        projection.canvas_height = config.canvas_height;
        let seed = seed.sanitized(&config, &projection);

        let zoom = ZoomPan::new(seed.camera.unwrap_or_default(), config.zoom_min, config.zoom_max);
        let full_canvas = Region::new(0, 0, config.canvas_width, config.canvas_height);

        let mut state = EditorState {
            selection: Region::new(config.canvas_width / 2, config.canvas_height / 2, config.snap_unit, config.snap_unit * 2),
            resize: Region::new(0, 0, 1, 1),
            page: seed.page.unwrap_or(full_canvas),
            return_anchor: Region::new(0, 0, 1, 1),
            prefs: seed.preferences.unwrap_or_default(),
            pointer: Point::default(),
            viewport,
            projection,
        };
        state.selection = seed.selection.unwrap_or_else(|| {
            let pixel = state.screen_to_canvas(&zoom.camera(), DEFAULT_SELECTION_SCREEN);
            state.selection.snapped_to(pixel)
        });
        state.resize = state.selection;
        state.return_anchor = seed.return_anchor.unwrap_or(state.selection);

        let mode = seed.mode.unwrap_or_default();
        atlas.regenerate(state.prefs.colors);

        let mut editor = Self {
            config,
            state,
            machine: MachineState::Idle(mode),
            zoom,
            history: UndoRing::new(config.undo_capacity),
            surface,
            renderer,
            atlas,
            listeners: Vec::new(),
            pointers: PointerTracker::new(config.drag_threshold_px),
            drag_origin: None,
            page_preview: None,
            glyph_regen: Debouncer::new(config.glyph_debounce),
            next_ticket: 0,
        };
        editor.sync_renderer();
        editor.snapshot();
        debug!(?mode, selection = ?editor.state.selection, "editor session started");
        editor
    }

    /// Register a persistence listener.
    pub fn on_change(&mut self, listener: impl FnMut(&Change) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> Region {
        self.state.selection
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.zoom.camera()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.machine.mode()
    }

    #[must_use]
    pub fn machine_state(&self) -> MachineState {
        self.machine
    }

    #[must_use]
    pub fn history(&self) -> &UndoRing<S::Snapshot> {
        &self.history
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Current values of every persisted field.
    #[must_use]
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            selection: Some(self.state.selection),
            return_anchor: Some(self.state.return_anchor),
            page: Some(self.state.page),
            camera: Some(self.zoom.camera()),
            mode: Some(self.mode()),
            preferences: Some(self.state.prefs),
        }
    }

    // --- Viewport ---

    /// Track a viewport resize. Canvas-pixel mapping keeps the startup height.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let fov_deg = self.state.viewport.fov_deg;
        self.state.viewport = Viewport { fov_deg, ..Viewport::new(width, height) };
        self.renderer.request_redraw();
    }

    // --- Raw input ---

    pub fn on_pointer_down(&mut self, id: PointerId, button: Button, pos: Point) -> Vec<Effect> {
        let events = self.pointers.down(id, button, pos);
        self.handle_all(events)
    }

    pub fn on_pointer_move(&mut self, id: PointerId, pos: Point) -> Vec<Effect> {
        let events = self.pointers.moved(id, pos);
        self.handle_all(events)
    }

    pub fn on_pointer_up(&mut self, id: PointerId, button: Button) -> Vec<Effect> {
        let events = self.pointers.up(id, button);
        self.handle_all(events)
    }

    /// Wheel at the last pointer position.
    pub fn on_wheel(&mut self, delta_y: f64) -> Vec<Effect> {
        self.handle(Event::Wheel { delta_y })
    }

    pub fn on_key_down(&mut self, key: &str, modifiers: Modifiers) -> Vec<Effect> {
        let events = translate_key(key, modifiers, self.config.platform);
        self.handle_all(events)
    }

    fn handle_all(&mut self, events: Vec<Event>) -> Vec<Effect> {
        let now = Instant::now();
        events.into_iter().flat_map(|event| self.handle_at(event, now)).collect()
    }

    // --- Events ---

    /// Feed one event through the state machine.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        self.handle_at(event, Instant::now())
    }

    /// Like [`Editor::handle`], with an explicit clock for debounced work.
    pub fn handle_at(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        let transition = dispatch(self.machine, &event);
        if transition.is_noop(self.machine) {
            return Vec::new();
        }
        if transition.next != self.machine {
            debug!(from = ?self.machine, to = ?transition.next, "machine transition");
        }
        self.machine = transition.next;

        let mut effects = Vec::new();
        for action in transition.actions {
            self.run(action, now, &mut effects);
        }
        effects
    }

    /// Completion of an [`Effect::DecodeImage`] request.
    ///
    /// The image lands under whatever the selection is now. A failed decode
    /// leaves the canvas and history untouched.
    pub fn image_ready(&mut self, ticket: u64, result: Result<S::Image, ImageError>) {
        let image = match result {
            Ok(image) => image,
            Err(e) => {
                warn!(ticket, error = %e, "image decode failed; dropping");
                return;
            }
        };
        let target = self.state.selection;
        self.surface.clear_region(target);
        self.surface.draw_image(&image, target, self.state.prefs.fit);
        debug!(ticket, ?target, fit = %self.state.prefs.fit, "image placed");
        self.advance();
        self.snapshot();
    }

    /// Run deferred work that has come due. Returns true when the glyph atlas
    /// was regenerated.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(colors) = self.glyph_regen.poll(now) else {
            return false;
        };
        self.atlas.regenerate(colors);
        self.renderer.request_redraw();
        debug!(?colors, "glyph atlas regenerated");
        true
    }

    /// When [`Editor::poll`] next has work, if ever.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.glyph_regen.deadline()
    }

    // --- Actions ---

    #[allow(clippy::too_many_lines)]
    fn run(&mut self, action: Action, now: Instant, effects: &mut Vec<Effect>) {
        match action {
            Action::TrackPointer(p) => self.state.pointer = p,
            Action::ZoomAtPointer { delta_y } => {
                self.zoom.zoom_at_point(&self.state.viewport, self.state.pointer, delta_y);
                self.camera_changed();
            }
            Action::ZoomIn => {
                self.zoom.zoom_centered(&self.state.viewport, self.config.zoom_step_px);
                self.camera_changed();
            }
            Action::ZoomOut => {
                self.zoom.zoom_centered(&self.state.viewport, -self.config.zoom_step_px);
                self.camera_changed();
            }
            Action::BeginPan => self.zoom.begin_pan(self.state.pointer),
            Action::PanToPointer => {
                self.zoom.pan_to(&self.state.viewport, self.state.pointer);
                self.camera_changed();
            }
            Action::EndPan => self.zoom.end_pan(),
            Action::BeginPinch { a, b } => {
                self.zoom.begin_pinch(a, b);
                effects.push(Effect::BlurKeyboard);
            }
            Action::PinchTo { a, b } => {
                self.zoom.pinch_to(&self.state.viewport, a, b);
                self.camera_changed();
            }
            Action::EndPinch => self.zoom.end_pinch(),
            Action::SelectAtPointer => {
                let pixel = self.pointer_pixel();
                self.set_selection(self.state.selection.snapped_to(pixel));
                effects.push(Effect::FocusKeyboard);
            }
            Action::SetReturnAnchor => self.set_return_anchor(),
            Action::BeginResize => self.begin_frame_drag(),
            Action::UpdateResize => self.update_resize(),
            Action::FinishResize => self.finish_resize(),
            Action::BeginPage => self.begin_frame_drag(),
            Action::UpdatePage => self.update_page(),
            Action::FinishPage => self.finish_page(),
            Action::SetMode(mode) => {
                self.renderer.set_page_highlight(mode == Mode::Page);
                self.renderer.request_redraw();
                self.publish(Change::Mode(mode));
            }
            Action::PrintGlyph(ch) => self.print_glyph(ch),
            Action::Backspace => {
                let back = self.state.selection.retreated(self.state.prefs.direction, self.state.prefs.auto_advance);
                self.set_selection(back);
                self.surface.fill_region(back, Color::BLACK);
                self.snapshot();
            }
            Action::Step(direction) => self.set_selection(self.state.selection.stepped(direction)),
            Action::ShiftByUnit(direction) => {
                let (dx, dy) = direction.delta();
                let unit = self.config.snap_unit;
                self.set_selection(self.state.selection.translated(dx * unit, dy * unit));
                self.regenerate_grid();
            }
            Action::GrowFromTopLeft(direction) => {
                self.set_selection(self.state.selection.grown_from_top_left(direction, self.config.snap_unit));
                self.regenerate_grid();
            }
            Action::GrowFromBottomRight(direction) => {
                self.set_selection(self.state.selection.grown_from_bottom_right(direction, self.config.snap_unit));
                self.regenerate_grid();
            }
            Action::MoveToReturn => {
                let next = self.state.selection.line_return(&self.state.return_anchor, self.state.prefs.direction);
                self.set_selection(next);
                self.set_return_anchor();
            }
            Action::SetDirection(direction) => self.set_direction(direction),
            Action::RotateDirection => self.set_direction(self.state.prefs.direction.clockwise()),
            Action::ToggleGrid => {
                self.state.prefs.show_grid = !self.state.prefs.show_grid;
                self.renderer.set_snap_grid_visible(self.state.prefs.show_grid);
                self.renderer.request_redraw();
                self.publish_prefs();
            }
            Action::ToggleAutoAdvance => {
                self.state.prefs.auto_advance = !self.state.prefs.auto_advance;
                self.publish_prefs();
            }
            Action::CycleFit => {
                self.state.prefs.fit = self.state.prefs.fit.next();
                self.publish_prefs();
            }
            Action::OpenImageDialog => effects.push(Effect::OpenImageDialog),
            Action::Export => effects.push(Effect::Export(self.state.page)),
            Action::Copy => effects.push(Effect::Copy(self.state.selection)),
            Action::Cut => {
                effects.push(Effect::Copy(self.state.selection));
                self.surface.fill_region(self.state.selection, Color::BLACK);
                self.renderer.request_redraw();
                self.snapshot();
            }
            Action::DecodeImage(blob) => {
                self.next_ticket += 1;
                debug!(ticket = self.next_ticket, mime = %blob.mime, bytes = blob.data.len(), "image decode requested");
                effects.push(Effect::DecodeImage { ticket: self.next_ticket, blob });
            }
            Action::RegenerateGlyphs(colors) => {
                self.state.prefs.colors = colors;
                self.glyph_regen.request(now, colors);
                self.publish_prefs();
            }
            Action::Undo => {
                if let Some(entry) = self.history.undo() {
                    self.surface.restore(&entry.canvas);
                    self.state.selection = entry.selection;
                    self.state.return_anchor = entry.return_anchor;
                    self.history_restored();
                } else {
                    debug!("nothing to undo");
                }
            }
            Action::Redo => {
                if let Some(entry) = self.history.redo() {
                    self.surface.restore(&entry.canvas);
                    self.state.selection = entry.selection;
                    self.state.return_anchor = entry.return_anchor;
                    self.history_restored();
                } else {
                    debug!("nothing to redo");
                }
            }
        }
    }

    fn print_glyph(&mut self, ch: char) {
        let target = self.state.selection;
        let Some(glyph) = self.atlas.locate(ch, target.w, target.h) else {
            debug!(?ch, "no glyph for character; ignoring");
            return;
        };
        self.surface.draw_glyph(&glyph, target);
        self.advance();
        self.snapshot();
    }

    fn advance(&mut self) {
        let next = self.state.selection.advanced(self.state.prefs.direction, self.state.prefs.auto_advance);
        self.set_selection(next);
    }

    fn set_direction(&mut self, direction: Direction) {
        self.state.prefs.direction = direction;
        self.render_return_marker();
        self.publish_prefs();
    }

    // --- Frame drags ---

    fn pointer_world(&self) -> Point {
        self.zoom.camera().screen_to_world(&self.state.viewport, self.state.pointer)
    }

    fn pointer_pixel(&self) -> Point {
        self.state.screen_to_canvas(&self.zoom.camera(), self.state.pointer)
    }

    /// Canvas-pixel corners of the current frame drag, if one is active.
    fn drag_corners(&self) -> Option<(Point, Point)> {
        let origin = self.drag_origin?;
        let projection = &self.state.projection;
        Some((projection.world_to_canvas_pixel(origin), projection.world_to_canvas_pixel(self.pointer_world())))
    }

    fn begin_frame_drag(&mut self) {
        self.drag_origin = Some(self.pointer_world());
        self.page_preview = None;
        self.renderer.set_base_grid_visible(true);
    }

    fn update_resize(&mut self) {
        let Some((a, b)) = self.drag_corners() else {
            return;
        };
        self.state.resize = Region::spanning(a, b, self.config.snap_unit);
        self.renderer.update_overlay(OverlayKind::Resize, self.state.resize);
        self.renderer.set_overlay_visible(OverlayKind::Resize, true);
        self.renderer.request_redraw();
    }

    fn finish_resize(&mut self) {
        self.drag_origin = None;
        self.renderer.set_overlay_visible(OverlayKind::Resize, false);
        self.renderer.set_base_grid_visible(false);
        debug!(region = ?self.state.resize, "resize committed");
        self.set_selection(self.state.resize);
        self.regenerate_grid();
    }

    fn update_page(&mut self) {
        let Some((a, b)) = self.drag_corners() else {
            return;
        };
        let (w, h) = (self.config.canvas_width, self.config.canvas_height);
        self.page_preview = Region::spanning_clamped(a, b, self.config.snap_unit, w, h);
        if let Some(preview) = self.page_preview {
            self.renderer.update_overlay(OverlayKind::Page, preview);
            self.renderer.request_redraw();
        }
    }

    fn finish_page(&mut self) {
        self.drag_origin = None;
        self.renderer.set_base_grid_visible(false);
        match self.page_preview.take() {
            Some(page) => {
                debug!(?page, "page frame committed");
                self.state.page = page;
                self.publish(Change::Page(page));
            }
            None => debug!("page drag stayed off canvas; keeping frame"),
        }
        self.renderer.update_overlay(OverlayKind::Page, self.state.page);
        self.renderer.request_redraw();
    }

    // --- State commits ---

    fn set_selection(&mut self, region: Region) {
        self.state.selection = region;
        self.renderer.update_overlay(OverlayKind::Selection, region);
        self.renderer.request_redraw();
        self.publish(Change::Selection(region));
    }

    fn set_return_anchor(&mut self) {
        self.state.return_anchor = self.state.selection;
        self.render_return_marker();
        self.publish(Change::ReturnAnchor(self.state.return_anchor));
    }

    fn render_return_marker(&mut self) {
        let direction = self.state.prefs.direction;
        self.renderer.set_return_marker(return_marker(&self.state.return_anchor, direction), direction);
        self.renderer.request_redraw();
    }

    fn regenerate_grid(&mut self) {
        let grid = SnapGrid::for_selection(&self.state.selection, self.config.canvas_width, self.config.canvas_height);
        self.renderer.regenerate_snap_grid(&grid);
        self.renderer.request_redraw();
    }

    fn camera_changed(&mut self) {
        let camera = self.zoom.camera();
        self.renderer.set_camera_position(camera);
        self.renderer.request_redraw();
        self.publish(Change::Camera(camera));
    }

    fn history_restored(&mut self) {
        self.renderer.update_overlay(OverlayKind::Selection, self.state.selection);
        self.render_return_marker();
        self.regenerate_grid();
        self.publish(Change::Selection(self.state.selection));
        self.publish(Change::ReturnAnchor(self.state.return_anchor));
    }

    fn snapshot(&mut self) {
        self.history.snapshot(UndoEntry {
            canvas: self.surface.snapshot(),
            selection: self.state.selection,
            return_anchor: self.state.return_anchor,
        });
        self.renderer.request_redraw();
    }

    fn publish_prefs(&mut self) {
        self.publish(Change::Preferences(self.state.prefs));
    }

    fn publish(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }

    /// Push every piece of state to the renderer.
    fn sync_renderer(&mut self) {
        let prefs = self.state.prefs;
        self.renderer.set_camera_position(self.zoom.camera());
        self.renderer.update_overlay(OverlayKind::Selection, self.state.selection);
        self.renderer.update_overlay(OverlayKind::Page, self.state.page);
        self.renderer.set_overlay_visible(OverlayKind::Selection, true);
        self.renderer.set_overlay_visible(OverlayKind::Page, true);
        self.renderer.set_overlay_visible(OverlayKind::Resize, false);
        self.renderer.set_snap_grid_visible(prefs.show_grid);
        self.renderer.set_base_grid_visible(false);
        self.renderer.set_page_highlight(self.mode() == Mode::Page);
        self.regenerate_grid();
        self.render_return_marker();
    }
}
