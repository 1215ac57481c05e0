//! One editing session: the editor plus everything the host does for it.
//!
//! DESIGN
//! ======
//! The editor is single-threaded and lives on the main task. Work it cannot
//! do itself comes back as [`Effect`]s, which the session carries out here:
//! clipboard copies go to an in-memory buffer, exports and saves go through
//! the [`Store`], and image decodes run on the blocking pool and come back
//! through the decode channel as [`Decoded`] messages.
//!
//! Applied input and change notifications mark the session dirty; state and
//! canvas are flushed on the autosave tick and at shutdown.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use canvas::camera::{Point, Projection, Viewport};
use canvas::input::{Event, ImageBlob, Modifiers};
use canvas::persist::PersistedState;
use canvas::prefs::TextColors;
use canvas::region::Region;
use canvas::{Editor, Effect, ImageError};
use image::{ImageFormat, RgbaImage};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::glyphs::{GlyphMasks, SharedColors, SheetAtlas};
use crate::renderer::{LogRenderer, SharedRenderer};
use crate::script::ScriptEvent;
use crate::store::Store;
use crate::surface::{RgbaSurface, decode_blob, encode_png};

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

/// A finished decode, routed back to [`Editor::image_ready`].
#[derive(Debug)]
pub struct Decoded {
    pub ticket: u64,
    pub result: Result<RgbaImage, ImageError>,
}

/// Host-facing notification written to stdout as one JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    Copied { region: Region },
    Exported { path: String },
    OpenImageRequested,
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    editor: Editor<RgbaSurface>,
    renderer: SharedRenderer,
    store: Store,
    clipboard: Option<RgbaImage>,
    decode_tx: mpsc::UnboundedSender<Decoded>,
    dirty: Rc<Cell<bool>>,
    notices: Vec<Notice>,
}

impl Session {
    /// Start a session seeded from the store. Unreadable saves are logged and
    /// replaced by a fresh session.
    pub fn open(config: &Config, decode_tx: mpsc::UnboundedSender<Decoded>) -> Self {
        let store = Store::new(config);
        let seed = store.load_state().unwrap_or_else(|e| {
            warn!(error = %e, "saved state unreadable; starting fresh");
            PersistedState::default()
        });

        let editor_config = config.editor;
        let width = u32::try_from(editor_config.canvas_width).unwrap_or(0);
        let height = u32::try_from(editor_config.canvas_height).unwrap_or(0);

        let colors = SharedColors::default();
        let masks = match &config.glyph_sheet_dir {
            Some(dir) => GlyphMasks::load_dir(dir, Rc::clone(&colors)),
            None => GlyphMasks::new(Rc::clone(&colors)),
        };
        let surface = match store.load_canvas(width, height) {
            Ok(Some(pixels)) => RgbaSurface::from_pixels(pixels, masks),
            Ok(None) => RgbaSurface::new(width, height, masks),
            Err(e) => {
                warn!(error = %e, "saved canvas unreadable; starting blank");
                RgbaSurface::new(width, height, masks)
            }
        };

        let viewport = Viewport::new(config.viewport_width, config.viewport_height);
        let mut projection = Projection::new(viewport.height);
        projection.canvas_width = editor_config.canvas_width;
        projection.canvas_height = editor_config.canvas_height;
        let renderer = SharedRenderer::new(LogRenderer::new(projection));

        let mut editor = Editor::new(
            editor_config,
            viewport,
            seed,
            surface,
            Box::new(renderer.clone()),
            Box::new(SheetAtlas::new(colors)),
        );

        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        editor.on_change(move |change| {
            debug!(key = change.key(), "state changed");
            flag.set(true);
        });

        info!(
            mode = %editor.mode(),
            selection = ?editor.selection(),
            camera = ?editor.camera(),
            "session opened"
        );
        Self { editor, renderer, store, clipboard: None, decode_tx, dirty, notices: Vec::new() }
    }

    #[must_use]
    pub fn editor(&self) -> &Editor<RgbaSurface> {
        &self.editor
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// When [`Session::poll`] next has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.editor.next_deadline()
    }

    // --- Input ---

    pub fn apply(&mut self, event: ScriptEvent) -> Flow {
        let effects = match event {
            ScriptEvent::PointerDown { id, button, x, y } => self.editor.on_pointer_down(id, button, Point::new(x, y)),
            ScriptEvent::PointerMove { id, x, y } => self.editor.on_pointer_move(id, Point::new(x, y)),
            ScriptEvent::PointerUp { id, button } => self.editor.on_pointer_up(id, button),
            ScriptEvent::Wheel { delta_y } => self.editor.on_wheel(delta_y),
            ScriptEvent::Key { key, modifiers } => self.editor.on_key_down(&key, modifiers),
            ScriptEvent::Text { text } => {
                let mut effects = Vec::new();
                for ch in text.chars() {
                    effects.extend(self.editor.on_key_down(&ch.to_string(), Modifiers::default()));
                }
                effects
            }
            ScriptEvent::Mode { mode } => self.editor.handle(Event::SetMode(mode)),
            ScriptEvent::Direction { direction } => self.editor.handle(Event::SetDirection(direction)),
            ScriptEvent::Colors { foreground, background } => {
                let colors = TextColors { foreground, background };
                self.editor.handle(Event::TextColorsChanged(colors))
            }
            ScriptEvent::Open { path } => match read_blob(&path) {
                Some(blob) => self.editor.handle(Event::ImageSelected(blob)),
                None => Vec::new(),
            },
            ScriptEvent::Paste { path } => {
                let blob = match path {
                    Some(path) => read_blob(&path),
                    None => self.clipboard_blob(),
                };
                self.editor.handle(Event::Paste(blob.into_iter().collect()))
            }
            ScriptEvent::Resize { width, height } => {
                self.editor.set_viewport(width, height);
                Vec::new()
            }
            ScriptEvent::Save => {
                self.save();
                return Flow::Continue;
            }
            ScriptEvent::Quit => return Flow::Quit,
        };
        self.dirty.set(true);
        self.run_effects(effects);
        self.renderer.frame();
        Flow::Continue
    }

    fn clipboard_blob(&mut self) -> Option<ImageBlob> {
        let pixels = self.clipboard.as_ref()?;
        match encode_png(pixels) {
            Ok(blob) => Some(blob),
            Err(e) => {
                warn!(error = %e, "clipboard encode failed");
                None
            }
        }
    }

    // --- Effects ---

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Copy(region) => {
                    self.clipboard = self.editor.surface().crop(region);
                    debug!(?region, "copied to clipboard");
                    self.notices.push(Notice::Copied { region });
                }
                Effect::Export(page) => self.export(page),
                Effect::OpenImageDialog => {
                    info!("open image requested; send an `open` line with a path");
                    self.notices.push(Notice::OpenImageRequested);
                }
                Effect::DecodeImage { ticket, blob } => self.spawn_decode(ticket, blob),
                Effect::FocusKeyboard | Effect::BlurKeyboard => debug!(?effect, "focus change"),
            }
        }
    }

    fn spawn_decode(&self, ticket: u64, blob: ImageBlob) {
        let tx = self.decode_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = decode_blob(&blob);
            if tx.send(Decoded { ticket, result }).is_err() {
                debug!(ticket, "session closed before decode finished");
            }
        });
    }

    fn export(&mut self, page: Region) {
        let Some(pixels) = self.editor.surface().crop(page) else {
            warn!(?page, "page frame lies off the canvas; nothing to export");
            return;
        };
        let unix_secs = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
        match self.store.export(&pixels, unix_secs) {
            Ok(path) => {
                info!(path = %path.display(), ?page, "page exported");
                self.notices.push(Notice::Exported { path: path.display().to_string() });
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.notices.push(Notice::Error { message: e.to_string() });
            }
        }
    }

    // --- Background completions ---

    pub fn image_ready(&mut self, decoded: Decoded) {
        self.editor.image_ready(decoded.ticket, decoded.result);
        self.dirty.set(true);
        self.renderer.frame();
    }

    pub fn poll(&mut self, now: Instant) {
        if self.editor.poll(now) {
            self.renderer.frame();
        }
    }

    // --- Persistence ---

    /// Flush state and canvas if anything changed since the last flush.
    pub fn autosave(&mut self) {
        if self.dirty.get() {
            self.save();
        }
    }

    pub fn save(&mut self) {
        let state = self.editor.persisted();
        let result = self
            .store
            .save_state(&state)
            .and_then(|()| self.store.save_canvas(self.editor.surface().pixels()));
        match result {
            Ok(()) => {
                self.dirty.set(false);
                debug!("session saved");
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                self.notices.push(Notice::Error { message: e.to_string() });
            }
        }
    }
}

/// Read an image file, guessing its media type from the extension.
fn read_blob(path: &Path) -> Option<ImageBlob> {
    let mime = ImageFormat::from_path(path).map_or("application/octet-stream", |f| f.to_mime_type());
    match std::fs::read(path) {
        Ok(bytes) => Some(ImageBlob::new(mime, bytes)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "image file unreadable");
            None
        }
    }
}
