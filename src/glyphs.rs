//! Glyph masks for the bitmap surface and the atlas handed to the editor.
//!
//! Masks are grayscale sheets laid out the way [`canvas::glyph::GlyphSheet`]
//! describes, one file per size (`glyphs-<size>.png`): white is ink, black is
//! paper. The surface tints them with the current text colors when it draws,
//! so "regenerating" the atlas only swaps the shared colors.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use canvas::consts::GLYPH_SIZES;
use canvas::glyph::{GlyphAtlas, GlyphRef, GridGlyphAtlas};
use canvas::prefs::TextColors;
use image::GrayImage;
use tracing::{debug, info, warn};

/// Text colors shared between the atlas (writer) and the surface (reader).
pub type SharedColors = Rc<Cell<TextColors>>;

/// Loaded glyph masks keyed by sheet size.
#[derive(Debug, Default)]
pub struct GlyphMasks {
    masks: HashMap<i32, GrayImage>,
    colors: SharedColors,
}

impl GlyphMasks {
    #[must_use]
    pub fn new(colors: SharedColors) -> Self {
        Self { masks: HashMap::new(), colors }
    }

    /// Load every `glyphs-<size>.png` present in `dir`. Missing sizes are
    /// skipped; glyphs on those sheets draw as plain background.
    #[must_use]
    pub fn load_dir(dir: &Path, colors: SharedColors) -> Self {
        let mut masks = Self::new(colors);
        for size in GLYPH_SIZES {
            let path = dir.join(format!("glyphs-{size}.png"));
            if !path.exists() {
                debug!(path = %path.display(), "no glyph mask for size");
                continue;
            }
            match image::open(&path) {
                Ok(sheet) => masks.insert(size, sheet.to_luma8()),
                Err(e) => warn!(path = %path.display(), error = %e, "glyph mask unreadable; skipping"),
            }
        }
        info!(dir = %dir.display(), sheets = masks.masks.len(), "glyph masks loaded");
        masks
    }

    pub fn insert(&mut self, size: i32, mask: GrayImage) {
        self.masks.insert(size, mask);
    }

    #[must_use]
    pub fn mask(&self, size: i32) -> Option<&GrayImage> {
        self.masks.get(&size)
    }

    #[must_use]
    pub fn colors(&self) -> TextColors {
        self.colors.get()
    }
}

/// [`GridGlyphAtlas`] layout plus the shared tint.
#[derive(Debug)]
pub struct SheetAtlas {
    layout: GridGlyphAtlas,
    colors: SharedColors,
}

impl SheetAtlas {
    #[must_use]
    pub fn new(colors: SharedColors) -> Self {
        Self { layout: GridGlyphAtlas::default(), colors }
    }
}

impl GlyphAtlas for SheetAtlas {
    fn locate(&self, ch: char, cell_w: i32, cell_h: i32) -> Option<GlyphRef> {
        self.layout.locate(ch, cell_w, cell_h)
    }

    fn regenerate(&mut self, colors: TextColors) {
        self.layout.regenerate(colors);
        self.colors.set(colors);
        debug!(generation = self.layout.generation(), foreground = %colors.foreground, background = %colors.background, "glyph tint updated");
    }
}
