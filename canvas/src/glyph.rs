//! Glyph atlas layout: which sheet and which cell a typed character comes
//! from.
//!
//! Glyphs are rasterized by the host onto sheets, one per configured size.
//! A sheet of size `s` holds cells `s/2` wide and `s` tall, packed left to
//! right in atlas order across a fixed sheet width. The editor only needs the
//! layout arithmetic; pixels stay with the host.

#[cfg(test)]
#[path = "glyph_test.rs"]
mod glyph_test;

use crate::consts::{GLYPH_CHARS, GLYPH_SHEET_WIDTH, GLYPH_SIZES};
use crate::prefs::TextColors;
use crate::region::Region;

/// A located glyph: which sheet, which source cell, and which atlas
/// generation it was located against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRef {
    pub ch: char,
    /// Position of `ch` in atlas order.
    pub index: usize,
    /// Index of the sheet in the atlas' size list.
    pub sheet: usize,
    /// Cell height of that sheet.
    pub sheet_size: i32,
    /// Source cell on the sheet, in sheet pixels.
    pub src: Region,
    pub generation: u64,
}

/// Glyph atlas provider (consumed).
pub trait GlyphAtlas {
    /// Locate `ch` on the sheet that best fits a `cell_w × cell_h` cell.
    fn locate(&self, ch: char, cell_w: i32, cell_h: i32) -> Option<GlyphRef>;

    /// Re-rasterize every sheet with new colors.
    fn regenerate(&mut self, colors: TextColors);
}

/// Cell layout of one glyph sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSheet {
    pub size: i32,
    pub char_width: i32,
    pub char_height: i32,
    pub cols: i32,
}

impl GlyphSheet {
    #[must_use]
    pub fn new(size: i32) -> Self {
        let size = size.max(2);
        let char_width = size / 2;
        Self { size, char_width, char_height: size, cols: (GLYPH_SHEET_WIDTH / char_width).max(1) }
    }

    /// Source cell of the glyph at atlas position `index`.
    #[must_use]
    pub fn cell(&self, index: usize) -> Region {
        let index = i32::try_from(index).unwrap_or(i32::MAX);
        let col = index % self.cols;
        let row = index / self.cols;
        Region::new(col * self.char_width, row * self.char_height, self.char_width, self.char_height)
    }

    /// Sheet height needed for `glyphs` characters.
    #[must_use]
    pub fn height_for(&self, glyphs: usize) -> i32 {
        let glyphs = i32::try_from(glyphs).unwrap_or(i32::MAX);
        ((glyphs + self.cols - 1) / self.cols) * self.char_height
    }
}

/// Layout-only atlas over [`GLYPH_CHARS`].
#[derive(Debug, Clone)]
pub struct GridGlyphAtlas {
    chars: Vec<char>,
    sheets: Vec<GlyphSheet>,
    colors: TextColors,
    generation: u64,
}

impl Default for GridGlyphAtlas {
    fn default() -> Self {
        Self::new(&GLYPH_SIZES)
    }
}

impl GridGlyphAtlas {
    /// Build sheets for `sizes`, which must be ascending.
    #[must_use]
    pub fn new(sizes: &[i32]) -> Self {
        Self {
            chars: GLYPH_CHARS.chars().collect(),
            sheets: sizes.iter().map(|s| GlyphSheet::new(*s)).collect(),
            colors: TextColors::default(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[must_use]
    pub fn sheets(&self) -> &[GlyphSheet] {
        &self.sheets
    }

    #[must_use]
    pub fn colors(&self) -> TextColors {
        self.colors
    }

    /// Bumped on every regeneration.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn index_of(&self, ch: char) -> Option<usize> {
        self.chars.iter().position(|c| *c == ch)
    }

    /// Sheet for a cell: the smallest size at least `max(2·w, h)`, or the
    /// largest sheet when none is big enough.
    #[must_use]
    pub fn sheet_for_cell(&self, cell_w: i32, cell_h: i32) -> Option<usize> {
        let target = (cell_w * 2).max(cell_h);
        self.sheets
            .iter()
            .position(|s| s.size >= target)
            .or_else(|| self.sheets.len().checked_sub(1))
    }
}

impl GlyphAtlas for GridGlyphAtlas {
    fn locate(&self, ch: char, cell_w: i32, cell_h: i32) -> Option<GlyphRef> {
        let index = self.index_of(ch)?;
        let sheet = self.sheet_for_cell(cell_w, cell_h)?;
        let layout = self.sheets.get(sheet)?;
        Some(GlyphRef {
            ch,
            index,
            sheet,
            sheet_size: layout.size,
            src: layout.cell(index),
            generation: self.generation,
        })
    }

    fn regenerate(&mut self, colors: TextColors) {
        self.colors = colors;
        self.generation += 1;
    }
}
