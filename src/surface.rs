//! The canvas bitmap: an in-memory RGBA image the editor draws into.
//!
//! Regions are clipped to the bitmap before any pixel is touched, so the
//! editor may hand over cells that hang off the canvas edge.

use std::io::Cursor;

use canvas::ImageError;
use canvas::glyph::GlyphRef;
use canvas::input::ImageBlob;
use canvas::prefs::{Color, FitMode};
use canvas::region::Region;
use canvas::surface::{CanvasSurface, place_image};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Pixel, Rgba, RgbaImage};

use crate::glyphs::GlyphMasks;

#[cfg(test)]
#[path = "surface_test.rs"]
mod tests;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pixel bounds of a clipped region, end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

pub struct RgbaSurface {
    pixels: RgbaImage,
    glyphs: GlyphMasks,
}

impl RgbaSurface {
    /// Fully transparent canvas.
    #[must_use]
    pub fn new(width: u32, height: u32, glyphs: GlyphMasks) -> Self {
        Self::from_pixels(RgbaImage::from_pixel(width, height, TRANSPARENT), glyphs)
    }

    #[must_use]
    pub fn from_pixels(pixels: RgbaImage, glyphs: GlyphMasks) -> Self {
        Self { pixels, glyphs }
    }

    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copy of the pixels under `region`, clipped to the canvas.
    #[must_use]
    pub fn crop(&self, region: Region) -> Option<RgbaImage> {
        let span = self.clip(region)?;
        Some(imageops::crop_imm(&self.pixels, span.x0, span.y0, span.x1 - span.x0, span.y1 - span.y0).to_image())
    }

    fn clip(&self, region: Region) -> Option<Span> {
        let (width, height) = self.pixels.dimensions();
        let clamp_x = |v: i64| v.clamp(0, i64::from(width)) as u32;
        let clamp_y = |v: i64| v.clamp(0, i64::from(height)) as u32;
        let span = Span {
            x0: clamp_x(i64::from(region.x)),
            y0: clamp_y(i64::from(region.y)),
            x1: clamp_x(i64::from(region.x) + i64::from(region.w)),
            y1: clamp_y(i64::from(region.y) + i64::from(region.h)),
        };
        (span.x1 > span.x0 && span.y1 > span.y0).then_some(span)
    }

    fn fill(&mut self, region: Region, pixel: Rgba<u8>) {
        let Some(span) = self.clip(region) else {
            return;
        };
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                self.pixels.put_pixel(x, y, pixel);
            }
        }
    }
}

fn opaque(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

fn mix(paper: Color, ink: Color, coverage: u8) -> Rgba<u8> {
    let t = u16::from(coverage);
    let lerp = |a: u8, b: u8| ((u16::from(a) * (255 - t) + u16::from(b) * t) / 255) as u8;
    Rgba([lerp(paper.r, ink.r), lerp(paper.g, ink.g), lerp(paper.b, ink.b), 255])
}

impl CanvasSurface for RgbaSurface {
    type Snapshot = RgbaImage;
    type Image = RgbaImage;

    fn draw_glyph(&mut self, glyph: &GlyphRef, dest: Region) {
        let colors = self.glyphs.colors();
        let Some(span) = self.clip(dest) else {
            return;
        };
        let Some(mask) = self.glyphs.mask(glyph.sheet_size) else {
            tracing::debug!(size = glyph.sheet_size, ch = ?glyph.ch, "no mask for sheet; drawing paper only");
            self.fill(dest, opaque(colors.background));
            return;
        };
        let (mask_w, mask_h) = mask.dimensions();
        let src = glyph.src;
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                // Nearest sample of the source cell stretched over the destination.
                let dx = i64::from(x) - i64::from(dest.x);
                let dy = i64::from(y) - i64::from(dest.y);
                let sx = i64::from(src.x) + dx * i64::from(src.w) / i64::from(dest.w.max(1));
                let sy = i64::from(src.y) + dy * i64::from(src.h) / i64::from(dest.h.max(1));
                let coverage = if (0..i64::from(mask_w)).contains(&sx) && (0..i64::from(mask_h)).contains(&sy) {
                    mask.get_pixel(sx as u32, sy as u32).0[0]
                } else {
                    0
                };
                self.pixels.put_pixel(x, y, mix(colors.background, colors.foreground, coverage));
            }
        }
    }

    fn fill_region(&mut self, region: Region, color: Color) {
        self.fill(region, opaque(color));
    }

    fn clear_region(&mut self, region: Region) {
        self.fill(region, TRANSPARENT);
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Region, fit: FitMode) {
        let placement = place_image(image.width(), image.height(), dest, fit);
        let Some(span) = self.clip(placement.clip) else {
            return;
        };
        let (image_w, image_h) = image.dimensions();
        if image_w == 0 || image_h == 0 {
            return;
        }
        let origin_x = placement.x.round() as i64;
        let origin_y = placement.y.round() as i64;
        let scale_x = placement.w.max(1.0) / f64::from(image_w);
        let scale_y = placement.h.max(1.0) / f64::from(image_h);

        // Only the source pixels under the visible window get scaled, plus a
        // one-pixel margin for the filter.
        let window = |lo: u32, hi: u32, origin: i64, scale: f64, len: u32| {
            let first = ((i64::from(lo) - origin) as f64 / scale).floor() as i64 - 1;
            let last = ((i64::from(hi) - origin) as f64 / scale).ceil() as i64 + 1;
            (first.clamp(0, i64::from(len)) as u32, last.clamp(0, i64::from(len)) as u32)
        };
        let (src_x0, src_x1) = window(span.x0, span.x1, origin_x, scale_x, image_w);
        let (src_y0, src_y1) = window(span.y0, span.y1, origin_y, scale_y, image_h);
        if src_x1 <= src_x0 || src_y1 <= src_y0 {
            return;
        }
        let source = imageops::crop_imm(image, src_x0, src_y0, src_x1 - src_x0, src_y1 - src_y0).to_image();
        let scaled_w = (f64::from(src_x1 - src_x0) * scale_x).round().max(1.0) as u32;
        let scaled_h = (f64::from(src_y1 - src_y0) * scale_y).round().max(1.0) as u32;
        let scaled = imageops::resize(&source, scaled_w, scaled_h, FilterType::Triangle);
        let left = origin_x + (f64::from(src_x0) * scale_x).round() as i64;
        let top = origin_y + (f64::from(src_y0) * scale_y).round() as i64;

        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                let sx = i64::from(x) - left;
                let sy = i64::from(y) - top;
                if sx < 0 || sy < 0 || sx >= i64::from(scaled_w) || sy >= i64::from(scaled_h) {
                    continue;
                }
                let src = *scaled.get_pixel(sx as u32, sy as u32);
                match src.0[3] {
                    0 => {}
                    255 => self.pixels.put_pixel(x, y, src),
                    _ => self.pixels.get_pixel_mut(x, y).blend(&src),
                }
            }
        }
    }

    fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    fn restore(&mut self, snapshot: &RgbaImage) {
        self.pixels.clone_from(snapshot);
    }
}

/// Decode a pasted, dropped, or opened image into RGBA pixels.
pub fn decode_blob(blob: &ImageBlob) -> Result<RgbaImage, ImageError> {
    let format = ImageFormat::from_mime_type(&blob.mime).ok_or_else(|| ImageError::Unsupported(blob.mime.clone()))?;
    image::load_from_memory_with_format(&blob.data, format)
        .map(|decoded| decoded.to_rgba8())
        .map_err(|e| ImageError::Decode(e.to_string()))
}

/// PNG-encode pixels into a blob the editor can paste.
pub fn encode_png(pixels: &RgbaImage) -> Result<ImageBlob, image::ImageError> {
    let mut bytes = Vec::new();
    pixels.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(ImageBlob::new("image/png", bytes))
}
