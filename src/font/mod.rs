// Font glyph rasterization
//
// Single-shot wrapper around fontdue: parse the supplied font bytes, render
// one character at the requested pixel size, and report the bitmap together
// with FreeType-style metrics the managed side expects. No caching or text
// layout happens here.

use fontdue::{Font, FontSettings};
use log::debug;

use crate::error::FontError;

/// A rasterized glyph with FreeType-style metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRaster {
    /// 8-bit coverage bitmap, row-major, `width * height` bytes
    pub bitmap: Vec<u8>,
    /// Bitmap width in pixels
    pub width: i32,
    /// Bitmap height in pixels (rows)
    pub height: i32,
    /// Horizontal distance from the pen position to the bitmap's left edge
    pub bearing_x: i32,
    /// Vertical distance from the baseline up to the bitmap's top edge
    pub bearing_y: i32,
    /// Horizontal pen advance in 26.6 fixed point, matching what FreeType
    /// reports and the managed side divides down
    pub advance: i32,
}

/// Parse `font_bytes` and rasterize `ch` at `size_px` pixels.
pub fn rasterize_glyph(font_bytes: &[u8], ch: char, size_px: u32) -> Result<GlyphRaster, FontError> {
    let font =
        Font::from_bytes(font_bytes, FontSettings::default()).map_err(|reason| {
            FontError::FaceParse {
                reason: reason.to_string(),
            }
        })?;

    // Index 0 is the .notdef glyph
    if font.lookup_glyph_index(ch) == 0 {
        return Err(FontError::GlyphMissing { ch });
    }

    let (metrics, bitmap) = font.rasterize(ch, size_px as f32);
    debug!(
        "rasterized {:?} at {}px: {}x{}",
        ch, size_px, metrics.width, metrics.height
    );

    Ok(GlyphRaster {
        bitmap,
        width: metrics.width as i32,
        height: metrics.height as i32,
        bearing_x: metrics.xmin,
        bearing_y: metrics.ymin + metrics.height as i32,
        advance: (metrics.advance_width * 64.0).round() as i32,
    })
}
