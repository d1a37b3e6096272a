//! Text shaping and glyph rasterization via `cosmic-text`.
//!
//! The effect draws one character at a time, each with its own rotation
//! and pixel size, so shaping happens per character instead of per line.
//! Shaping results are memoized by `(char, px)`; rasterization goes
//! through cosmic-text's swash cache.

use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, CacheKey, Family, FontSystem, Metrics, Shaping, SwashCache};
use glyph_simulation::GlyphMetrics;

/// Line height used while shaping, relative to the font size.
const SHAPING_LINE_HEIGHT: f32 = 1.2;

/// A shaped single character at a specific pixel size.
#[derive(Copy, Clone, Debug)]
pub struct ShapedGlyph {
    /// Font-specific glyph index.
    pub glyph_id: u16,
    /// Exact raster cache key, including subpixel and hinting decisions.
    pub cache_key: CacheKey,
    /// Pen offset from the top-left of the line box, y down. The
    /// bitmap's bearing is applied on top of this.
    pub offset: [f32; 2],
    /// Advance width in pixels.
    pub advance: f32,
}

/// CPU-side coverage bitmap for an `R8Unorm` atlas upload.
pub struct GlyphImage {
    /// Bitmap dimensions in pixels.
    pub size: [u32; 2],
    /// Bearing (left, top) in a y-down space, relative to the pen.
    pub bearing: [i32; 2],
    /// Row-major coverage bytes, length `width * height`.
    pub pixels: Vec<u8>,
}

/// Shaping + rasterization engine over the system sans-serif family.
pub struct Typesetter {
    font_system: FontSystem,
    swash_cache: SwashCache,

    // Memoized shaping results. `None` marks characters the font stack
    // cannot shape, so they are not retried every frame.
    shaped: HashMap<(char, u16), Option<ShapedGlyph>>,
}

impl Typesetter {
    /// Load the system font database. Glyphs resolve through the
    /// generic sans-serif family.
    pub fn new() -> Self {
        let font_system = FontSystem::new();
        log::info!(
            "✓ Typesetter ready ({} font faces)",
            font_system.db().faces().count()
        );
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            shaped: HashMap::new(),
        }
    }

    /// Shape `ch` at `px` pixels, memoized.
    pub fn shaped(&mut self, ch: char, px: u16) -> Option<ShapedGlyph> {
        if let Some(cached) = self.shaped.get(&(ch, px)) {
            return *cached;
        }

        let metrics = Metrics::new(px as f32, px as f32 * SHAPING_LINE_HEIGHT);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(
            &mut self.font_system,
            Some(f32::MAX),
            Some(metrics.line_height),
        );

        let mut utf8 = [0u8; 4];
        let attrs = Attrs::new().family(Family::SansSerif);
        buffer.set_text(
            &mut self.font_system,
            ch.encode_utf8(&mut utf8),
            &attrs,
            Shaping::Advanced,
            None,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        // One character shapes to at most one glyph in the first run.
        // `physical()` gives the exact raster key plus the integer
        // placement offsets that pixel-grid alignment requires.
        let shaped = buffer.layout_runs().next().and_then(|run| {
            run.glyphs.first().map(|glyph| {
                let physical = glyph.physical((0.0, 0.0), 1.0);
                ShapedGlyph {
                    glyph_id: physical.cache_key.glyph_id,
                    cache_key: physical.cache_key,
                    offset: [physical.x as f32, run.line_y + physical.y as f32],
                    advance: glyph.w,
                }
            })
        });

        if shaped.is_none() {
            log::warn!("no glyph for {ch:?} at {px}px, using fallback advance");
        }
        self.shaped.insert((ch, px), shaped);
        shaped
    }

    /// Rasterize the coverage mask for a shaped glyph.
    ///
    /// Color glyphs (emoji) are not supported by the R8 atlas and come
    /// back as `None`.
    pub fn rasterize(&mut self, cache_key: CacheKey) -> Option<GlyphImage> {
        let image = self
            .swash_cache
            .get_image(&mut self.font_system, cache_key)
            .clone()?;

        if image.content != cosmic_text::SwashContent::Mask {
            return None;
        }

        // Swash placement has `top` positive up; our space is y down.
        Some(GlyphImage {
            size: [image.placement.width, image.placement.height],
            bearing: [image.placement.left, -image.placement.top],
            pixels: image.data,
        })
    }
}

impl Default for Typesetter {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphMetrics for Typesetter {
    fn advance_width(&mut self, ch: char, font_px: f32) -> Option<f32> {
        let px = font_px.round().max(1.0) as u16;
        self.shaped(ch, px).map(|s| s.advance)
    }
}
