//! Tiling the source string into a field of glyph particles.

use std::collections::HashMap;

use glam::Vec2;
use glyph_physics::constants::{EDGE_BLEED_FACTOR, FALLBACK_ADVANCE_FACTOR, LINE_HEIGHT_FACTOR};
use glyph_physics::GlyphParticle;

/// Source of per-glyph advance widths.
///
/// Implemented by the text stack in the binary; tests use a fixed table.
/// Returning `None` falls back to a width proportional to the font size.
pub trait GlyphMetrics {
    fn advance_width(&mut self, ch: char, font_px: f32) -> Option<f32>;
}

/// Tile `text` across a `bounds`-sized surface and return the particles
/// at rest.
///
/// Rows are stacked at 1.5x the font size. Each row starts one bleed
/// width left of the surface and fills until the next glyph would cross
/// the right bleed edge, so the tiling has no seam at either border. The
/// glyph index runs cyclically through `text` and carries over between
/// rows.
pub fn build_field(
    text: &str,
    bounds: Vec2,
    font_px: f32,
    metrics: &mut impl GlyphMetrics,
) -> Vec<GlyphParticle> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || bounds.x <= 0.0 || bounds.y <= 0.0 {
        return Vec::new();
    }

    let fallback = font_px * FALLBACK_ADVANCE_FACTOR;
    let mut widths: HashMap<char, f32> = HashMap::new();
    for &ch in &chars {
        widths.entry(ch).or_insert_with(|| {
            match metrics.advance_width(ch, font_px) {
                Some(w) if w > 0.0 => w,
                _ => fallback,
            }
        });
    }

    let text_width: f32 = chars.iter().map(|ch| widths[ch]).sum();
    let bleed = text_width * EDGE_BLEED_FACTOR;
    let line_height = font_px * LINE_HEIGHT_FACTOR;
    let rows = (bounds.y / line_height).ceil() as u32;

    let mut particles = Vec::new();
    let mut index = 0usize;
    for row in 0..rows {
        let y = row as f32 * line_height;
        let mut x = -bleed;
        loop {
            let ch = chars[index % chars.len()];
            let width = widths[&ch];
            if x + width > bounds.x + bleed {
                break;
            }
            particles.push(GlyphParticle::at_rest(ch, Vec2::new(x, y), width));
            x += width;
            index += 1;
        }
    }

    log::debug!(
        "built glyph field: {} particles over {} rows ({}x{}, font {}px)",
        particles.len(),
        rows,
        bounds.x,
        bounds.y,
        font_px
    );
    particles
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Monospace-style metrics: every glyph is half the font size wide.
    struct FixedMetrics;

    impl GlyphMetrics for FixedMetrics {
        fn advance_width(&mut self, _ch: char, font_px: f32) -> Option<f32> {
            Some(font_px * 0.5)
        }
    }

    /// Metrics source that cannot measure anything.
    struct NoMetrics;

    impl GlyphMetrics for NoMetrics {
        fn advance_width(&mut self, _ch: char, _font_px: f32) -> Option<f32> {
            None
        }
    }

    #[test]
    fn test_row_count_covers_full_height() {
        // 800 / (24 * 1.5) = 22.2, so 23 rows including the partial one.
        let field = build_field("xiaohongshu", Vec2::new(600.0, 800.0), 24.0, &mut FixedMetrics);
        let line_height = 24.0 * 1.5;
        let rows: std::collections::HashSet<u32> = field
            .iter()
            .map(|p| (p.origin.y / line_height).round() as u32)
            .collect();
        assert_eq!(rows.len(), 23);
        assert!(field.iter().any(|p| p.origin.y >= 800.0 - line_height));
    }

    #[test]
    fn test_rows_start_inside_left_bleed() {
        let field = build_field("xiaohongshu", Vec2::new(600.0, 800.0), 24.0, &mut FixedMetrics);
        let text_width = 11.0 * 12.0;
        let bleed = text_width * 0.1;

        let first = &field[0];
        assert_eq!(first.origin.x, -bleed);
        for p in &field {
            assert!(p.origin.x >= -bleed);
            assert!(p.origin.x + p.advance_width <= 600.0 + bleed + 1e-3);
        }
    }

    #[test]
    fn test_glyph_index_is_cyclic_across_rows() {
        let text = "abc";
        let field = build_field(text, Vec2::new(100.0, 100.0), 24.0, &mut FixedMetrics);
        let source: Vec<char> = text.chars().collect();
        for (i, p) in field.iter().enumerate() {
            assert_eq!(p.ch, source[i % source.len()], "particle {i}");
        }
        // More than one row's worth, so the cycle really crosses rows.
        assert!(field.len() > source.len());
    }

    #[test]
    fn test_unmeasurable_glyphs_use_fallback_width() {
        let field = build_field("ab", Vec2::new(100.0, 30.0), 24.0, &mut NoMetrics);
        assert!(!field.is_empty());
        for p in &field {
            assert_eq!(p.advance_width, 24.0 * 0.6);
        }
    }

    #[test]
    fn test_empty_inputs_yield_empty_field() {
        assert!(build_field("", Vec2::new(600.0, 800.0), 24.0, &mut FixedMetrics).is_empty());
        assert!(build_field("x", Vec2::new(0.0, 800.0), 24.0, &mut FixedMetrics).is_empty());
        assert!(build_field("x", Vec2::new(600.0, 0.0), 24.0, &mut FixedMetrics).is_empty());
    }

    #[test]
    fn test_all_particles_start_at_rest() {
        let field = build_field("xiaohongshu", Vec2::new(600.0, 800.0), 24.0, &mut FixedMetrics);
        assert!(!field.is_empty());
        assert!(field.iter().all(|p| p.is_at_rest()));
    }
}
