//! The drawing seam between the effect and its backend.

use glam::Vec2;

/// Straight (non-premultiplied) color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with its alpha scaled by `factor`.
    pub fn faded(self, factor: f32) -> Self {
        Self {
            a: self.a * factor.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One glyph to draw, centered and rotated.
///
/// `center` is the pivot both for rotation and for placement; `font_px`
/// is the size to rasterize at, which during the explosion pulse
/// differs from the layout size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub ch: char,
    pub center: Vec2,
    pub font_px: f32,
    pub rotation: f32,
    pub color: Rgba,
    pub advance_width: f32,
}

/// Backend surface the renderer draws into, once per frame.
pub trait GlyphCanvas {
    /// Start a fresh frame.
    fn clear(&mut self);

    /// Queue one glyph for this frame.
    fn draw_glyph(&mut self, quad: GlyphQuad);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faded_scales_alpha_only() {
        let c = Rgba::new(0.1, 0.2, 0.3, 0.8);
        let f = c.faded(0.5);
        assert_eq!(f.to_array(), [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_faded_clamps_factor() {
        let c = Rgba::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(c.faded(2.0).a, 1.0);
        assert_eq!(c.faded(-1.0).a, 0.0);
    }
}
