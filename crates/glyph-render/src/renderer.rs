//! Per-state glyph appearance.

use glam::Vec2;
use glyph_physics::constants::{SIZE_PULSE_AMPLITUDE, SIZE_PULSE_MIN};
use glyph_physics::{explosion_progress, EffectParams, GlyphParticle, ParticleState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::{GlyphCanvas, GlyphQuad, Rgba};

/// Faint ink the field rests in.
pub const BASE_COLOR: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.08);

/// Accent used while a glyph is exploding (#005f99).
pub const HIGHLIGHT_COLOR: Rgba = Rgba::new(0.0, 0x5f as f32 / 255.0, 0x99 as f32 / 255.0, 1.0);

/// Maps particle state to draw commands.
///
/// Owns its own rng for the draw-only scatter jitter, so cosmetic
/// randomness never advances the simulation's stream.
pub struct GlyphRenderer {
    base: Rgba,
    highlight: Rgba,
    rng: StdRng,
}

impl Default for GlyphRenderer {
    fn default() -> Self {
        Self::new(BASE_COLOR, HIGHLIGHT_COLOR)
    }
}

impl GlyphRenderer {
    pub fn new(base: Rgba, highlight: Rgba) -> Self {
        Self {
            base,
            highlight,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic scatter for tests and replays.
    pub fn with_seed(base: Rgba, highlight: Rgba, seed: u64) -> Self {
        Self {
            base,
            highlight,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Emit one frame of draw commands.
    pub fn draw(
        &mut self,
        particles: &[GlyphParticle],
        params: &EffectParams,
        canvas: &mut impl GlyphCanvas,
    ) {
        canvas.clear();
        for p in particles {
            if let Some(quad) = self.appearance(p, params) {
                canvas.draw_glyph(quad);
            }
        }
    }

    /// Appearance of one particle, or `None` when it is invisible.
    fn appearance(&mut self, p: &GlyphParticle, params: &EffectParams) -> Option<GlyphQuad> {
        let font_px = params.font_px;
        match p.state {
            ParticleState::Idle => Some(GlyphQuad {
                ch: p.ch,
                center: p.origin_center(font_px),
                font_px,
                rotation: 0.0,
                color: self.base,
                advance_width: p.advance_width,
            }),

            // Pulled out of place but otherwise looking normal.
            ParticleState::Charging => Some(GlyphQuad {
                ch: p.ch,
                center: p.center(font_px),
                font_px,
                rotation: 0.0,
                color: self.base,
                advance_width: p.advance_width,
            }),

            ParticleState::Exploding => {
                if p.alpha <= 0.0 {
                    return None;
                }
                let progress = explosion_progress(p, params);
                let pulse = SIZE_PULSE_MIN
                    + (progress * std::f32::consts::TAU).sin().abs() * SIZE_PULSE_AMPLITUDE;
                let scatter = Vec2::new(
                    self.jitter(params.scatter_jitter),
                    self.jitter(params.scatter_jitter),
                );
                Some(GlyphQuad {
                    ch: p.ch,
                    // The pivot keeps the layout size so the pulse
                    // scales the glyph about a stable point.
                    center: p.center(font_px) + scatter,
                    font_px: font_px * pulse,
                    rotation: p.rotation,
                    color: self.highlight.faded(p.alpha),
                    advance_width: p.advance_width,
                })
            }

            ParticleState::WaitingToRecover => None,

            ParticleState::Recovering => {
                if p.alpha <= 0.0 {
                    return None;
                }
                Some(GlyphQuad {
                    ch: p.ch,
                    center: p.origin_center(font_px),
                    font_px,
                    rotation: 0.0,
                    color: self.base.faded(p.alpha),
                    advance_width: p.advance_width,
                })
            }
        }
    }

    fn jitter(&mut self, magnitude: f32) -> f32 {
        (self.rng.random::<f32>() - 0.5) * 2.0 * magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canvas that records every command it receives.
    #[derive(Default)]
    struct RecordingCanvas {
        clears: usize,
        quads: Vec<GlyphQuad>,
    }

    impl GlyphCanvas for RecordingCanvas {
        fn clear(&mut self) {
            self.clears += 1;
            self.quads.clear();
        }

        fn draw_glyph(&mut self, quad: GlyphQuad) {
            self.quads.push(quad);
        }
    }

    fn renderer() -> GlyphRenderer {
        GlyphRenderer::with_seed(BASE_COLOR, HIGHLIGHT_COLOR, 9)
    }

    fn particle(state: ParticleState) -> GlyphParticle {
        let mut p = GlyphParticle::at_rest('x', glam::Vec2::new(100.0, 100.0), 12.0);
        p.state = state;
        p
    }

    #[test]
    fn test_idle_glyph_draws_at_origin_in_base_color() {
        let params = EffectParams::classic();
        let mut canvas = RecordingCanvas::default();
        let p = particle(ParticleState::Idle);

        renderer().draw(&[p.clone()], &params, &mut canvas);
        assert_eq!(canvas.clears, 1);
        assert_eq!(canvas.quads.len(), 1);
        let q = &canvas.quads[0];
        assert_eq!(q.center, p.origin_center(params.font_px));
        assert_eq!(q.font_px, params.font_px);
        assert_eq!(q.rotation, 0.0);
        assert_eq!(q.color, BASE_COLOR);
    }

    #[test]
    fn test_exploding_glyph_uses_highlight_rotation_and_pulse() {
        let params = EffectParams::classic();
        let mut canvas = RecordingCanvas::default();
        let mut p = particle(ParticleState::Exploding);
        p.timer = params.explosion_frames / 2;
        p.rotation = 0.4;
        p.alpha = 0.5;

        renderer().draw(&[p], &params, &mut canvas);
        let q = &canvas.quads[0];
        assert_eq!(q.rotation, 0.4);
        assert_eq!(q.color.to_array()[..3], HIGHLIGHT_COLOR.to_array()[..3]);
        assert!((q.color.a - 0.5).abs() < 1e-6);
        // Pulse stays within [0.7, 1.2] of the layout size.
        assert!(q.font_px >= params.font_px * 0.7 - 1e-3);
        assert!(q.font_px <= params.font_px * 1.2 + 1e-3);
    }

    #[test]
    fn test_scatter_jitter_stays_within_bounds() {
        let params = EffectParams::classic();
        let mut r = renderer();
        let mut canvas = RecordingCanvas::default();
        let mut p = particle(ParticleState::Exploding);
        p.timer = params.explosion_frames;
        p.alpha = 1.0;

        let center = p.center(params.font_px);
        for _ in 0..100 {
            r.draw(&[p.clone()], &params, &mut canvas);
            let offset = canvas.quads[0].center - center;
            assert!(offset.x.abs() <= params.scatter_jitter);
            assert!(offset.y.abs() <= params.scatter_jitter);
        }
    }

    #[test]
    fn test_invisible_glyphs_are_skipped() {
        let params = EffectParams::classic();
        let mut canvas = RecordingCanvas::default();

        let mut faded = particle(ParticleState::Exploding);
        faded.alpha = 0.0;
        let waiting = particle(ParticleState::WaitingToRecover);
        let mut recovering = particle(ParticleState::Recovering);
        recovering.alpha = 0.0;

        renderer().draw(&[faded, waiting, recovering], &params, &mut canvas);
        assert!(canvas.quads.is_empty());
    }

    #[test]
    fn test_recovering_glyph_fades_base_color_at_origin() {
        let params = EffectParams::classic();
        let mut canvas = RecordingCanvas::default();
        let mut p = particle(ParticleState::Recovering);
        p.pos = glam::Vec2::new(500.0, 500.0);
        p.alpha = 0.25;

        renderer().draw(&[p.clone()], &params, &mut canvas);
        let q = &canvas.quads[0];
        // Recovery happens at the origin regardless of stale position.
        assert_eq!(q.center, p.origin_center(params.font_px));
        assert!((q.color.a - BASE_COLOR.a * 0.25).abs() < 1e-6);
    }
}
