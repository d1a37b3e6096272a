//! The glyph particle: one instance per character drawn on the surface.

use glam::Vec2;

/// Animation state of a single glyph.
///
/// The transition graph is a cycle driven by the engine tick and the
/// pointer handlers; no other transitions exist:
///
/// `Idle -> Charging -> Exploding -> (WaitingToRecover) -> Recovering -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleState {
    /// At rest on its origin, fully opaque.
    Idle,
    /// Spring-pulled toward the active charge point. Unbounded in time;
    /// resolved only by pointer-up.
    Charging,
    /// Flying outward with spin; `timer` frames remaining.
    Exploding,
    /// Invisible at origin, waiting out `recovery_delay_timer` frames
    /// before fading back in. Only entered by the flicker preset.
    WaitingToRecover,
    /// Held at origin while alpha ramps 0 to 1 over `timer` frames.
    Recovering,
}

/// Physical and visual state of one displayed character occurrence.
///
/// Created once by the field builder and never destroyed; only the
/// mutable fields cycle through states for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct GlyphParticle {
    /// Glyph drawn for this particle, cyclically assigned from the
    /// source string.
    pub ch: char,
    /// Rest position (top-left of the glyph cell). Immutable after
    /// field construction; the sole anchor the particle returns to.
    pub origin: Vec2,
    /// Current position (top-left of the glyph cell).
    pub pos: Vec2,
    /// Current velocity in pixels per frame.
    pub vel: Vec2,
    /// Accumulated explosion spin in radians.
    pub rotation: f32,
    /// Spin rate in radians per frame, assigned at explosion time.
    pub rotation_speed: f32,
    /// Opacity in [0, 1]. Doubles as the recovery progress proxy.
    pub alpha: f32,
    /// Current animation state.
    pub state: ParticleState,
    /// Frame countdown for the timed states (exploding, recovering).
    pub timer: u32,
    /// Secondary countdown, used only in `WaitingToRecover`.
    pub recovery_delay_timer: u32,
    /// Glyph advance width in pixels, measured once at field build time
    /// and used to center the glyph at draw time.
    pub advance_width: f32,
}

impl GlyphParticle {
    /// Create a particle at rest on `origin`.
    pub fn at_rest(ch: char, origin: Vec2, advance_width: f32) -> Self {
        Self {
            ch,
            origin,
            pos: origin,
            vel: Vec2::ZERO,
            rotation: 0.0,
            rotation_speed: 0.0,
            alpha: 1.0,
            state: ParticleState::Idle,
            timer: 0,
            recovery_delay_timer: 0,
            advance_width,
        }
    }

    /// Visual center of the glyph cell for a given font size.
    ///
    /// Interaction distances and draw-time rotation both pivot here.
    pub fn center(&self, font_px: f32) -> Vec2 {
        self.pos + Vec2::new(self.advance_width * 0.5, font_px * 0.5)
    }

    /// Center of the rest position (independent of current motion).
    pub fn origin_center(&self, font_px: f32) -> Vec2 {
        self.origin + Vec2::new(self.advance_width * 0.5, font_px * 0.5)
    }

    /// Whether the particle satisfies the idle invariant exactly.
    pub fn is_at_rest(&self) -> bool {
        self.pos == self.origin
            && self.vel == Vec2::ZERO
            && self.rotation == 0.0
            && self.alpha == 1.0
    }

    /// Restore the full idle rest state.
    pub fn snap_to_origin(&mut self) {
        self.pos = self.origin;
        self.vel = Vec2::ZERO;
        self.rotation = 0.0;
        self.rotation_speed = 0.0;
        self.alpha = 1.0;
    }

    /// Enter `Charging`. Velocity is cleared so the spring pull starts
    /// from rest.
    pub fn begin_charge(&mut self) {
        self.state = ParticleState::Charging;
        self.vel = Vec2::ZERO;
    }

    /// Enter `Exploding` with an outward impulse and a fresh timer.
    pub fn explode(&mut self, impulse: Vec2, rotation_speed: f32, duration: u32) {
        self.state = ParticleState::Exploding;
        self.timer = duration;
        self.rotation = 0.0;
        self.rotation_speed = rotation_speed;
        self.vel = impulse;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_rest_satisfies_idle_invariant() {
        let p = GlyphParticle::at_rest('x', Vec2::new(10.0, 20.0), 12.0);
        assert_eq!(p.state, ParticleState::Idle);
        assert!(p.is_at_rest());
    }

    #[test]
    fn test_snap_restores_rest_state() {
        let mut p = GlyphParticle::at_rest('x', Vec2::new(10.0, 20.0), 12.0);
        p.pos = Vec2::new(50.0, 50.0);
        p.vel = Vec2::new(1.0, -2.0);
        p.rotation = 0.3;
        p.alpha = 0.5;
        assert!(!p.is_at_rest());

        p.snap_to_origin();
        assert!(p.is_at_rest());
        assert_eq!(p.pos, p.origin);
    }

    #[test]
    fn test_center_offsets_by_half_cell() {
        let p = GlyphParticle::at_rest('x', Vec2::new(100.0, 200.0), 14.0);
        assert_eq!(p.center(24.0), Vec2::new(107.0, 212.0));
    }
}
