//! Interactive effect session: pointer handling plus the frame tick.

use glam::Vec2;
use glyph_physics::{tick, EffectParams, GlyphParticle, ParticleState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::field::{build_field, GlyphMetrics};

/// One running instance of the effect over a fixed surface.
///
/// Pointer handlers perform the state transitions that are driven by
/// input (press starts charging, release triggers the explosion);
/// everything timed happens in [`advance_frame`](Self::advance_frame).
pub struct EffectSession {
    particles: Vec<GlyphParticle>,
    params: EffectParams,
    bounds: Vec2,
    charge: Option<Vec2>,
    rng: StdRng,
}

impl EffectSession {
    /// Build the glyph field and start an idle session.
    pub fn new(
        text: &str,
        bounds: Vec2,
        params: EffectParams,
        metrics: &mut impl GlyphMetrics,
    ) -> Self {
        Self::with_rng(text, bounds, params, metrics, StdRng::from_os_rng)
    }

    /// Deterministic session for tests and replays.
    pub fn with_seed(
        text: &str,
        bounds: Vec2,
        params: EffectParams,
        metrics: &mut impl GlyphMetrics,
        seed: u64,
    ) -> Self {
        Self::with_rng(text, bounds, params, metrics, || StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        text: &str,
        bounds: Vec2,
        params: EffectParams,
        metrics: &mut impl GlyphMetrics,
        rng: impl FnOnce() -> StdRng,
    ) -> Self {
        let particles = build_field(text, bounds, params.font_px, metrics);
        log::info!(
            "✓ effect session ready: {} glyphs on a {}x{} surface",
            particles.len(),
            bounds.x,
            bounds.y
        );
        Self {
            particles,
            params,
            bounds,
            charge: None,
            rng: rng(),
        }
    }

    pub fn particles(&self) -> &[GlyphParticle] {
        &self.particles
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    /// Active charge point, if a press is in progress.
    pub fn charge_point(&self) -> Option<Vec2> {
        self.charge
    }

    /// Press at `point`: set the charge point and pull in every idle
    /// glyph whose rest center lies within the interaction radius.
    ///
    /// Glyphs in any other state ignore the press; a mid-explosion press
    /// only recruits whatever is idle around it.
    pub fn pointer_down(&mut self, point: Vec2) {
        let Some(point) = self.sanitize(point) else {
            return;
        };
        self.charge = Some(point);

        let radius = self.params.interaction_radius;
        let font_px = self.params.font_px;
        let mut recruited = 0usize;
        for p in &mut self.particles {
            if p.state == ParticleState::Idle
                && p.origin_center(font_px).distance(point) < radius
            {
                p.begin_charge();
                recruited += 1;
            }
        }
        log::debug!("pointer down at {point}: {recruited} glyphs charging");
    }

    /// Pointer drag. Only moves the charge point when the preset opts
    /// into pointer-following; otherwise the press location stays the
    /// anchor for the whole hold.
    pub fn pointer_move(&mut self, point: Vec2) {
        if self.charge.is_none() || !self.params.charge_follows_pointer {
            return;
        }
        if let Some(point) = self.sanitize(point) {
            self.charge = Some(point);
        }
    }

    /// Release: every charging glyph explodes away from the charge
    /// point and the charge point is cleared. A release without a press
    /// is a no-op, so no glyph can stay stuck in `Charging`.
    pub fn pointer_up(&mut self) {
        let Some(charge) = self.charge.take() else {
            return;
        };

        let params = self.params.clone();
        let rng = &mut self.rng;
        let mut jitter = |magnitude: f32| (rng.random::<f32>() - 0.5) * 2.0 * magnitude;
        let mut released = 0usize;
        for p in &mut self.particles {
            if p.state != ParticleState::Charging {
                continue;
            }

            // Outward direction from the charge point through the
            // glyph's current (pulled-in) position. A glyph sitting
            // exactly on the charge point gets the zero-angle direction.
            let delta = p.pos - charge;
            let dist = match delta.length() {
                d if d == 0.0 => 1.0,
                d => d,
            };
            let angle = delta.y.atan2(delta.x);
            // Glyphs pulled in close fly harder than ones at the rim;
            // anything that ended up past the rim gets no base force.
            let force =
                ((1.0 - dist / params.interaction_radius) * params.explosion_force).max(0.0);

            let impulse = Vec2::from_angle(angle) * force
                + Vec2::new(jitter(params.impulse_jitter), jitter(params.impulse_jitter));
            let rotation_speed = jitter(params.rotation_speed_max);
            p.explode(impulse, rotation_speed, params.explosion_frames);
            released += 1;
        }
        log::debug!("pointer up: {released} glyphs exploding");
    }

    /// Advance every particle by one frame.
    pub fn advance_frame(&mut self) {
        let params = self.params.clone();
        let charge = self.charge;
        for p in &mut self.particles {
            tick(p, charge, &params, &mut self.rng);
        }
    }

    /// Reject non-finite coordinates and clamp finite ones to twice the
    /// surface bounds, so a wild input event cannot fling the springs.
    fn sanitize(&self, point: Vec2) -> Option<Vec2> {
        if !point.is_finite() {
            log::warn!("ignoring non-finite pointer position");
            return None;
        }
        Some(point.clamp(-self.bounds, self.bounds * 2.0))
    }
}
