//! Effect parameters for runtime tuning.
//!
//! The two historical variants of the effect are expressed as named
//! presets over one parametric state machine, not as separate designs:
//! [`EffectParams::classic`] (linear fade, immediate recovery) and
//! [`EffectParams::flicker`] (sinusoid alpha flicker plus a randomized
//! hold before recovery).

use std::ops::RangeInclusive;

use crate::constants::*;

/// Alpha curve applied while a glyph is exploding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaCurve {
    /// Straight fade from 1 to 0 over the explosion duration.
    LinearFade,
    /// Fade modulated by a faster sinusoid, reading as a flicker.
    Flicker,
}

/// All tunable coefficients of the effect.
///
/// Every spring/damping constant here is a free coefficient; nothing is
/// derived. `damping` must stay strictly inside (0, 1) so velocity decay
/// is geometric and every motion-bearing state converges.
#[derive(Debug, Clone)]
pub struct EffectParams {
    /// Font size in pixels; also the glyph cell height.
    pub font_px: f32,
    /// Radius around the charge point within which idle glyphs react.
    pub interaction_radius: f32,
    /// Base magnitude of the outward explosion impulse.
    pub explosion_force: f32,
    /// Spring coefficient toward the charge point while charging.
    pub charge_spring: f32,
    /// Weak spring back toward origin while exploding.
    pub pullback_spring: f32,
    /// Multiplicative per-tick velocity decay, in (0, 1).
    pub damping: f32,
    /// Explosion duration in frames.
    pub explosion_frames: u32,
    /// Recovery fade-in duration in frames.
    pub recovery_frames: u32,
    /// Randomized hold before recovery, drawn uniformly per particle.
    /// `None` skips the `WaitingToRecover` stage entirely.
    pub recovery_delay_frames: Option<RangeInclusive<u32>>,
    /// Alpha curve used while exploding.
    pub alpha_curve: AlphaCurve,
    /// Whether the charge point tracks the pointer while held down.
    /// When false it stays frozen at the press location.
    pub charge_follows_pointer: bool,
    /// Uniform random velocity added per axis on explosion.
    pub impulse_jitter: f32,
    /// Maximum random spin on explosion, radians per frame.
    pub rotation_speed_max: f32,
    /// Per-frame random draw offset while exploding, pixels per axis.
    pub scatter_jitter: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self::classic()
    }
}

impl EffectParams {
    /// The reference behavior: linear explosion fade, recovery starts
    /// immediately after the explosion ends, charge point frozen at the
    /// press location.
    pub fn classic() -> Self {
        Self {
            font_px: FONT_SIZE,
            interaction_radius: INTERACTION_RADIUS,
            explosion_force: EXPLOSION_FORCE,
            charge_spring: CHARGE_SPRING,
            pullback_spring: PULLBACK_SPRING,
            damping: DAMPING,
            explosion_frames: EXPLOSION_FRAMES,
            recovery_frames: RECOVERY_FRAMES,
            recovery_delay_frames: None,
            alpha_curve: AlphaCurve::LinearFade,
            charge_follows_pointer: false,
            impulse_jitter: IMPULSE_JITTER,
            rotation_speed_max: ROTATION_SPEED_MAX,
            scatter_jitter: SCATTER_JITTER,
        }
    }

    /// Flickering variant: sinusoid alpha during the explosion and a
    /// randomized invisible hold before each glyph fades back in, so
    /// the field recovers in a staggered shimmer instead of one wave.
    pub fn flicker() -> Self {
        Self {
            recovery_delay_frames: Some(RECOVERY_DELAY_FRAMES),
            alpha_curve: AlphaCurve::Flicker,
            ..Self::classic()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_is_default() {
        let d = EffectParams::default();
        assert_eq!(d.alpha_curve, AlphaCurve::LinearFade);
        assert!(d.recovery_delay_frames.is_none());
        assert!(!d.charge_follows_pointer);
    }

    #[test]
    fn test_flicker_enables_delay_stage() {
        let f = EffectParams::flicker();
        assert_eq!(f.alpha_curve, AlphaCurve::Flicker);
        assert!(f.recovery_delay_frames.is_some());
        // Shared physics stays identical across presets.
        assert_eq!(f.damping, EffectParams::classic().damping);
    }

    #[test]
    fn test_damping_is_contractive() {
        for params in [EffectParams::classic(), EffectParams::flicker()] {
            assert!(params.damping > 0.0 && params.damping < 1.0);
        }
    }
}
