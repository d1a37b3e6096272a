//! Per-frame state machine advancement.
//!
//! [`tick`] moves one particle forward by exactly one frame. All state
//! transitions happen either here at the tick boundary or in the
//! pointer handlers of the session, never mid-tick.

use glam::Vec2;
use rand::Rng;

use crate::constants::FLICKER_CYCLES;
use crate::params::{AlphaCurve, EffectParams};
use crate::particle::{GlyphParticle, ParticleState};

/// Advance `p` by one frame.
///
/// `charge` is the active charge point, if a press is in progress; it is
/// only consulted in the `Charging` state. `rng` seeds the randomized
/// recovery delay when the flicker preset is active.
pub fn tick(
    p: &mut GlyphParticle,
    charge: Option<Vec2>,
    params: &EffectParams,
    rng: &mut impl Rng,
) {
    match p.state {
        ParticleState::Idle => {
            // An idle particle must sit exactly on its origin. Float
            // drift from a previous cycle is snapped away here.
            if !p.is_at_rest() {
                p.snap_to_origin();
            }
        }

        ParticleState::Charging => {
            // Spring pull toward the charge point, then damp and
            // integrate. Without a charge point only the damping runs
            // and the particle coasts to a stop.
            if let Some(c) = charge {
                p.vel += (c - p.pos) * params.charge_spring;
            }
            p.vel *= params.damping;
            p.pos += p.vel;
        }

        ParticleState::Exploding => {
            // Weak spring back toward origin gives the bounce.
            p.vel += (p.origin - p.pos) * params.pullback_spring;
            p.vel *= params.damping;
            p.pos += p.vel;
            p.rotation += p.rotation_speed;

            p.alpha = explosion_alpha(p.timer, params);

            p.timer = p.timer.saturating_sub(1);
            if p.timer == 0 {
                // Hard reset so recovery happens exactly at the origin.
                p.pos = p.origin;
                p.vel = Vec2::ZERO;
                p.rotation = 0.0;
                p.rotation_speed = 0.0;
                p.alpha = 0.0;

                match &params.recovery_delay_frames {
                    Some(range) => {
                        p.state = ParticleState::WaitingToRecover;
                        p.recovery_delay_timer = rng.random_range(range.clone()).max(1);
                    }
                    None => {
                        p.state = ParticleState::Recovering;
                        p.timer = params.recovery_frames;
                    }
                }
            }
        }

        ParticleState::WaitingToRecover => {
            // Invisible hold at origin.
            p.recovery_delay_timer = p.recovery_delay_timer.saturating_sub(1);
            if p.recovery_delay_timer == 0 {
                p.state = ParticleState::Recovering;
                p.timer = params.recovery_frames;
                p.alpha = 0.0;
            }
        }

        ParticleState::Recovering => {
            // In-place recovery: only alpha changes.
            let total = params.recovery_frames.max(1) as f32;
            p.alpha = (1.0 - p.timer as f32 / total).clamp(0.0, 1.0);

            p.timer = p.timer.saturating_sub(1);
            if p.timer == 0 {
                p.state = ParticleState::Idle;
                p.snap_to_origin();
            }
        }
    }
}

/// Fraction of the explosion already elapsed, in [0, 1].
///
/// Drives the draw-time size pulse; callers outside the `Exploding`
/// state get 0.
pub fn explosion_progress(p: &GlyphParticle, params: &EffectParams) -> f32 {
    if p.state != ParticleState::Exploding {
        return 0.0;
    }
    let total = params.explosion_frames.max(1) as f32;
    ((total - p.timer as f32) / total).clamp(0.0, 1.0)
}

fn explosion_alpha(timer: u32, params: &EffectParams) -> f32 {
    let total = params.explosion_frames.max(1) as f32;
    let remaining = (timer as f32 / total).clamp(0.0, 1.0);
    match params.alpha_curve {
        AlphaCurve::LinearFade => remaining,
        AlphaCurve::Flicker => {
            let progress = 1.0 - remaining;
            let wave = (progress * FLICKER_CYCLES * std::f32::consts::PI).sin().abs();
            (remaining * (0.5 + 0.5 * wave)).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn particle() -> GlyphParticle {
        GlyphParticle::at_rest('g', Vec2::new(100.0, 100.0), 13.0)
    }

    #[test]
    fn test_idle_self_corrects_drift() {
        let params = EffectParams::classic();
        let mut rng = rng();
        let mut p = particle();
        p.pos += Vec2::new(0.25, -0.5);
        p.vel = Vec2::new(0.01, 0.0);
        p.alpha = 0.9;

        tick(&mut p, None, &params, &mut rng);
        assert!(p.is_at_rest());

        // And it stays at rest over many idle ticks.
        for _ in 0..100 {
            tick(&mut p, None, &params, &mut rng);
        }
        assert_eq!(p.pos, p.origin);
        assert_eq!(p.vel, Vec2::ZERO);
    }

    #[test]
    fn test_charging_pulls_toward_charge_point() {
        let params = EffectParams::classic();
        let mut rng = rng();
        let mut p = particle();
        p.begin_charge();

        let charge = Vec2::new(150.0, 100.0);
        let before = (charge - p.pos).length();
        for _ in 0..30 {
            tick(&mut p, Some(charge), &params, &mut rng);
        }
        let after = (charge - p.pos).length();
        assert!(after < before, "expected pull toward charge point");
    }

    #[test]
    fn test_damping_gives_geometric_velocity_decay() {
        // With the pullback spring disabled, an exploding particle's
        // speed must satisfy |v_n| <= |v_0| * d^n exactly.
        let mut params = EffectParams::classic();
        params.pullback_spring = 0.0;
        params.explosion_frames = 10_000;
        let mut rng = rng();

        let mut p = particle();
        p.explode(Vec2::new(6.0, -3.5), 0.0, params.explosion_frames);
        let v0 = p.vel.length();

        for n in 1..=200u32 {
            tick(&mut p, None, &params, &mut rng);
            let bound = v0 * params.damping.powi(n as i32);
            assert!(
                p.vel.length() <= bound + 1e-4,
                "tick {n}: |v| = {} exceeds bound {}",
                p.vel.length(),
                bound
            );
        }
    }

    #[test]
    fn test_explosion_timer_decrements_by_one_and_transitions_at_zero() {
        let mut params = EffectParams::classic();
        params.explosion_frames = 5;
        let mut rng = rng();

        let mut p = particle();
        p.explode(Vec2::new(1.0, 0.0), 0.1, params.explosion_frames);

        for expected in (1..5u32).rev() {
            tick(&mut p, None, &params, &mut rng);
            assert_eq!(p.state, ParticleState::Exploding);
            assert_eq!(p.timer, expected, "timer must decrease by exactly 1");
        }

        // Fifth tick reaches zero and transitions, never earlier.
        tick(&mut p, None, &params, &mut rng);
        assert_eq!(p.state, ParticleState::Recovering);
        assert_eq!(p.pos, p.origin);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.rotation, 0.0);
        assert_eq!(p.alpha, 0.0);
    }

    #[test]
    fn test_explosion_enters_delay_stage_with_flicker_preset() {
        let mut params = EffectParams::flicker();
        params.explosion_frames = 3;
        let mut rng = rng();

        let mut p = particle();
        p.explode(Vec2::new(2.0, 2.0), 0.05, params.explosion_frames);
        for _ in 0..3 {
            tick(&mut p, None, &params, &mut rng);
        }
        assert_eq!(p.state, ParticleState::WaitingToRecover);
        assert!(p.recovery_delay_timer >= 1);
        assert_eq!(p.alpha, 0.0);

        // The delay holds the particle invisible at origin, then hands
        // off to recovery with a fresh timer.
        let delay = p.recovery_delay_timer;
        for _ in 0..delay {
            assert_eq!(p.pos, p.origin);
            tick(&mut p, None, &params, &mut rng);
        }
        assert_eq!(p.state, ParticleState::Recovering);
        assert_eq!(p.timer, params.recovery_frames);
    }

    #[test]
    fn test_recovery_ramps_alpha_and_ends_idle() {
        let mut params = EffectParams::classic();
        params.recovery_frames = 60;
        let mut rng = rng();

        let mut p = particle();
        p.state = ParticleState::Recovering;
        p.timer = params.recovery_frames;
        p.alpha = 0.0;

        let mut last = -1.0f32;
        while p.state == ParticleState::Recovering {
            tick(&mut p, None, &params, &mut rng);
            assert!(p.alpha >= last, "alpha must ramp monotonically");
            last = p.alpha;
        }
        assert_eq!(p.state, ParticleState::Idle);
        assert!(p.is_at_rest());
        assert_eq!(p.alpha, 1.0);
    }

    #[test]
    fn test_full_round_trip_restores_rest_state() {
        let mut params = EffectParams::flicker();
        params.explosion_frames = 20;
        params.recovery_frames = 15;
        let mut rng = rng();

        let mut p = particle();
        p.begin_charge();
        let charge = Vec2::new(120.0, 110.0);
        for _ in 0..10 {
            tick(&mut p, Some(charge), &params, &mut rng);
        }
        p.explode(Vec2::new(4.0, -4.0), 0.07, params.explosion_frames);

        // Explosion + worst-case delay + recovery, with margin.
        for _ in 0..(20 + 90 + 15 + 10) {
            tick(&mut p, None, &params, &mut rng);
        }
        assert_eq!(p.state, ParticleState::Idle);
        assert!(p.is_at_rest());
        assert_eq!(p.rotation, 0.0);
    }

    #[test]
    fn test_explosion_progress_spans_unit_interval() {
        let mut params = EffectParams::classic();
        params.explosion_frames = 8;
        let mut p = particle();
        p.explode(Vec2::X, 0.0, params.explosion_frames);
        assert_eq!(explosion_progress(&p, &params), 0.0);
        p.timer = 0;
        assert_eq!(explosion_progress(&p, &params), 1.0);
        p.state = ParticleState::Idle;
        assert_eq!(explosion_progress(&p, &params), 0.0);
    }
}
