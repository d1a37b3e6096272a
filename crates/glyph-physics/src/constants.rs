//! Tuning constants for the text-particle effect.
//!
//! These are the reference values the effect was designed around; all of
//! them are runtime-tunable through [`EffectParams`](crate::EffectParams).

/// Row height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.5;

/// Fraction of the source-string width each row bleeds past the left and
/// right surface edges, so the tiling has no visible seam at the borders.
pub const EDGE_BLEED_FACTOR: f32 = 0.1;

/// Advance width assumed for a glyph the metrics source cannot measure,
/// as a fraction of the font size.
pub const FALLBACK_ADVANCE_FACTOR: f32 = 0.6;

/// Spring coefficient pulling a charging glyph toward the charge point.
pub const CHARGE_SPRING: f32 = 0.04;

/// Weak spring pulling an exploding glyph back toward its origin,
/// giving the explosion its elastic bounce.
pub const PULLBACK_SPRING: f32 = 0.005;

/// Multiplicative velocity decay applied every tick in any moving state.
/// Must stay strictly inside (0, 1) so velocities converge.
pub const DAMPING: f32 = 0.92;

/// Base magnitude of the outward explosion impulse.
pub const EXPLOSION_FORCE: f32 = 7.0;

/// Radius around the charge point within which idle glyphs react.
pub const INTERACTION_RADIUS: f32 = 100.0;

/// Explosion duration (4 seconds at 60 fps).
pub const EXPLOSION_FRAMES: u32 = 4 * 60;

/// Recovery fade-in duration (3 seconds at 60 fps).
pub const RECOVERY_FRAMES: u32 = 3 * 60;

/// Randomized hold before recovery starts, used by the flicker preset.
pub const RECOVERY_DELAY_FRAMES: std::ops::RangeInclusive<u32> = 15..=90;

/// Uniform random velocity added per axis on explosion.
pub const IMPULSE_JITTER: f32 = 1.5;

/// Maximum magnitude of the random spin assigned on explosion
/// (radians per frame, uniform in `±ROTATION_SPEED_MAX`).
pub const ROTATION_SPEED_MAX: f32 = 0.075;

/// Per-frame random draw offset while exploding, in pixels per axis.
pub const SCATTER_JITTER: f32 = 0.75;

/// Size pulse floor during explosion, as a fraction of the font size.
pub const SIZE_PULSE_MIN: f32 = 0.7;

/// Size pulse amplitude on top of [`SIZE_PULSE_MIN`].
pub const SIZE_PULSE_AMPLITUDE: f32 = 0.5;

/// Angular rate of the flicker preset's alpha sinusoid, in multiples of
/// pi over the explosion duration. Higher than the size pulse so the
/// flicker reads as a separate rhythm.
pub const FLICKER_CYCLES: f32 = 6.0;

/// Default font size in pixels.
pub const FONT_SIZE: f32 = 24.0;

/// Default source string tiled across the surface.
pub const SOURCE_TEXT: &str = "xiaohongshu";
