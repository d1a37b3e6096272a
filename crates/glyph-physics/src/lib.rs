//! # Glyph Physics
//!
//! Per-glyph particle model and the state machine that animates it:
//! spring pulls, velocity damping, explosion impulses and the timed
//! fade back to rest.

pub mod constants;
pub mod engine;
pub mod params;
pub mod particle;

pub use engine::{explosion_progress, tick};
pub use params::{AlphaCurve, EffectParams};
pub use particle::{GlyphParticle, ParticleState};
