//! # Glyph Simulation
//!
//! Builds the tiled glyph field and drives it through an interactive
//! session: pointer handlers mutate state, [`EffectSession::advance_frame`]
//! ticks every particle once per frame.

pub mod field;
pub mod session;

pub use field::{build_field, GlyphMetrics};
pub use session::EffectSession;
