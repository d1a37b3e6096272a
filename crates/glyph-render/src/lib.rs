//! # Glyph Render
//!
//! Turns particle state into backend-agnostic glyph draw commands.
//! The GPU backend in the binary implements [`GlyphCanvas`]; tests use
//! a recording canvas.

pub mod canvas;
pub mod renderer;

pub use canvas::{GlyphCanvas, GlyphQuad, Rgba};
pub use renderer::GlyphRenderer;
