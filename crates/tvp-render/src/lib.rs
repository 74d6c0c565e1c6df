//! Pixel-to-terminal encoders for tvp.
//!
//! Converts decoded RGB frames into luminance glyphs, half-blocks, Braille
//! cells or a sixel stream.

pub mod ascii;
mod base;
pub mod block;
pub mod braille;
mod renderer;
pub mod sixel;

pub use base::{COLOR_RESET, EncodedFrame, RenderBase};
pub use renderer::Renderer;
