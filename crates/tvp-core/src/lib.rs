//! Types, layout and shared structures for tvp.
//!
//! This crate contains the frame model, the nearest-neighbor sampler, the
//! layout engine and configuration logic used across the tvp workspace.

pub mod charset;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod layout;
pub mod sample;
pub mod traits;

pub use config::{PlayerConfig, RenderMode};
pub use error::CoreError;
pub use frame::{RawFrame, Rgb};
pub use layout::{FrameLayout, TerminalGeometry, VideoGeometry};
