//! inkframe Render Library
//!
//! Renderer abstraction and concrete drawing surfaces for inkframe.
//! The default implementation encodes into a Vello scene for GPU rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
