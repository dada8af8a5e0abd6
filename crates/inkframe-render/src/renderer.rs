//! Renderer trait abstraction.

use inkframe_core::Canvas;
use peniko::Color;
use thiserror::Error;

/// Errors that can occur during rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RendererError {
    #[error("Invalid transform: {0}")]
    InvalidTransform(String),
    #[error("Unbalanced save/restore: {0} state(s) left on the stack")]
    UnbalancedSave(usize),
    #[error("Unbalanced save/restore: {0} restore(s) without a matching save")]
    UnbalancedRestore(usize),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Per-frame rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Device pixels per canvas unit.
    pub scale_factor: f64,
    /// Color the canvas is cleared to.
    pub background: Color,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            background: Color::WHITE,
        }
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scale factor (for HiDPI).
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

/// Something that can turn a canvas into a presentable frame.
pub trait Renderer {
    /// Build the frame for the canvas's current state.
    fn build_scene(&mut self, canvas: &mut Canvas, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background
    }
}
