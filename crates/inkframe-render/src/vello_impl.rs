//! Vello-backed drawing surface.
//!
//! Drawing calls are encoded into a [`vello::Scene`] that the host submits to
//! its GPU renderer. The scene only speaks `vello::kurbo` / `vello::peniko`,
//! so geometry and colors are converted at the boundary.

use crate::renderer::{RenderContext, Renderer, RenderResult, RendererError};
use inkframe_core::surface::StateStack;
use inkframe_core::{Canvas, Surface};
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape as KurboShape};
use peniko::Color;
use vello::Scene;
use vello::kurbo as vk;
use vello::peniko as vp;

/// Tolerance used when converting rectangles to paths.
const PATH_TOLERANCE: f64 = 0.1;

fn to_vello_point(p: Point) -> vk::Point {
    vk::Point::new(p.x, p.y)
}

fn to_vello_affine(affine: Affine) -> vk::Affine {
    vk::Affine::new(affine.as_coeffs())
}

fn to_vello_color(color: Color) -> vp::Color {
    let rgba = color.to_rgba8();
    vp::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn to_vello_path(path: &BezPath) -> vk::BezPath {
    let mut out = vk::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(to_vello_point(p)),
            PathEl::LineTo(p) => out.line_to(to_vello_point(p)),
            PathEl::QuadTo(c, p) => out.quad_to(to_vello_point(c), to_vello_point(p)),
            PathEl::CurveTo(c1, c2, p) => {
                out.curve_to(to_vello_point(c1), to_vello_point(c2), to_vello_point(p))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Surface that encodes drawing into a vello scene.
pub struct VelloSurface {
    /// The Vello scene being built.
    scene: Scene,
    state: StateStack,
    /// Device transform applied under every canvas transform.
    base: Affine,
    background: Color,
    width: f64,
    height: f64,
    /// Restores issued with nothing saved since the last frame began.
    unmatched_restores: usize,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl VelloSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scene: Scene::new(),
            state: StateStack::default(),
            base: Affine::IDENTITY,
            background: Color::WHITE,
            width,
            height,
            unmatched_restores: 0,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn transform(&self) -> vk::Affine {
        to_vello_affine(self.base * self.state.current().transform)
    }

    fn fill_local(&mut self, path: &BezPath, color: Color) {
        let transform = self.transform();
        self.scene.fill(
            vp::Fill::NonZero,
            transform,
            to_vello_color(color),
            None,
            &to_vello_path(path),
        );
    }

    fn stroke_local(&mut self, path: &BezPath) {
        let state = *self.state.current();
        if state.line_width <= 0.0 {
            return;
        }
        let transform = self.transform();
        self.scene.stroke(
            &vk::Stroke::new(state.line_width),
            transform,
            to_vello_color(state.effective_stroke()),
            None,
            &to_vello_path(path),
        );
    }

    fn paint_background(&mut self, region: Rect, transform: vk::Affine) {
        let rect = vk::Rect::new(region.x0, region.y0, region.x1, region.y1);
        self.scene.fill(
            vp::Fill::NonZero,
            transform,
            to_vello_color(self.background),
            None,
            &rect,
        );
    }
}

impl Surface for VelloSurface {
    fn clear(&mut self, region: Rect) {
        let covers_viewport = region.x0 <= 0.0
            && region.y0 <= 0.0
            && region.x1 >= self.width
            && region.y1 >= self.height;
        if covers_viewport {
            self.scene.reset();
        }
        let base = to_vello_affine(self.base);
        self.paint_background(region, base);
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        if self.state.depth() == 0 {
            log::warn!("restore without matching save");
            self.unmatched_restores += 1;
        }
        self.state.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.scale(sx, sy);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.set_global_alpha(alpha);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.set_fill_color(color);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.set_stroke_color(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.set_line_width(width);
    }

    fn fill_rect(&mut self, rect: Rect) {
        let color = self.state.current().effective_fill();
        self.fill_local(&rect.to_path(PATH_TOLERANCE), color);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.stroke_local(&rect.to_path(PATH_TOLERANCE));
    }

    fn clear_rect(&mut self, rect: Rect) {
        // Scenes are layered, so erasing means painting the background over
        let transform = self.transform();
        self.paint_background(rect, transform);
    }

    fn begin_path(&mut self) {
        self.state.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.state.move_to(p);
    }

    fn line_to(&mut self, p: Point) {
        self.state.line_to(p);
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.state.bezier_curve_to(c1, c2, p);
    }

    fn close_path(&mut self) {
        self.state.close_path();
    }

    fn fill(&mut self) {
        let path = self.state.path().clone();
        let color = self.state.current().effective_fill();
        self.fill_local(&path, color);
    }

    fn stroke(&mut self) {
        let path = self.state.path().clone();
        self.stroke_local(&path);
    }
}

impl Renderer for VelloSurface {
    fn build_scene(&mut self, canvas: &mut Canvas, ctx: &RenderContext) -> RenderResult<()> {
        if !ctx.scale_factor.is_finite() || ctx.scale_factor <= 0.0 {
            return Err(RendererError::InvalidTransform(format!(
                "scale factor {}",
                ctx.scale_factor
            )));
        }
        self.base = Affine::scale(ctx.scale_factor);
        self.background = self.background_color(ctx);
        self.state = StateStack::default();
        self.unmatched_restores = 0;
        self.width = canvas.options().width as f64;
        self.height = canvas.options().height as f64;

        canvas.render_all(self);
        log::trace!("encoded canvas frame with {} objects", canvas.len());

        if self.unmatched_restores > 0 {
            return Err(RendererError::UnbalancedRestore(self.unmatched_restores));
        }
        match self.state.depth() {
            0 => Ok(()),
            depth => Err(RendererError::UnbalancedSave(depth)),
        }
    }
}
