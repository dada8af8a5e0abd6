//! Drawing surface abstraction.
//!
//! The canvas controller only talks to a [`Surface`]: an immediate-mode 2D
//! context with a save/restore transform stack. Backends live elsewhere; this
//! module provides the shared state stack and [`CoverageSurface`], an
//! offscreen surface that answers per-pixel alpha queries.

use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Stroke, StrokeOpts};
use peniko::Color;

/// Tolerance used when flattening curves for coverage tests.
const COVERAGE_TOLERANCE: f64 = 0.1;

/// Immediate-mode 2D drawing context.
pub trait Surface {
    /// Clear a region to the surface background.
    fn clear(&mut self, region: Rect);

    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);
    /// Rotate the current transform, in radians.
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn set_global_alpha(&mut self, alpha: f64);
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);

    fn fill_rect(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);
    /// Erase a rectangle in the current transform.
    fn clear_rect(&mut self, rect: Rect);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
}

/// Surfaces whose rendered pixels can be read back.
pub trait PixelProbe {
    /// Alpha of every pixel in `region`, row-major.
    fn pixel_alpha(&self, region: Rect) -> Vec<u8>;
}

/// Graphics state saved and restored as a unit.
#[derive(Debug, Clone, Copy)]
pub struct DrawState {
    pub transform: Affine,
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f64,
    pub global_alpha: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            global_alpha: 1.0,
        }
    }
}

impl DrawState {
    /// Fill color with the global alpha applied.
    pub fn effective_fill(&self) -> Color {
        self.fill.multiply_alpha(self.global_alpha as f32)
    }

    /// Stroke color with the global alpha applied.
    pub fn effective_stroke(&self) -> Color {
        self.stroke.multiply_alpha(self.global_alpha as f32)
    }
}

/// Save/restore stack plus the path under construction.
///
/// Backends embed this and forward the state-only calls to it.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
    path: BezPath,
}

impl StateStack {
    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pop the last saved state; unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.transform *= Affine::translate((dx, dy));
    }

    pub fn rotate(&mut self, radians: f64) {
        self.current.transform *= Affine::rotate(radians);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current.transform *= Affine::scale_non_uniform(sx, sy);
    }

    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.current.global_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.current.fill = color;
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.current.stroke = color;
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.current.line_width = width;
    }

    pub fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    pub fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
    }

    /// Extend the path; starts a subpath when none is open.
    pub fn line_to(&mut self, p: Point) {
        if self.path.elements().is_empty() {
            self.path.move_to(p);
        } else {
            self.path.line_to(p);
        }
    }

    pub fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        if self.path.elements().is_empty() {
            self.path.move_to(c1);
        }
        self.path.curve_to(c1, c2, p);
    }

    pub fn close_path(&mut self) {
        if !self.path.elements().is_empty() {
            self.path.close_path();
        }
    }
}

/// One coverage operation in device space.
#[derive(Debug, Clone)]
struct CoverageOp {
    area: BezPath,
    alpha: f64,
    erase: bool,
}

/// Offscreen surface that tracks per-pixel alpha coverage.
///
/// Each fill or stroke is recorded as a device-space outline; pixel queries
/// sample the pixel center against the recorded outlines in paint order.
#[derive(Debug, Clone)]
pub struct CoverageSurface {
    width: u32,
    height: u32,
    state: StateStack,
    ops: Vec<CoverageOp>,
}

impl CoverageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: StateStack::default(),
            ops: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Change the surface size; recorded coverage is dropped.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.clear();
    }

    /// Whether nothing has been painted since the last clear.
    pub fn is_blank(&self) -> bool {
        self.ops.is_empty()
    }

    fn push(&mut self, local: BezPath, alpha: f64, erase: bool) {
        let area = self.state.current().transform * local;
        self.ops.push(CoverageOp { area, alpha, erase });
    }

    fn fill_path(&mut self, path: BezPath) {
        let alpha = self.state.current().effective_fill().components[3] as f64;
        if alpha > 0.0 {
            self.push(path, alpha, false);
        }
    }

    fn stroke_path(&mut self, path: &BezPath) {
        let state = *self.state.current();
        let alpha = state.effective_stroke().components[3] as f64;
        if alpha <= 0.0 || state.line_width <= 0.0 {
            return;
        }
        let outline = kurbo::stroke(
            path.iter(),
            &Stroke::new(state.line_width),
            &StrokeOpts::default(),
            COVERAGE_TOLERANCE,
        );
        self.push(outline, alpha, false);
    }

    fn alpha_at(&self, point: Point) -> u8 {
        let mut alpha = 0.0;
        for op in &self.ops {
            if !op.area.contains(point) {
                continue;
            }
            if op.erase {
                alpha = 0.0;
            } else {
                alpha = op.alpha + alpha * (1.0 - op.alpha);
            }
        }
        (alpha * 255.0).round() as u8
    }
}

impl Surface for CoverageSurface {
    fn clear(&mut self, region: Rect) {
        let full = Rect::new(0.0, 0.0, self.width as f64, self.height as f64);
        if region.contains_rect(full) {
            self.ops.clear();
        } else {
            self.ops.push(CoverageOp {
                area: region.to_path(COVERAGE_TOLERANCE),
                alpha: 0.0,
                erase: true,
            });
        }
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
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
        self.fill_path(rect.to_path(COVERAGE_TOLERANCE));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.stroke_path(&rect.to_path(COVERAGE_TOLERANCE));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.push(rect.to_path(COVERAGE_TOLERANCE), 0.0, true);
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
        self.fill_path(path);
    }

    fn stroke(&mut self) {
        let path = self.state.path().clone();
        self.stroke_path(&path);
    }
}

impl PixelProbe for CoverageSurface {
    fn pixel_alpha(&self, region: Rect) -> Vec<u8> {
        let region = region.abs();
        let x0 = region.x0.floor().max(0.0) as u32;
        let y0 = region.y0.floor().max(0.0) as u32;
        let x1 = (region.x1.ceil().max(0.0) as u32).min(self.width);
        let y1 = (region.y1.ceil().max(0.0) as u32).min(self.height);

        let mut alphas = Vec::with_capacity((x1.saturating_sub(x0) * y1.saturating_sub(y0)) as usize);
        for y in y0..y1 {
            for x in x0..x1 {
                alphas.push(self.alpha_at(Point::new(x as f64 + 0.5, y as f64 + 0.5)));
            }
        }
        alphas
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn full(surface: &CoverageSurface) -> Rect {
        Rect::new(0.0, 0.0, surface.width() as f64, surface.height() as f64)
    }

    #[test]
    fn test_fill_rect_under_transform() {
        let mut surface = CoverageSurface::new(32, 32);
        surface.save();
        surface.translate(10.0, 10.0);
        surface.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        surface.restore();

        assert_eq!(surface.pixel_alpha(Rect::new(11.0, 11.0, 12.0, 12.0)), vec![255]);
        assert_eq!(surface.pixel_alpha(Rect::new(2.0, 2.0, 3.0, 3.0)), vec![0]);
        assert_eq!(surface.pixel_alpha(Rect::new(10.0, 10.0, 14.0, 14.0)).len(), 16);
    }

    #[test]
    fn test_restore_pops_transform() {
        let mut surface = CoverageSurface::new(32, 32);
        surface.save();
        surface.translate(20.0, 0.0);
        surface.restore();
        surface.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(surface.pixel_alpha(Rect::new(0.0, 0.0, 1.0, 1.0)), vec![255]);
        assert_eq!(surface.pixel_alpha(Rect::new(20.0, 0.0, 21.0, 1.0)), vec![0]);
    }

    #[test]
    fn test_clear_rect_erases() {
        let mut surface = CoverageSurface::new(16, 16);
        surface.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0));
        surface.clear_rect(Rect::new(4.0, 4.0, 8.0, 8.0));
        assert_eq!(surface.pixel_alpha(Rect::new(5.0, 5.0, 6.0, 6.0)), vec![0]);
        assert_eq!(surface.pixel_alpha(Rect::new(1.0, 1.0, 2.0, 2.0)), vec![255]);

        let region = full(&surface);
        surface.clear(region);
        assert!(surface.is_blank());
    }

    #[test]
    fn test_stroke_covers_outline_only() {
        let mut surface = CoverageSurface::new(32, 32);
        surface.set_line_width(2.0);
        surface.stroke_rect(Rect::new(4.0, 4.0, 24.0, 24.0));
        assert_eq!(surface.pixel_alpha(Rect::new(4.0, 10.0, 5.0, 11.0)), vec![255]);
        assert_eq!(surface.pixel_alpha(Rect::new(14.0, 14.0, 15.0, 15.0)), vec![0]);
    }

    #[test]
    fn test_global_alpha_and_transparent_fill() {
        let mut surface = CoverageSurface::new(8, 8);
        surface.set_global_alpha(0.5);
        surface.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(surface.pixel_alpha(Rect::new(0.0, 0.0, 1.0, 1.0)), vec![128]);

        let mut surface = CoverageSurface::new(8, 8);
        surface.set_fill_color(Color::TRANSPARENT);
        surface.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
        assert!(surface.is_blank());
    }

    #[test]
    fn test_region_clamped_to_surface() {
        let surface = CoverageSurface::new(4, 4);
        assert_eq!(surface.pixel_alpha(Rect::new(-5.0, -5.0, 2.0, 2.0)).len(), 4);
        assert!(surface.pixel_alpha(Rect::new(10.0, 10.0, 12.0, 12.0)).is_empty());
    }

    #[test]
    fn test_path_fill() {
        let mut surface = CoverageSurface::new(16, 16);
        surface.begin_path();
        surface.move_to(Point::new(0.0, 0.0));
        surface.line_to(Point::new(16.0, 0.0));
        surface.line_to(Point::new(0.0, 16.0));
        surface.close_path();
        surface.fill();
        assert_eq!(surface.pixel_alpha(Rect::new(2.0, 2.0, 3.0, 3.0)), vec![255]);
        assert_eq!(surface.pixel_alpha(Rect::new(14.0, 14.0, 15.0, 15.0)), vec![0]);
    }
}
