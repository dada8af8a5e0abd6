//! Rectangle shape.

use super::{Entity, KindState, ObjectId, ObjectOptions, ShapeTrait};
use crate::surface::Surface;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bezier handle factor approximating a quarter ellipse.
const KAPPA: f64 = 0.552_284_749_8;

/// Options for a rectangle: common object options plus corner radii.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RectOptions {
    pub object: ObjectOptions,
    /// Horizontal corner radius.
    pub rx: f64,
    /// Vertical corner radius.
    pub ry: f64,
}

impl RectOptions {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            object: ObjectOptions::new(left, top, width, height),
            rx: 0.0,
            ry: 0.0,
        }
    }

    pub fn with_radius(mut self, rx: f64, ry: f64) -> Self {
        self.rx = rx;
        self.ry = ry;
        self
    }

    pub fn with_object(mut self, object: ObjectOptions) -> Self {
        self.object = object;
        self
    }
}

/// A rectangle with optional rounded corners.
#[derive(Debug, Clone)]
pub struct Rectangle {
    pub(crate) id: ObjectId,
    pub entity: Entity,
    pub rx: f64,
    pub ry: f64,
}

impl Rectangle {
    pub fn new(options: RectOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity: Entity::new(options.object),
            rx: options.rx,
            ry: options.ry,
        }
    }

    /// Create a rectangle spanning two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let center = p1.midpoint(p2);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();
        Self::new(RectOptions::new(center.x, center.y, width, height))
    }

    /// Draw the body in the local frame centered on the origin.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let e = &self.entity;
        let rx = self.rx.min(e.width / 2.0);
        let ry = self.ry.min(e.height / 2.0);
        let w = e.width;
        let h = e.height;
        let x = -w / 2.0;
        let y = -h / 2.0;

        surface.save();
        surface.scale(
            if e.flip_x() { -1.0 } else { 1.0 },
            if e.flip_y() { -1.0 } else { 1.0 },
        );

        surface.begin_path();
        surface.move_to(Point::new(x + rx, y));
        surface.line_to(Point::new(x + w - rx, y));
        if rx > 0.0 || ry > 0.0 {
            surface.bezier_curve_to(
                Point::new(x + w - rx + rx * KAPPA, y),
                Point::new(x + w, y + ry - ry * KAPPA),
                Point::new(x + w, y + ry),
            );
        }
        surface.line_to(Point::new(x + w, y + h - ry));
        if rx > 0.0 || ry > 0.0 {
            surface.bezier_curve_to(
                Point::new(x + w, y + h - ry + ry * KAPPA),
                Point::new(x + w - rx + rx * KAPPA, y + h),
                Point::new(x + w - rx, y + h),
            );
        }
        surface.line_to(Point::new(x + rx, y + h));
        if rx > 0.0 || ry > 0.0 {
            surface.bezier_curve_to(
                Point::new(x + rx - rx * KAPPA, y + h),
                Point::new(x, y + h - ry + ry * KAPPA),
                Point::new(x, y + h - ry),
            );
        }
        surface.line_to(Point::new(x, y + ry));
        if rx > 0.0 || ry > 0.0 {
            surface.bezier_curve_to(
                Point::new(x, y + ry - ry * KAPPA),
                Point::new(x + rx - rx * KAPPA, y),
                Point::new(x + rx, y),
            );
        }
        surface.close_path();

        if let Some(fill) = e.fill {
            surface.set_fill_color(fill.into());
            surface.fill();
        }
        if let Some(stroke) = e.stroke {
            surface.set_stroke_color(stroke.into());
            surface.set_line_width(e.stroke_width);
            surface.stroke();
        }
        surface.restore();
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind_state(&self) -> KindState {
        KindState::Rect {
            rx: self.rx,
            ry: self.ry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CoverageSurface;
    use crate::surface::PixelProbe;
    use kurbo::Rect;

    #[test]
    fn test_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 50.0), Point::new(0.0, 0.0));
        assert_eq!(rect.entity.left, 50.0);
        assert_eq!(rect.entity.top, 25.0);
        assert_eq!(rect.entity.width, 100.0);
        assert_eq!(rect.entity.height, 50.0);
    }

    #[test]
    fn test_state_change_detection() {
        let mut rect = Rectangle::new(RectOptions::new(10.0, 10.0, 20.0, 20.0));
        rect.save_state();
        assert!(!rect.has_state_changed());

        rect.entity.left += 5.0;
        assert!(rect.has_state_changed());

        // Reverting the attribute clears the change
        rect.entity.left -= 5.0;
        assert!(!rect.has_state_changed());

        rect.entity.left += 5.0;
        rect.save_state();
        assert!(!rect.has_state_changed());

        rect.rx = 4.0;
        assert!(rect.has_state_changed());
    }

    #[test]
    fn test_unsaved_state_counts_as_changed() {
        let rect = Rectangle::new(RectOptions::new(0.0, 0.0, 1.0, 1.0));
        assert!(rect.has_state_changed());
    }

    #[test]
    fn test_draw_fills_body() {
        let rect = Rectangle::new(RectOptions::new(20.0, 20.0, 20.0, 10.0).with_radius(2.0, 2.0));
        let mut surface = CoverageSurface::new(64, 64);
        surface.save();
        rect.entity.transform(&mut surface);
        rect.draw(&mut surface);
        surface.restore();

        assert!(surface.pixel_alpha(Rect::new(19.0, 19.0, 21.0, 21.0)).iter().all(|&a| a == 255));
        // Outside the body
        assert!(surface.pixel_alpha(Rect::new(35.0, 20.0, 36.0, 21.0)).iter().all(|&a| a == 0));
        // Rounded corner leaves the very corner pixel empty
        assert_eq!(surface.pixel_alpha(Rect::new(10.0, 15.0, 11.0, 16.0)), vec![0]);
    }

    #[test]
    fn test_draw_without_fill_is_transparent() {
        let mut options = RectOptions::new(20.0, 20.0, 20.0, 10.0);
        options.object.fill = None;
        let rect = Rectangle::new(options);
        let mut surface = CoverageSurface::new(64, 64);
        rect.entity.transform(&mut surface);
        rect.draw(&mut surface);
        assert!(surface.pixel_alpha(Rect::new(0.0, 0.0, 64.0, 64.0)).iter().all(|&a| a == 0));
    }
}
