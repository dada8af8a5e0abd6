//! Common state shared by every scene object: position, size, scale, rotation,
//! origin, control decoration and the cached handle coordinates.

use super::{ObjectId, SerializableColor};
use crate::geometry::{self, Segment};
use crate::selection::HandleKind;
use crate::surface::Surface;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Horizontal anchor used to interpret `left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OriginX {
    Left,
    #[default]
    Center,
    Right,
}

impl OriginX {
    /// The opposite side; center stays center.
    pub fn opposite(self) -> Self {
        match self {
            OriginX::Left => OriginX::Right,
            OriginX::Center => OriginX::Center,
            OriginX::Right => OriginX::Left,
        }
    }

    /// Offset of this anchor from the center, in multiples of the width.
    fn factor(self) -> f64 {
        match self {
            OriginX::Left => -0.5,
            OriginX::Center => 0.0,
            OriginX::Right => 0.5,
        }
    }
}

/// Vertical anchor used to interpret `top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OriginY {
    Top,
    #[default]
    Center,
    Bottom,
}

impl OriginY {
    /// The opposite side; center stays center.
    pub fn opposite(self) -> Self {
        match self {
            OriginY::Top => OriginY::Bottom,
            OriginY::Center => OriginY::Center,
            OriginY::Bottom => OriginY::Top,
        }
    }

    fn factor(self) -> f64 {
        match self {
            OriginY::Top => -0.5,
            OriginY::Center => 0.0,
            OriginY::Bottom => 0.5,
        }
    }
}

/// Appearance and behaviour of the selection decoration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlStyle {
    /// Gap between the object and its border, in canvas pixels.
    pub padding: f64,
    pub border_width: f64,
    pub border_color: SerializableColor,
    /// Side length of a handle square, in canvas pixels.
    pub corner_size: f64,
    pub corner_color: SerializableColor,
    /// Draw handles as outlines instead of filled squares.
    pub transparent_corners: bool,
    /// Distance between the top-middle handle and the rotation handle.
    pub rotating_point_offset: f64,
    pub has_controls: bool,
    pub has_rotating_point: bool,
}

impl Default for ControlStyle {
    fn default() -> Self {
        Self {
            padding: 1.0,
            border_width: 1.0,
            border_color: SerializableColor::new(255, 0, 0, 255),
            corner_size: 6.0,
            corner_color: SerializableColor::new(255, 0, 0, 255),
            transparent_corners: false,
            rotating_point_offset: 10.0,
            has_controls: true,
            has_rotating_point: true,
        }
    }
}

/// Construction options for an [`Entity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectOptions {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees.
    pub angle: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
    pub visible: bool,
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    pub controls: ControlStyle,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            flip_x: false,
            flip_y: false,
            origin_x: OriginX::default(),
            origin_y: OriginY::default(),
            visible: true,
            fill: Some(SerializableColor::black()),
            stroke: None,
            stroke_width: 1.0,
            controls: ControlStyle::default(),
        }
    }
}

impl ObjectOptions {
    /// Options for an object at `(left, top)` with the given raw size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn with_origin(mut self, origin_x: OriginX, origin_y: OriginY) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    pub fn with_fill(mut self, fill: Option<SerializableColor>) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_stroke(mut self, stroke: Option<SerializableColor>, width: f64) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    pub fn with_controls(mut self, controls: ControlStyle) -> Self {
        self.controls = controls;
        self
    }
}

/// A quadrilateral given clockwise from its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub tl: Point,
    pub tr: Point,
    pub br: Point,
    pub bl: Point,
}

impl Quad {
    /// Corner points in clockwise order.
    pub fn points(&self) -> [Point; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// Edges top, right, bottom, left.
    pub fn edges(&self) -> [Segment; 4] {
        geometry::quad_edges(self.tl, self.tr, self.br, self.bl)
    }

    /// Even-odd containment test.
    pub fn contains(&self, point: Point) -> bool {
        geometry::quad_contains(point, &self.edges())
    }
}

/// A handle anchor and the small square around it used for hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleCoord {
    pub position: Point,
    pub corner: Quad,
}

/// Canvas-space coordinates of the nine handles of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub tl: HandleCoord,
    pub tr: HandleCoord,
    pub br: HandleCoord,
    pub bl: HandleCoord,
    pub ml: HandleCoord,
    pub mt: HandleCoord,
    pub mr: HandleCoord,
    pub mb: HandleCoord,
    pub mtr: HandleCoord,
    /// Padded, scaled width the coordinates were computed from.
    pub current_width: f64,
    pub current_height: f64,
}

impl Coords {
    pub fn get(&self, kind: HandleKind) -> &HandleCoord {
        match kind {
            HandleKind::Tl => &self.tl,
            HandleKind::Tr => &self.tr,
            HandleKind::Br => &self.br,
            HandleKind::Bl => &self.bl,
            HandleKind::Ml => &self.ml,
            HandleKind::Mt => &self.mt,
            HandleKind::Mr => &self.mr,
            HandleKind::Mb => &self.mb,
            HandleKind::Mtr => &self.mtr,
        }
    }

    /// The rotated bounding quadrilateral of the object.
    pub fn bounding_quad(&self) -> Quad {
        Quad {
            tl: self.tl.position,
            tr: self.tr.position,
            br: self.br.position,
            bl: self.bl.position,
        }
    }
}

/// Observable state specific to a shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KindState {
    Plain,
    Rect { rx: f64, ry: f64 },
}

/// Snapshot of every observable property, compared to detect modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    pub angle: f64,
    pub corner_size: f64,
    pub fill: Option<SerializableColor>,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    pub border_width: f64,
    pub visible: bool,
    pub kind: KindState,
}

/// Transformable, hit-testable state of a scene object.
///
/// Scales are always non-negative: assigning a negative scale flips the
/// object along that axis and stores the magnitude.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Horizontal position of the origin anchor.
    pub left: f64,
    /// Vertical position of the origin anchor.
    pub top: f64,
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    scale_x: f64,
    scale_y: f64,
    /// Rotation in degrees, clockwise on screen.
    pub angle: f64,
    flip_x: bool,
    flip_y: bool,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
    pub visible: bool,
    active: bool,
    /// Set while a drag session is in flight; dims the decoration.
    pub is_moving: bool,
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    pub controls: ControlStyle,
    o_coords: Option<Coords>,
    original_state: Option<StateSnapshot>,
    pub(crate) group: Option<ObjectId>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(ObjectOptions::default())
    }
}

impl Entity {
    pub fn new(options: ObjectOptions) -> Self {
        let mut entity = Self {
            left: options.left,
            top: options.top,
            width: options.width,
            height: options.height,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: options.angle,
            flip_x: options.flip_x,
            flip_y: options.flip_y,
            origin_x: options.origin_x,
            origin_y: options.origin_y,
            visible: options.visible,
            active: false,
            is_moving: false,
            fill: options.fill,
            stroke: options.stroke,
            stroke_width: options.stroke_width,
            controls: options.controls,
            o_coords: None,
            original_state: None,
            group: None,
        };
        entity.set_scale_x(options.scale_x);
        entity.set_scale_y(options.scale_y);
        entity
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    /// Set the horizontal scale. A negative value toggles `flip_x`.
    pub fn set_scale_x(&mut self, value: f64) -> &mut Self {
        if value < 0.0 {
            self.flip_x = !self.flip_x;
        }
        self.scale_x = value.abs();
        self
    }

    /// Set the vertical scale. A negative value toggles `flip_y`.
    pub fn set_scale_y(&mut self, value: f64) -> &mut Self {
        if value < 0.0 {
            self.flip_y = !self.flip_y;
        }
        self.scale_y = value.abs();
        self
    }

    /// Assign scale and flip state directly, normalizing the scale sign.
    pub(crate) fn set_scale_and_flip(&mut self, scale_x: f64, scale_y: f64, flip_x: bool, flip_y: bool) {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self.set_scale_x(scale_x);
        self.set_scale_y(scale_y);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) -> &mut Self {
        self.active = active;
        self
    }

    /// The group this object is currently a member of.
    pub fn group(&self) -> Option<ObjectId> {
        self.group
    }

    /// Cached handle coordinates, if [`Entity::set_coords`] has run.
    pub fn coords(&self) -> Option<&Coords> {
        self.o_coords.as_ref()
    }

    pub(crate) fn set_cached_coords(&mut self, coords: Coords) {
        self.o_coords = Some(coords);
    }

    /// Width including scale.
    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale_x
    }

    /// Height including scale.
    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale_y
    }

    pub fn angle_radians(&self) -> f64 {
        geometry::degrees_to_radians(self.angle)
    }

    pub fn snapshot(&self, kind: KindState) -> StateSnapshot {
        StateSnapshot {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
            angle: self.angle,
            corner_size: self.controls.corner_size,
            fill: self.fill,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            border_width: self.controls.border_width,
            visible: self.visible,
            kind,
        }
    }

    pub fn original_state(&self) -> Option<&StateSnapshot> {
        self.original_state.as_ref()
    }

    pub(crate) fn store_original_state(&mut self, state: StateSnapshot) {
        self.original_state = Some(state);
    }

    // ---- origin helpers ----

    /// Convert a point given relative to `(origin_x, origin_y)` into the object's center.
    pub fn translate_to_center_point(&self, point: Point, origin_x: OriginX, origin_y: OriginY) -> Point {
        let center = Point::new(
            point.x - origin_x.factor() * self.scaled_width(),
            point.y - origin_y.factor() * self.scaled_height(),
        );
        geometry::rotate_point(center, point, self.angle_radians())
    }

    /// Inverse of [`Entity::translate_to_center_point`].
    pub fn translate_to_origin_point(&self, center: Point, origin_x: OriginX, origin_y: OriginY) -> Point {
        let origin = Point::new(
            center.x + origin_x.factor() * self.scaled_width(),
            center.y + origin_y.factor() * self.scaled_height(),
        );
        geometry::rotate_point(origin, center, self.angle_radians())
    }

    /// Canvas-space center of the object.
    pub fn center_point(&self) -> Point {
        self.translate_to_center_point(Point::new(self.left, self.top), self.origin_x, self.origin_y)
    }

    /// Express `point` in the object's unrotated frame, relative to the given anchor.
    pub fn to_local_point(&self, point: Point, origin_x: OriginX, origin_y: OriginY) -> Point {
        let center = self.center_point();
        let unrotated = geometry::rotate_point(point, center, -self.angle_radians());
        Point::new(
            unrotated.x - (center.x + origin_x.factor() * self.scaled_width()),
            unrotated.y - (center.y + origin_y.factor() * self.scaled_height()),
        )
    }

    /// Move the object so that its `(origin_x, origin_y)` anchor lands on `pos`.
    pub fn set_position_by_origin(&mut self, pos: Point, origin_x: OriginX, origin_y: OriginY) {
        let center = self.translate_to_center_point(pos, origin_x, origin_y);
        let position = self.translate_to_origin_point(center, self.origin_x, self.origin_y);
        self.left = position.x;
        self.top = position.y;
    }

    // ---- coordinates ----

    /// Recompute and cache the canvas-space handle coordinates.
    pub fn set_coords(&mut self) -> &mut Self {
        self.o_coords = Some(self.compute_coords());
        self
    }

    /// Handle coordinates for the current geometry.
    ///
    /// Hairline strokes (width 1 or less) do not grow the box.
    pub fn compute_coords(&self) -> Coords {
        let stroke = if self.stroke_width > 1.0 { self.stroke_width } else { 0.0 };
        let padding = self.controls.padding;
        let theta = self.angle_radians();
        let (sin, cos) = theta.sin_cos();

        let current_width = (self.width + stroke) * self.scale_x + padding * 2.0;
        let current_height = (self.height + stroke) * self.scale_y + padding * 2.0;

        // Half-diagonal length and its angle inside the unrotated box
        let hyp = (current_width / 2.0).hypot(current_height / 2.0);
        let diag_angle = current_height.atan2(current_width);
        let offset_x = (diag_angle + theta).cos() * hyp;
        let offset_y = (diag_angle + theta).sin() * hyp;

        let center = self.center_point();
        let along_w = |p: Point, len: f64| Point::new(p.x + len * cos, p.y + len * sin);
        let along_h = |p: Point, len: f64| Point::new(p.x - len * sin, p.y + len * cos);

        let tl = Point::new(center.x - offset_x, center.y - offset_y);
        let tr = along_w(tl, current_width);
        let br = along_h(tr, current_height);
        let bl = along_h(tl, current_height);
        let ml = along_h(tl, current_height / 2.0);
        let mt = along_w(tl, current_width / 2.0);
        let mr = along_h(tr, current_height / 2.0);
        let mb = along_w(bl, current_width / 2.0);

        let corner = |p: Point| self.corner_quad(p);
        let rotate_offset = self.controls.rotating_point_offset;
        let mtr_corner = {
            let q = corner(mt);
            let shift = |p: Point| Point::new(p.x + sin * rotate_offset, p.y - cos * rotate_offset);
            Quad {
                tl: shift(q.tl),
                tr: shift(q.tr),
                br: shift(q.br),
                bl: shift(q.bl),
            }
        };

        let handle = |p: Point| HandleCoord {
            position: p,
            corner: corner(p),
        };

        Coords {
            tl: handle(tl),
            tr: handle(tr),
            br: handle(br),
            bl: handle(bl),
            ml: handle(ml),
            mt: handle(mt),
            mr: handle(mr),
            mb: handle(mb),
            mtr: HandleCoord {
                position: mt,
                corner: mtr_corner,
            },
            current_width,
            current_height,
        }
    }

    /// Hit square of side `corner_size` around a handle anchor.
    fn corner_quad(&self, p: Point) -> Quad {
        let size = self.controls.corner_size;
        let theta = geometry::degrees_to_radians(45.0 - self.angle);
        let corner_hyp = (2.0 * size * size).sqrt() / 2.0;
        let cos_half = corner_hyp * theta.cos();
        let sin_half = corner_hyp * theta.sin();
        Quad {
            tl: Point::new(p.x - sin_half, p.y - cos_half),
            tr: Point::new(p.x + cos_half, p.y - sin_half),
            br: Point::new(p.x + sin_half, p.y + cos_half),
            bl: Point::new(p.x - cos_half, p.y + sin_half),
        }
    }

    /// Which handle, if any, lies under `pointer`.
    ///
    /// Only active objects with controls expose handles.
    pub fn find_target_corner(&self, pointer: Point) -> Option<HandleKind> {
        if !self.controls.has_controls || !self.active {
            return None;
        }
        let coords = self.o_coords.as_ref()?;
        HandleKind::ALL.into_iter().find(|&kind| {
            if kind == HandleKind::Mtr && !self.controls.has_rotating_point {
                return false;
            }
            let found = coords.get(kind).corner.contains(pointer);
            if found {
                log::trace!("pointer {pointer:?} over handle {kind:?}");
            }
            found
        })
    }

    /// Even-odd test against the rotated bounding quad.
    pub fn contains_point(&self, pointer: Point) -> bool {
        self.o_coords
            .as_ref()
            .is_some_and(|coords| coords.bounding_quad().contains(pointer))
    }

    /// Whether any edge of the bounding quad crosses the rectangle `tl..br`.
    pub fn intersects_rect(&self, tl: Point, br: Point) -> bool {
        let Some(coords) = self.o_coords.as_ref() else {
            return false;
        };
        geometry::intersect_polygon_rectangle(&coords.bounding_quad().points(), tl, br).is_intersection()
    }

    /// Whether the bounding quad lies strictly inside the rectangle `tl..br`.
    pub fn is_contained_in_rect(&self, tl: Point, br: Point) -> bool {
        let Some(coords) = self.o_coords.as_ref() else {
            return false;
        };
        coords
            .bounding_quad()
            .points()
            .iter()
            .all(|p| p.x > tl.x && p.x < br.x && p.y > tl.y && p.y < br.y)
    }

    // ---- rendering ----

    /// Apply this object's transform: translate to the center, rotate, scale.
    pub fn transform(&self, surface: &mut dyn Surface) {
        let center = self.center_point();
        surface.translate(center.x, center.y);
        surface.rotate(self.angle_radians());
        surface.scale(self.scale_x, self.scale_y);
    }

    /// Render the object: transform, draw the body via `draw`, then the
    /// border and handles when active.
    pub fn render_with(
        &self,
        surface: &mut dyn Surface,
        rotating_point: bool,
        draw: impl FnOnce(&mut dyn Surface),
    ) {
        if self.width == 0.0 || self.height == 0.0 || !self.visible {
            return;
        }
        surface.save();
        self.transform(surface);
        draw(surface);
        if self.active {
            self.draw_borders(surface, rotating_point);
            self.draw_controls(surface, rotating_point);
        }
        surface.restore();
    }

    /// Stroke the selection border around the object, in the object's local frame.
    pub fn draw_borders(&self, surface: &mut dyn Surface, rotating_point: bool) {
        if self.scale_x == 0.0 || self.scale_y == 0.0 {
            return;
        }
        let padding = self.controls.padding;
        let stroke_width = self.controls.border_width;
        let w = self.scaled_width();
        let h = self.scaled_height();

        surface.save();
        surface.set_global_alpha(if self.is_moving { 0.5 } else { 1.0 });
        surface.set_stroke_color(self.controls.border_color.into());
        surface.set_line_width(stroke_width);
        // Undo the object scale so the border stays one pixel wide
        surface.scale(1.0 / self.scale_x, 1.0 / self.scale_y);

        surface.stroke_rect(Rect::from_origin_size(
            (-(w / 2.0) - padding - stroke_width / 2.0, -(h / 2.0) - padding - stroke_width / 2.0),
            (w + padding * 2.0 + stroke_width, h + padding * 2.0 + stroke_width),
        ));

        if rotating_point && self.controls.has_rotating_point && self.controls.has_controls {
            let rotate_height = (-h - stroke_width - padding * 2.0) / 2.0;
            surface.begin_path();
            surface.move_to(Point::new(0.0, rotate_height));
            surface.line_to(Point::new(0.0, rotate_height - self.controls.rotating_point_offset));
            surface.close_path();
            surface.stroke();
        }
        surface.restore();
    }

    /// Draw the eight resize handles and the rotation handle.
    pub fn draw_controls(&self, surface: &mut dyn Surface, rotating_point: bool) {
        if !self.controls.has_controls || self.scale_x == 0.0 || self.scale_y == 0.0 {
            return;
        }
        let size = self.controls.corner_size;
        let size_x = size / self.scale_x;
        let size_y = size / self.scale_y;
        let half_x = size_x / 2.0;
        let half_y = size_y / 2.0;
        let stroke_half = self.stroke_width / 2.0;
        let pad_x = self.controls.padding / self.scale_x;
        let pad_y = self.controls.padding / self.scale_y;
        let left = -(self.width / 2.0);
        let top = -(self.height / 2.0);

        let x_left = left - half_x - stroke_half - pad_x;
        let x_mid = -half_x;
        let x_right = -left - half_x + stroke_half + pad_x;
        let y_top = top - half_y - stroke_half - pad_y;
        let y_mid = -half_y;
        let y_bottom = -top - half_y + stroke_half + pad_y;

        surface.save();
        surface.set_line_width(self.controls.border_width / self.scale_x.max(self.scale_y));
        surface.set_global_alpha(if self.is_moving { 0.5 } else { 1.0 });
        surface.set_stroke_color(self.controls.corner_color.into());
        surface.set_fill_color(self.controls.corner_color.into());

        for (x, y) in [
            (x_left, y_top),
            (x_mid, y_top),
            (x_right, y_top),
            (x_right, y_mid),
            (x_right, y_bottom),
            (x_mid, y_bottom),
            (x_left, y_bottom),
            (x_left, y_mid),
        ] {
            self.draw_corner(surface, Rect::from_origin_size((x, y), (size_x, size_y)));
        }

        if rotating_point && self.controls.has_rotating_point {
            let y_rotate = top - stroke_half - pad_y - self.controls.rotating_point_offset / self.scale_y - half_y;
            self.draw_corner(surface, Rect::from_origin_size((x_mid, y_rotate), (size_x, size_y)));
        }
        surface.restore();
    }

    fn draw_corner(&self, surface: &mut dyn Surface, rect: Rect) {
        surface.clear_rect(rect);
        if self.controls.transparent_corners {
            surface.stroke_rect(rect);
        } else {
            surface.fill_rect(rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    fn square(left: f64, top: f64, size: f64) -> Entity {
        let mut e = Entity::new(ObjectOptions::new(left, top, size, size));
        e.set_coords();
        e
    }

    #[test]
    fn test_negative_scale_flips() {
        let mut e = Entity::default();
        e.set_scale_x(-2.0);
        assert_eq!(e.scale_x(), 2.0);
        assert!(e.flip_x());

        e.set_scale_x(-0.5);
        assert_eq!(e.scale_x(), 0.5);
        assert!(!e.flip_x());

        e.set_scale_y(3.0);
        assert_eq!(e.scale_y(), 3.0);
        assert!(!e.flip_y());
    }

    #[test]
    fn test_options_negative_scale_is_normalized() {
        let e = Entity::new(ObjectOptions::new(0.0, 0.0, 10.0, 10.0).with_scale(-1.0, 1.0));
        assert_eq!(e.scale_x(), 1.0);
        assert!(e.flip_x());
    }

    #[test]
    fn test_coords_axis_aligned() {
        let e = square(100.0, 100.0, 50.0);
        let coords = e.coords().unwrap();
        // 50 wide plus one pixel of padding on each side
        assert!(approx(coords.tl.position, Point::new(74.0, 74.0)));
        assert!(approx(coords.tr.position, Point::new(126.0, 74.0)));
        assert!(approx(coords.br.position, Point::new(126.0, 126.0)));
        assert!(approx(coords.bl.position, Point::new(74.0, 126.0)));
        assert!(approx(coords.mt.position, Point::new(100.0, 74.0)));
        assert!(approx(coords.mr.position, Point::new(126.0, 100.0)));
        assert_eq!(coords.mtr.position, coords.mt.position);
        assert!((coords.current_width - 52.0).abs() < EPS);
    }

    #[test]
    fn test_coords_rotated_quarter_turn() {
        let mut e = Entity::new(ObjectOptions::new(0.0, 0.0, 40.0, 20.0).with_angle(90.0));
        e.set_coords();
        let coords = e.coords().unwrap();
        // Width now runs downward; top-left sits at the upper right
        assert!(approx(coords.tl.position, Point::new(11.0, -21.0)));
        assert!(approx(coords.tr.position, Point::new(11.0, 21.0)));
        assert!(approx(coords.br.position, Point::new(-11.0, 21.0)));
    }

    #[test]
    fn test_hairline_stroke_does_not_grow_box() {
        let thin = Entity::new(ObjectOptions::new(0.0, 0.0, 10.0, 10.0).with_stroke(None, 1.0));
        let thick = Entity::new(ObjectOptions::new(0.0, 0.0, 10.0, 10.0).with_stroke(None, 4.0));
        assert!((thin.compute_coords().current_width - 12.0).abs() < EPS);
        assert!((thick.compute_coords().current_width - 16.0).abs() < EPS);
    }

    #[test]
    fn test_hit_and_miss() {
        let e = square(100.0, 100.0, 50.0);
        assert!(e.contains_point(Point::new(100.0, 100.0)));
        assert!(e.contains_point(Point::new(80.0, 120.0)));
        assert!(!e.contains_point(Point::new(150.0, 100.0)));
        assert!(!e.contains_point(Point::new(100.0, 40.0)));
    }

    #[test]
    fn test_rotated_hit() {
        let mut e = Entity::new(ObjectOptions::new(0.0, 0.0, 100.0, 10.0).with_angle(45.0));
        e.set_coords();
        // Along the rotated long axis
        assert!(e.contains_point(Point::new(30.0, 30.0)));
        // Inside the unrotated box but off the rotated one
        assert!(!e.contains_point(Point::new(40.0, -5.0)));
    }

    #[test]
    fn test_zero_size_does_not_panic() {
        let mut e = Entity::new(ObjectOptions::new(5.0, 5.0, 0.0, 0.0));
        e.controls.padding = 0.0;
        e.set_coords();
        assert!(!e.contains_point(Point::new(5.0, 5.0)));
        assert!(!e.contains_point(Point::new(6.0, 5.0)));
    }

    #[test]
    fn test_find_target_corner_requires_active() {
        let mut e = square(100.0, 100.0, 50.0);
        assert_eq!(e.find_target_corner(Point::new(126.0, 126.0)), None);

        e.set_active(true);
        assert_eq!(e.find_target_corner(Point::new(126.0, 126.0)), Some(HandleKind::Br));
        assert_eq!(e.find_target_corner(Point::new(73.0, 75.0)), Some(HandleKind::Tl));
        assert_eq!(e.find_target_corner(Point::new(100.0, 64.0)), Some(HandleKind::Mtr));
        assert_eq!(e.find_target_corner(Point::new(100.0, 100.0)), None);

        e.controls.has_rotating_point = false;
        assert_eq!(e.find_target_corner(Point::new(100.0, 64.0)), None);

        e.controls.has_controls = false;
        assert_eq!(e.find_target_corner(Point::new(126.0, 126.0)), None);
    }

    #[test]
    fn test_rect_containment_and_intersection() {
        let e = square(100.0, 100.0, 50.0);
        let tl = Point::new(0.0, 0.0);
        assert!(e.is_contained_in_rect(tl, Point::new(200.0, 200.0)));
        assert!(!e.intersects_rect(tl, Point::new(200.0, 200.0)));

        assert!(e.intersects_rect(tl, Point::new(100.0, 100.0)));
        assert!(!e.is_contained_in_rect(tl, Point::new(100.0, 100.0)));

        assert!(!e.intersects_rect(tl, Point::new(50.0, 50.0)));
        assert!(!e.is_contained_in_rect(tl, Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_rotated_containment_checks_every_corner() {
        let mut e = Entity::new(ObjectOptions::new(100.0, 100.0, 40.0, 40.0).with_angle(45.0));
        e.set_coords();
        // The left vertex sits near x = 70, outside the rectangle
        let (tl, br) = (Point::new(90.0, 50.0), Point::new(200.0, 200.0));
        assert!(!e.is_contained_in_rect(tl, br));
        assert!(e.intersects_rect(tl, br));

        assert!(e.is_contained_in_rect(Point::new(60.0, 60.0), Point::new(140.0, 140.0)));
    }

    #[test]
    fn test_origin_translation_round_trip() {
        let mut e = Entity::new(
            ObjectOptions::new(40.0, 60.0, 30.0, 20.0)
                .with_angle(35.0)
                .with_origin(OriginX::Left, OriginY::Top),
        );
        let center = e.center_point();
        let back = e.translate_to_origin_point(center, OriginX::Left, OriginY::Top);
        assert!(approx(back, Point::new(40.0, 60.0)));

        // Re-anchoring by the center keeps the object in place
        e.set_position_by_origin(center, OriginX::Center, OriginY::Center);
        assert!(approx(Point::new(e.left, e.top), Point::new(40.0, 60.0)));
    }

    #[test]
    fn test_to_local_point() {
        let e = Entity::new(ObjectOptions::new(100.0, 100.0, 40.0, 20.0).with_angle(90.0));
        // Right edge midpoint of the rotated object sits below the center
        let local = e.to_local_point(Point::new(100.0, 120.0), OriginX::Center, OriginY::Center);
        assert!(approx(local, Point::new(20.0, 0.0)));
        let from_left = e.to_local_point(Point::new(100.0, 120.0), OriginX::Left, OriginY::Center);
        assert!(approx(from_left, Point::new(40.0, 0.0)));
    }
}
