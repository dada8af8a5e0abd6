//! Selection handles and the pointer-driven transform session.

use crate::geometry;
use crate::shapes::{Entity, OriginX, OriginY, StateSnapshot};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// One of the nine control handles around a selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Tl,
    Tr,
    Br,
    Bl,
    Ml,
    Mt,
    Mr,
    Mb,
    /// Rotation handle above the top edge.
    Mtr,
}

impl HandleKind {
    /// Hit-test order.
    pub const ALL: [HandleKind; 9] = [
        HandleKind::Tl,
        HandleKind::Tr,
        HandleKind::Br,
        HandleKind::Bl,
        HandleKind::Ml,
        HandleKind::Mt,
        HandleKind::Mr,
        HandleKind::Mb,
        HandleKind::Mtr,
    ];

    /// Resize cursor shown over this handle.
    ///
    /// The rotation handle has no resize cursor; callers pick the rotation cursor.
    pub fn cursor(self) -> Option<CursorIcon> {
        match self {
            HandleKind::Tr => Some(CursorIcon::NeResize),
            HandleKind::Br => Some(CursorIcon::SeResize),
            HandleKind::Bl => Some(CursorIcon::SwResize),
            HandleKind::Tl => Some(CursorIcon::NwResize),
            HandleKind::Ml => Some(CursorIcon::WResize),
            HandleKind::Mt => Some(CursorIcon::NResize),
            HandleKind::Mr => Some(CursorIcon::EResize),
            HandleKind::Mb => Some(CursorIcon::SResize),
            HandleKind::Mtr => None,
        }
    }

    /// The transform grabbing this handle starts.
    pub fn action(handle: Option<HandleKind>) -> Action {
        match handle {
            Some(HandleKind::Ml | HandleKind::Mr) => Action::ScaleX,
            Some(HandleKind::Mt | HandleKind::Mb) => Action::ScaleY,
            Some(HandleKind::Mtr) => Action::Rotate,
            Some(_) => Action::Scale,
            None => Action::Drag,
        }
    }

    /// The anchor held fixed while this handle is dragged: the opposite side.
    pub fn transform_origin(handle: Option<HandleKind>) -> (OriginX, OriginY) {
        let Some(handle) = handle else {
            return (OriginX::Center, OriginY::Center);
        };
        if handle == HandleKind::Mtr {
            return (OriginX::Center, OriginY::Center);
        }
        let origin_x = match handle {
            HandleKind::Ml | HandleKind::Tl | HandleKind::Bl => OriginX::Right,
            HandleKind::Mr | HandleKind::Tr | HandleKind::Br => OriginX::Left,
            _ => OriginX::Center,
        };
        let origin_y = match handle {
            HandleKind::Tl | HandleKind::Mt | HandleKind::Tr => OriginY::Bottom,
            HandleKind::Bl | HandleKind::Mb | HandleKind::Br => OriginY::Top,
            _ => OriginY::Center,
        };
        (origin_x, origin_y)
    }
}

/// Pointer cursor requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorIcon {
    #[default]
    Default,
    Move,
    Crosshair,
    NResize,
    NeResize,
    EResize,
    SeResize,
    SResize,
    SwResize,
    WResize,
    NwResize,
}

/// Kind of transform a session applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Drag,
    /// Uniform scale from a corner handle.
    Scale,
    ScaleX,
    ScaleY,
    Rotate,
}

/// State of an in-flight drag, scale or rotate gesture.
#[derive(Debug, Clone)]
pub struct CurrentTransform<T> {
    pub target: T,
    pub action: Action,
    pub handle: Option<HandleKind>,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
    /// Pointer position at pointer-down.
    pub start: Point,
    /// Pointer offset from the target's `(left, top)` at pointer-down.
    pub offset: Vec2,
    /// Canvas-space anchor held fixed while scaling.
    pub anchor: Point,
    /// Target center at pointer-down.
    pub center: Point,
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Rotation in radians at pointer-down.
    pub theta: f64,
    /// Snapshot of the target at pointer-down.
    pub original: StateSnapshot,
}

impl<T> CurrentTransform<T> {
    /// Start a session for `target` grabbed at `pointer`.
    pub fn begin(target: T, entity: &Entity, pointer: Point, original: StateSnapshot) -> Self {
        let handle = entity.find_target_corner(pointer);
        let action = HandleKind::action(handle);
        let (origin_x, origin_y) = HandleKind::transform_origin(handle);
        let center = entity.center_point();
        Self {
            target,
            action,
            handle,
            origin_x,
            origin_y,
            start: pointer,
            offset: pointer - Point::new(entity.left, entity.top),
            anchor: entity.translate_to_origin_point(center, origin_x, origin_y),
            center,
            left: entity.left,
            top: entity.top,
            scale_x: entity.scale_x(),
            scale_y: entity.scale_y(),
            flip_x: entity.flip_x(),
            flip_y: entity.flip_y(),
            theta: entity.angle_radians(),
            original,
        }
    }

    /// Apply the gesture for the current pointer position.
    pub fn apply(&self, entity: &mut Entity, pointer: Point) {
        match self.action {
            Action::Drag => self.translate(entity, pointer),
            Action::Rotate => self.rotate(entity, pointer),
            Action::Scale | Action::ScaleX | Action::ScaleY => self.scale(entity, pointer),
        }
        entity.is_moving = true;
    }

    fn translate(&self, entity: &mut Entity, pointer: Point) {
        entity.left = pointer.x - self.offset.x;
        entity.top = pointer.y - self.offset.y;
    }

    fn rotate(&self, entity: &mut Entity, pointer: Point) {
        let c = self.center;
        let last = (self.start.y - c.y).atan2(self.start.x - c.x);
        let current = (pointer.y - c.y).atan2(pointer.x - c.x);
        entity.angle = geometry::radians_to_degrees(current - last + self.theta).rem_euclid(360.0);
        // Rotation pivots on the center regardless of the object's origin
        entity.set_position_by_origin(c, OriginX::Center, OriginY::Center);
    }

    /// Pointer offset from the anchor, in the target's unrotated frame.
    fn local_extent(&self, pointer: Point) -> Vec2 {
        let local = geometry::rotate_point(pointer, self.anchor, -self.theta) - self.anchor;
        let x = match self.origin_x {
            OriginX::Left => local.x,
            OriginX::Right => -local.x,
            OriginX::Center => 2.0 * local.x.abs(),
        };
        let y = match self.origin_y {
            OriginY::Top => local.y,
            OriginY::Bottom => -local.y,
            OriginY::Center => 2.0 * local.y.abs(),
        };
        Vec2::new(x, y)
    }

    fn scale(&self, entity: &mut Entity, pointer: Point) {
        let grab = self.local_extent(self.start);
        let now = self.local_extent(pointer);

        let (mut sx, mut sy) = (self.scale_x, self.scale_y);
        match self.action {
            Action::ScaleX => {
                if grab.x != 0.0 {
                    sx = self.scale_x * now.x / grab.x;
                }
            }
            Action::ScaleY => {
                if grab.y != 0.0 {
                    sy = self.scale_y * now.y / grab.y;
                }
            }
            _ => {
                let grab_len = grab.x + grab.y;
                if grab_len != 0.0 {
                    let ratio = (now.x + now.y) / grab_len;
                    sx = self.scale_x * ratio;
                    sy = self.scale_y * ratio;
                }
            }
        }

        // Crossing the anchor mirrors the object onto the other side of it
        let origin_x = if sx < 0.0 { self.origin_x.opposite() } else { self.origin_x };
        let origin_y = if sy < 0.0 { self.origin_y.opposite() } else { self.origin_y };
        entity.set_scale_and_flip(
            sx.abs(),
            sy.abs(),
            self.flip_x ^ (sx < 0.0),
            self.flip_y ^ (sy < 0.0),
        );
        entity.set_position_by_origin(self.anchor, origin_x, origin_y);
    }
}

/// Rubber-band selection rectangle anchored at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSelector {
    pub origin: Point,
    /// Signed extent from the origin to the pointer.
    pub extent: Vec2,
}

impl GroupSelector {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            extent: Vec2::ZERO,
        }
    }

    pub fn update(&mut self, pointer: Point) {
        self.extent = pointer - self.origin;
    }

    /// Normalized selection rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.origin, self.origin + self.extent)
    }
}
