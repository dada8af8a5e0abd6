//! Scene objects: the common entity state, primitive shapes and groups.

mod group;
mod object;
mod rectangle;

pub use group::Group;
pub use object::{
    ControlStyle, Coords, Entity, HandleCoord, KindState, ObjectOptions, OriginX, OriginY, Quad,
    StateSnapshot,
};
pub use rectangle::{RectOptions, Rectangle};

use crate::surface::Surface;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for scene objects.
pub type ObjectId = Uuid;

/// Object storage keyed by id.
pub type ObjectMap = HashMap<ObjectId, Shape>;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Capabilities shared by primitives and groups: identity, transformable
/// state, and modification tracking.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ObjectId;

    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    /// State specific to this kind of shape.
    fn kind_state(&self) -> KindState {
        KindState::Plain
    }

    /// Current observable state.
    fn state(&self) -> StateSnapshot {
        self.entity().snapshot(self.kind_state())
    }

    /// Record the current state as the baseline for [`ShapeTrait::has_state_changed`].
    fn save_state(&mut self) {
        let state = self.state();
        self.entity_mut().store_original_state(state);
    }

    /// Whether any observable property differs from the saved baseline.
    fn has_state_changed(&self) -> bool {
        self.entity().original_state() != Some(&self.state())
    }
}

/// Enum wrapper for all primitive shape kinds.
#[derive(Debug, Clone)]
pub enum Shape {
    Rectangle(Rectangle),
}

impl Shape {
    pub fn id(&self) -> ObjectId {
        match self {
            Shape::Rectangle(s) => s.id(),
        }
    }

    pub fn entity(&self) -> &Entity {
        match self {
            Shape::Rectangle(s) => s.entity(),
        }
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        match self {
            Shape::Rectangle(s) => s.entity_mut(),
        }
    }

    pub fn state(&self) -> StateSnapshot {
        match self {
            Shape::Rectangle(s) => s.state(),
        }
    }

    pub fn save_state(&mut self) {
        match self {
            Shape::Rectangle(s) => s.save_state(),
        }
    }

    pub fn has_state_changed(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.has_state_changed(),
        }
    }

    /// Draw the body in the object's local frame.
    pub fn draw(&self, surface: &mut dyn Surface) {
        match self {
            Shape::Rectangle(s) => s.draw(surface),
        }
    }

    /// Render with the object's own transform and, when active, its decoration.
    pub fn render(&self, surface: &mut dyn Surface) {
        self.entity().render_with(surface, true, |s| self.draw(s));
    }

    /// Render as a group member: the rotation handle is never shown.
    pub fn render_in_group(&self, surface: &mut dyn Surface) {
        self.entity().render_with(surface, false, |s| self.draw(s));
    }

    /// Copy of this shape with its entity replaced.
    pub(crate) fn with_entity(&self, entity: Entity) -> Shape {
        let mut shape = self.clone();
        *shape.entity_mut() = entity;
        shape
    }

    pub fn as_rectangle(&self) -> Option<&Rectangle> {
        match self {
            Shape::Rectangle(r) => Some(r),
        }
    }
}

impl From<Rectangle> for Shape {
    fn from(rect: Rectangle) -> Self {
        Shape::Rectangle(rect)
    }
}
