//! inkframe core library
//!
//! Platform-agnostic object model and interaction engine for the inkframe
//! canvas: geometry kernel, transformable objects, selection groups, and the
//! pointer-driven selection and transform controller.

pub mod canvas;
pub mod events;
pub mod geometry;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod surface;

pub use canvas::{Canvas, CanvasError, CanvasOptions, CanvasResult, SceneDocument, Selection};
pub use events::{CanvasEvent, Target};
pub use geometry::{Intersection, IntersectionStatus};
pub use input::{Modifiers, MouseButton, PointerEvent};
pub use selection::{Action, CurrentTransform, CursorIcon, GroupSelector, HandleKind};
pub use shapes::{
    ControlStyle, Entity, Group, ObjectId, ObjectOptions, OriginX, OriginY, RectOptions, Rectangle,
    SerializableColor, Shape, ShapeTrait,
};
pub use surface::{CoverageSurface, PixelProbe, Surface};
