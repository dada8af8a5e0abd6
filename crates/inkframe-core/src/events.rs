//! Notifications emitted by the canvas controller.

use crate::shapes::ObjectId;
use serde::{Deserialize, Serialize};

/// What a pointer event resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// A primitive object in the scene.
    Object(ObjectId),
    /// The active selection group.
    Group(ObjectId),
}

impl Target {
    pub fn id(&self) -> ObjectId {
        match self {
            Target::Object(id) | Target::Group(id) => *id,
        }
    }
}

/// Events queued during input handling, drained with `Canvas::poll_events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanvasEvent {
    ObjectAdded { id: ObjectId },
    MouseDown { target: Option<Target> },
    MouseUp { target: Option<Target> },
    /// A transform session changed the target's observable state.
    ObjectModified { target: Target },
}
