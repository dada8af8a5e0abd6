//! Scene document and the pointer-driven selection controller.

use crate::events::{CanvasEvent, Target};
use crate::input::{MouseButton, PointerEvent};
use crate::selection::{Action, CurrentTransform, CursorIcon, GroupSelector, HandleKind};
use crate::shapes::{
    Entity, Group, ObjectId, ObjectMap, SerializableColor, Shape, ShapeTrait, StateSnapshot,
};
use crate::surface::{CoverageSurface, PixelProbe, Surface};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canvas errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),
    #[error("Object already in scene: {0}")]
    DuplicateObject(ObjectId),
    #[error("Cannot create an empty group")]
    EmptyGroup,
}

pub type CanvasResult<T> = Result<T, CanvasError>;

/// Objects in the scene, keyed by id, with their paint order.
#[derive(Debug, Clone, Default)]
pub struct SceneDocument {
    objects: ObjectMap,
    /// Z-order of objects (back to front).
    z_order: Vec<ObjectId>,
}

impl SceneDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of the stack.
    pub fn add_shape(&mut self, shape: Shape) -> CanvasResult<ObjectId> {
        let id = shape.id();
        if self.objects.contains_key(&id) {
            return Err(CanvasError::DuplicateObject(id));
        }
        self.z_order.push(id);
        self.objects.insert(id, shape);
        Ok(id)
    }

    pub fn remove_shape(&mut self, id: ObjectId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.objects.remove(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Shape> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Shape> {
        self.objects.get_mut(&id)
    }

    /// Shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Ids in z-order (back to front).
    pub fn z_order(&self) -> &[ObjectId] {
        &self.z_order
    }

    /// Bring a shape to the front (topmost).
    pub fn bring_to_front(&mut self, id: ObjectId) {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.z_order.push(id);
    }

    /// Send a shape to the back (bottommost).
    pub fn send_to_back(&mut self, id: ObjectId) {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.z_order.insert(0, id);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Canvas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasOptions {
    pub width: u32,
    pub height: u32,
    pub default_cursor: CursorIcon,
    /// Cursor over an object body.
    pub hover_cursor: CursorIcon,
    /// Cursor while dragging.
    pub move_cursor: CursorIcon,
    pub rotation_cursor: CursorIcon,
    /// Marquee fill.
    pub selection_color: SerializableColor,
    pub selection_border_color: SerializableColor,
    pub selection_line_width: f64,
    /// Ignore hits on fully transparent pixels of a candidate.
    pub per_pixel_target_find: bool,
    /// Half-size of the pixel window sampled by the transparency probe.
    pub target_find_tolerance: f64,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            default_cursor: CursorIcon::Default,
            hover_cursor: CursorIcon::Move,
            move_cursor: CursorIcon::Move,
            rotation_cursor: CursorIcon::Crosshair,
            selection_color: SerializableColor::new(100, 100, 255, 77),
            selection_border_color: SerializableColor::new(255, 255, 255, 77),
            selection_line_width: 1.0,
            per_pixel_target_find: false,
            target_find_tolerance: 0.0,
        }
    }
}

impl CanvasOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_per_pixel_target_find(mut self, enabled: bool) -> Self {
        self.per_pixel_target_find = enabled;
        self
    }

    pub fn with_target_find_tolerance(mut self, tolerance: f64) -> Self {
        self.target_find_tolerance = tolerance;
        self
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }
}

/// What is currently selected: nothing, one object, or a group.
#[derive(Debug, Clone, Default)]
pub enum Selection {
    #[default]
    None,
    Object(ObjectId),
    Group(Group),
}

/// The interactive canvas: owns the scene, resolves pointer events into
/// selection changes and transform sessions, and renders to a [`Surface`].
#[derive(Debug)]
pub struct Canvas {
    document: SceneDocument,
    options: CanvasOptions,
    /// Position of the surface within the host, subtracted from device coordinates.
    offset: Vec2,
    selection: Selection,
    current_transform: Option<CurrentTransform<Target>>,
    group_selector: Option<GroupSelector>,
    cursor: CursorIcon,
    /// Scratch surface for transparency probes.
    cache: CoverageSurface,
    events: Vec<CanvasEvent>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasOptions::default())
    }
}

impl Canvas {
    pub fn new(options: CanvasOptions) -> Self {
        Self {
            cache: CoverageSurface::new(options.width, options.height),
            cursor: options.default_cursor,
            document: SceneDocument::new(),
            options,
            offset: Vec2::ZERO,
            selection: Selection::None,
            current_transform: None,
            group_selector: None,
            events: Vec::new(),
        }
    }

    pub fn document(&self) -> &SceneDocument {
        &self.document
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    /// Drain queued events.
    pub fn poll_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- object list ----

    /// Add an object: snapshot its state, cache its coordinates, queue `ObjectAdded`.
    pub fn add(&mut self, shape: impl Into<Shape>) -> CanvasResult<ObjectId> {
        let mut shape = shape.into();
        shape.save_state();
        shape.entity_mut().set_coords();
        let id = self.document.add_shape(shape)?;
        self.events.push(CanvasEvent::ObjectAdded { id });
        log::debug!("added object {id}");
        Ok(id)
    }

    /// Remove an object, dropping it from the selection first.
    pub fn remove(&mut self, id: ObjectId) -> CanvasResult<Shape> {
        if !self.document.contains(id) {
            log::warn!("remove: unknown object {id}");
            return Err(CanvasError::ObjectNotFound(id));
        }
        if matches!(self.current_transform, Some(ref t) if t.target == Target::Object(id)) {
            self.current_transform = None;
        }
        if matches!(self.selection, Selection::Object(active) if active == id) {
            self.selection = Selection::None;
        }
        let mut collapse = false;
        if let Selection::Group(group) = &mut self.selection {
            if group.contains(id) {
                group.remove_with_update(id, &mut self.document.objects)?;
                collapse = group.size() <= 1;
            }
        }
        if collapse {
            self.collapse_group();
        }
        self.document
            .remove_shape(id)
            .ok_or(CanvasError::ObjectNotFound(id))
    }

    pub fn object(&self, id: ObjectId) -> CanvasResult<&Shape> {
        self.document.get(id).ok_or(CanvasError::ObjectNotFound(id))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> CanvasResult<&mut Shape> {
        self.document
            .get_mut(id)
            .ok_or(CanvasError::ObjectNotFound(id))
    }

    /// Objects in z-order (back to front).
    pub fn objects(&self) -> impl Iterator<Item = &Shape> {
        self.document.shapes_ordered()
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> CanvasResult<()> {
        if !self.document.contains(id) {
            return Err(CanvasError::ObjectNotFound(id));
        }
        self.document.bring_to_front(id);
        Ok(())
    }

    pub fn send_to_back(&mut self, id: ObjectId) -> CanvasResult<()> {
        if !self.document.contains(id) {
            return Err(CanvasError::ObjectNotFound(id));
        }
        self.document.send_to_back(id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    // ---- selection ----

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        match self.selection {
            Selection::Object(id) => Some(id),
            _ => None,
        }
    }

    pub fn active_group(&self) -> Option<&Group> {
        match &self.selection {
            Selection::Group(group) => Some(group),
            _ => None,
        }
    }

    /// The marquee while a drag-select is in progress.
    pub fn group_selector(&self) -> Option<&GroupSelector> {
        self.group_selector.as_ref()
    }

    /// Whether a transform session is open.
    pub fn is_transforming(&self) -> bool {
        self.current_transform.is_some()
    }

    /// Select a single object, clearing any other selection.
    pub fn set_active_object(&mut self, id: ObjectId) -> CanvasResult<()> {
        if !self.document.contains(id) {
            log::warn!("set_active_object: unknown object {id}");
            return Err(CanvasError::ObjectNotFound(id));
        }
        self.deactivate_all();
        self.activate_object(id);
        Ok(())
    }

    /// Make `group` the selection, disbanding any previous group.
    pub fn set_active_group(&mut self, mut group: Group) {
        self.discard_active_group();
        group.entity.set_active(true);
        group.activate_all_objects(&mut self.document.objects);
        log::debug!("group {} selected with {} members", group.id(), group.size());
        self.selection = Selection::Group(group);
    }

    /// Disband the active group, if any, returning its former members.
    pub fn discard_active_group(&mut self) -> Vec<ObjectId> {
        if !matches!(self.selection, Selection::Group(_)) {
            return Vec::new();
        }
        match std::mem::take(&mut self.selection) {
            Selection::Group(group) => group.destroy(&mut self.document.objects),
            _ => Vec::new(),
        }
    }

    /// Clear the selection and deactivate every object.
    pub fn deactivate_all(&mut self) {
        self.discard_active_group();
        for shape in self.document.objects.values_mut() {
            shape.entity_mut().set_active(false);
        }
        self.selection = Selection::None;
    }

    fn activate_object(&mut self, id: ObjectId) {
        if let Some(shape) = self.document.objects.get_mut(&id) {
            shape.entity_mut().set_active(true);
            self.selection = Selection::Object(id);
        }
    }

    fn activate_target(&mut self, target: Target) {
        match target {
            Target::Object(id) => self.activate_object(id),
            Target::Group(_) => {
                if let Selection::Group(group) = &mut self.selection {
                    group.entity.set_active(true);
                }
            }
        }
    }

    /// Disband a group left with one member; the survivor becomes the active object.
    fn collapse_group(&mut self) {
        let members = self.discard_active_group();
        if let [only] = members[..] {
            self.activate_object(only);
        }
    }

    fn selection_target(&self) -> Option<Target> {
        match &self.selection {
            Selection::None => None,
            Selection::Object(id) => Some(Target::Object(*id)),
            Selection::Group(group) => Some(Target::Group(group.id())),
        }
    }

    fn active_group_target(&self) -> Option<Target> {
        self.active_group().map(|group| Target::Group(group.id()))
    }

    // ---- target access ----

    /// Entity behind a target.
    pub fn entity(&self, target: Target) -> Option<&Entity> {
        match target {
            Target::Object(id) => self.document.get(id).map(Shape::entity),
            Target::Group(id) => self
                .active_group()
                .filter(|group| group.id() == id)
                .map(|group| &group.entity),
        }
    }

    fn entity_mut(&mut self, target: Target) -> Option<&mut Entity> {
        match target {
            Target::Object(id) => self.document.get_mut(id).map(Shape::entity_mut),
            Target::Group(id) => match &mut self.selection {
                Selection::Group(group) if group.id() == id => Some(&mut group.entity),
                _ => None,
            },
        }
    }

    fn target_state(&self, target: Target) -> Option<StateSnapshot> {
        match target {
            Target::Object(id) => self.document.get(id).map(Shape::state),
            Target::Group(_) => self.active_group().map(|group| group.state()),
        }
    }

    fn save_target_state(&mut self, target: Target) {
        match target {
            Target::Object(id) => {
                if let Some(shape) = self.document.get_mut(id) {
                    shape.save_state();
                }
            }
            Target::Group(_) => {
                if let Selection::Group(group) = &mut self.selection {
                    group.save_state();
                }
            }
        }
    }

    fn target_changed(&self, target: Target) -> bool {
        match target {
            Target::Object(id) => self.document.get(id).is_some_and(Shape::has_state_changed),
            Target::Group(_) => self.active_group().is_some_and(|group| group.has_state_changed()),
        }
    }

    // ---- hit testing ----

    /// Convert a device position into canvas coordinates.
    pub fn pointer(&self, device: Point) -> Point {
        device - self.offset
    }

    /// Record where the surface sits within the host; call on resize.
    pub fn calc_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Resize the canvas and its probe buffer.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.options.width = width;
        self.options.height = height;
        self.cache.resize(width, height);
    }

    /// Whether `pointer` lies on the target's bounding quad or one of its handles.
    pub fn contains_point(&self, pointer: Point, target: Target) -> bool {
        self.entity(target)
            .is_some_and(|entity| entity_contains(entity, pointer))
    }

    /// Resolve the topmost target under `pointer`.
    ///
    /// The active group wins when the pointer is inside it, unless
    /// `skip_group` is set.
    pub fn find_target(&mut self, pointer: Point, skip_group: bool) -> Option<Target> {
        if !skip_group {
            if let Selection::Group(group) = &self.selection {
                if group.contains_point(pointer) || group.entity.find_target_corner(pointer).is_some() {
                    log::trace!("pointer {pointer:?} resolved to active group");
                    return Some(Target::Group(group.id()));
                }
            }
        }

        let candidates: Vec<ObjectId> = self
            .document
            .z_order
            .iter()
            .rev()
            .copied()
            .filter(|id| {
                self.document
                    .objects
                    .get(id)
                    .is_some_and(|shape| shape.entity().visible && entity_contains(shape.entity(), pointer))
            })
            .collect();

        for id in candidates {
            if self.options.per_pixel_target_find && self.is_target_transparent(id, pointer) {
                log::trace!("skipping transparent hit on {id}");
                continue;
            }
            log::trace!("pointer {pointer:?} resolved to {id}");
            return Some(Target::Object(id));
        }
        None
    }

    /// Render `id` alone into the probe buffer and check whether the pixels
    /// around `point` are fully transparent.
    pub fn is_target_transparent(&mut self, id: ObjectId, point: Point) -> bool {
        let Some(shape) = self.document.get(id) else {
            log::warn!("transparency probe on unknown object {id}");
            return false;
        };
        let probe = match (&self.selection, shape.entity().group()) {
            (Selection::Group(group), Some(_)) => shape.with_entity(group.compose_member(shape.entity())),
            _ => shape.clone(),
        };

        let bounds = self.options.bounds();
        self.cache.clear(bounds);
        probe.render(&mut self.cache);

        let tolerance = self.options.target_find_tolerance;
        let x = if point.x > tolerance { (point.x - tolerance).floor() } else { 0.0 };
        let y = if point.y > tolerance { (point.y - tolerance).floor() } else { 0.0 };
        let size = if tolerance > 0.0 { tolerance * 2.0 } else { 1.0 };
        let alphas = self.cache.pixel_alpha(Rect::new(x, y, x + size, y + size));
        self.cache.clear(bounds);

        alphas.iter().all(|&alpha| alpha == 0)
    }

    // ---- pointer handling ----

    /// Process a pointer event and return the cursor the host should show.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, surface: &mut dyn Surface) -> CursorIcon {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                if button != MouseButton::Left {
                    return self.cursor;
                }
                self.on_pointer_down(position, modifiers.shift, surface)
            }
            PointerEvent::Up { position, button, .. } => {
                if button != MouseButton::Left {
                    return self.cursor;
                }
                self.on_pointer_up(position, surface)
            }
            PointerEvent::Move { position, .. } => self.on_pointer_move(position, surface),
        }
    }

    fn on_pointer_down(&mut self, position: Point, shift: bool, surface: &mut dyn Surface) -> CursorIcon {
        if self.current_transform.is_some() {
            return self.cursor;
        }
        let pointer = self.pointer(position);
        let target = self.find_target(pointer, false);

        let mut resolved = None;
        if self.should_clear_selection(target, shift) {
            self.deactivate_all();
            self.group_selector = Some(GroupSelector::new(pointer));
            log::debug!("marquee started at {pointer:?}");
        } else if let Some(target) = target {
            self.save_target_state(target);
            resolved = if self.should_handle_group_logic(target, shift) {
                self.handle_group_logic(pointer, target);
                self.selection_target()
            } else {
                if Some(target) != self.active_group_target() {
                    self.deactivate_all();
                }
                self.activate_target(target);
                Some(target)
            };
            if let Some(resolved) = resolved {
                self.setup_current_transform(pointer, resolved);
            }
        }

        self.render_all(surface);
        self.events.push(CanvasEvent::MouseDown { target: resolved });

        let cursor = match &self.current_transform {
            Some(transform) => self.session_cursor(transform),
            None => self.options.default_cursor,
        };
        self.set_cursor(cursor)
    }

    fn on_pointer_move(&mut self, position: Point, surface: &mut dyn Surface) -> CursorIcon {
        let pointer = self.pointer(position);

        if let Some(selector) = self.group_selector.as_mut() {
            selector.update(pointer);
            self.render_all(surface);
            return self.set_cursor(self.options.default_cursor);
        }

        if let Some(transform) = self.current_transform.take() {
            match transform.target {
                Target::Object(id) => {
                    if let Some(shape) = self.document.objects.get_mut(&id) {
                        transform.apply(shape.entity_mut(), pointer);
                        shape.entity_mut().set_coords();
                    }
                }
                Target::Group(_) => {
                    if let Selection::Group(group) = &mut self.selection {
                        transform.apply(&mut group.entity, pointer);
                        group.entity.set_coords();
                        group.set_objects_coords(&mut self.document.objects);
                    }
                }
            }
            let cursor = self.session_cursor(&transform);
            self.current_transform = Some(transform);
            self.render_all(surface);
            return self.set_cursor(cursor);
        }

        let target = self.find_target(pointer, false);
        let cursor = self.cursor_for(pointer, target);
        self.set_cursor(cursor)
    }

    fn on_pointer_up(&mut self, position: Point, surface: &mut dyn Surface) -> CursorIcon {
        let pointer = self.pointer(position);

        let mut target = None;
        if let Some(transform) = self.current_transform.take() {
            target = Some(transform.target);
            self.refresh_coords();
            if let Some(entity) = self.entity_mut(transform.target) {
                entity.is_moving = false;
            }
            if self.target_changed(transform.target) {
                log::debug!("{:?} modified by {:?}", transform.target, transform.action);
                self.events.push(CanvasEvent::ObjectModified {
                    target: transform.target,
                });
            }
            log::debug!("transform session closed");
        }

        if let Some(selector) = self.group_selector.take() {
            self.find_selected_objects(selector.rect());
        }
        if let Selection::Group(group) = &self.selection {
            group.set_objects_coords(&mut self.document.objects);
        }

        self.render_all(surface);
        let cursor = self.cursor_for(pointer, target);
        self.events.push(CanvasEvent::MouseUp { target });
        self.set_cursor(cursor)
    }

    /// Start a marquee instead of acting on the target.
    fn should_clear_selection(&self, target: Option<Target>, shift: bool) -> bool {
        let Some(target) = target else {
            return true;
        };
        match &self.selection {
            Selection::Group(group) => {
                let in_group = match target {
                    Target::Object(id) => group.contains(id),
                    Target::Group(id) => id == group.id(),
                };
                !in_group && !shift
            }
            _ => false,
        }
    }

    /// Shift-click toggles group membership.
    fn should_handle_group_logic(&self, target: Target, shift: bool) -> bool {
        if !shift {
            return false;
        }
        match &self.selection {
            Selection::Group(_) => true,
            Selection::Object(active) => Target::Object(*active) != target,
            Selection::None => false,
        }
    }

    fn handle_group_logic(&mut self, pointer: Point, target: Target) {
        let id = match target {
            Target::Object(id) => id,
            // Clicking the group itself picks the member underneath
            Target::Group(_) => match self.find_target(pointer, true) {
                Some(Target::Object(id)) => id,
                _ => return,
            },
        };

        let mut collapse = false;
        let mut pair_with = None;
        match &mut self.selection {
            Selection::Group(group) => {
                let result = if group.contains(id) {
                    group.remove_with_update(id, &mut self.document.objects)
                } else {
                    group.add_with_update(id, &mut self.document.objects)
                };
                if let Err(err) = result {
                    log::warn!("group membership change failed: {err}");
                    return;
                }
                group.entity.set_active(true);
                group.activate_all_objects(&mut self.document.objects);
                collapse = group.size() <= 1;
            }
            Selection::Object(active) => pair_with = Some(*active),
            Selection::None => {}
        }

        if collapse {
            self.collapse_group();
        }
        if let Some(active) = pair_with {
            match Group::new(&[active, id], &mut self.document.objects) {
                Ok(group) => self.set_active_group(group),
                Err(err) => log::warn!("could not group {active} with {id}: {err}"),
            }
        }
    }

    fn setup_current_transform(&mut self, pointer: Point, target: Target) {
        self.save_target_state(target);
        let Some(original) = self.target_state(target) else {
            return;
        };
        let Some(entity) = self.entity(target) else {
            return;
        };
        let transform = CurrentTransform::begin(target, entity, pointer, original);
        log::debug!("transform session {:?} opened on {target:?}", transform.action);
        self.current_transform = Some(transform);
    }

    /// Select whatever the marquee touches: one object directly, several as a group.
    fn find_selected_objects(&mut self, rect: Rect) {
        let tl = Point::new(rect.x0, rect.y0);
        let br = Point::new(rect.x1, rect.y1);
        let hits: Vec<ObjectId> = self
            .document
            .shapes_ordered()
            .filter(|shape| {
                let entity = shape.entity();
                entity.intersects_rect(tl, br) || entity.is_contained_in_rect(tl, br)
            })
            .map(Shape::id)
            .collect();
        log::debug!("marquee {rect:?} selected {} objects", hits.len());

        match hits[..] {
            [] => {}
            [only] => self.activate_object(only),
            _ => match Group::new(&hits, &mut self.document.objects) {
                Ok(group) => self.set_active_group(group),
                Err(err) => log::warn!("marquee group failed: {err}"),
            },
        }
    }

    /// Recompute cached coordinates for every object, grouped ones in canvas space.
    fn refresh_coords(&mut self) {
        for shape in self.document.objects.values_mut() {
            if shape.entity().group().is_none() {
                shape.entity_mut().set_coords();
            }
        }
        if let Selection::Group(group) = &mut self.selection {
            group.entity.set_coords();
            group.set_objects_coords(&mut self.document.objects);
        }
    }

    // ---- cursors ----

    fn set_cursor(&mut self, cursor: CursorIcon) -> CursorIcon {
        self.cursor = cursor;
        cursor
    }

    fn session_cursor(&self, transform: &CurrentTransform<Target>) -> CursorIcon {
        match transform.action {
            Action::Drag => self.options.move_cursor,
            Action::Rotate => self.options.rotation_cursor,
            Action::Scale | Action::ScaleX | Action::ScaleY => transform
                .handle
                .and_then(HandleKind::cursor)
                .unwrap_or(self.options.default_cursor),
        }
    }

    fn cursor_for(&self, pointer: Point, target: Option<Target>) -> CursorIcon {
        let Some(target) = target else {
            return self.options.default_cursor;
        };
        let grouped = match (target, &self.selection) {
            (Target::Object(id), Selection::Group(group)) => group.contains(id),
            _ => false,
        };
        let handle = if grouped {
            None
        } else {
            self.entity(target)
                .and_then(|entity| entity.find_target_corner(pointer))
        };
        match handle {
            None => self.options.hover_cursor,
            Some(HandleKind::Mtr) => self.options.rotation_cursor,
            Some(handle) => handle.cursor().unwrap_or(self.options.default_cursor),
        }
    }

    // ---- rendering ----

    /// Clear the surface and draw the whole scene.
    ///
    /// Ungrouped objects paint in z-order, then the active group on top,
    /// then the marquee overlay.
    pub fn render_all(&mut self, surface: &mut dyn Surface) {
        surface.clear(self.options.bounds());
        for shape in self.document.shapes_ordered() {
            if shape.entity().group().is_none() {
                shape.render(surface);
            }
        }
        if let Selection::Group(group) = &mut self.selection {
            group.render(surface, &self.document.objects);
        }
        if let Some(selector) = &self.group_selector {
            self.draw_selection(surface, selector.rect());
        }
    }

    fn draw_selection(&self, surface: &mut dyn Surface, rect: Rect) {
        surface.save();
        surface.set_fill_color(self.options.selection_color.into());
        surface.fill_rect(rect);
        surface.set_line_width(self.options.selection_line_width);
        surface.set_stroke_color(self.options.selection_border_color.into());
        surface.stroke_rect(rect);
        surface.restore();
    }
}

fn entity_contains(entity: &Entity, pointer: Point) -> bool {
    entity.contains_point(pointer) || entity.find_target_corner(pointer).is_some()
}
