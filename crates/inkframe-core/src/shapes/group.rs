//! Transient group used for multi-selection.
//!
//! A group does not own its members: it keeps their ids and rewrites their
//! positions relative to the group center while it exists. Disbanding
//! composes the group transform back into each member.

use super::{Entity, ObjectId, ObjectMap, ObjectOptions, ShapeTrait};
use crate::canvas::{CanvasError, CanvasResult};
use crate::surface::Surface;
use kurbo::Point;
use std::collections::HashMap;
use uuid::Uuid;

/// A set of objects manipulated as a single unit.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) id: ObjectId,
    pub entity: Entity,
    members: Vec<ObjectId>,
    /// Each member's `has_controls` before it joined.
    saved_controls: HashMap<ObjectId, bool>,
}

impl Group {
    /// Group existing objects. Duplicate ids are ignored.
    pub fn new(members: &[ObjectId], objects: &mut ObjectMap) -> CanvasResult<Self> {
        let mut unique: Vec<ObjectId> = Vec::with_capacity(members.len());
        for &id in members {
            if !objects.contains_key(&id) {
                return Err(CanvasError::ObjectNotFound(id));
            }
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(CanvasError::EmptyGroup);
        }

        let mut group = Self {
            id: Uuid::new_v4(),
            entity: Entity::new(ObjectOptions {
                fill: None,
                ..Default::default()
            }),
            members: unique,
            saved_controls: HashMap::new(),
        };
        group.calc_bounds(objects);
        group.update_objects_coords(objects);
        group.entity.set_coords();
        log::debug!("created group {} with {} members", group.id, group.members.len());
        Ok(group)
    }

    pub fn members(&self) -> &[ObjectId] {
        &self.members
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains(&id)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether `point` lies inside the group's rotated box.
    pub fn contains_point(&self, point: Point) -> bool {
        self.entity.contains_point(point)
    }

    /// Fit the group box around every member's bounding quad.
    fn calc_bounds(&mut self, objects: &mut ObjectMap) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for id in &self.members {
            let Some(shape) = objects.get_mut(id) else {
                continue;
            };
            let entity = shape.entity_mut();
            entity.set_coords();
            let Some(coords) = entity.coords() else {
                continue;
            };
            for p in coords.bounding_quad().points() {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
        }

        if !min_x.is_finite() {
            return;
        }
        let width = max_x - min_x;
        let height = max_y - min_y;
        self.entity.width = width;
        self.entity.height = height;
        self.entity.left = min_x + width / 2.0;
        self.entity.top = min_y + height / 2.0;
    }

    /// Make member positions relative to the group center and hide their controls.
    fn update_objects_coords(&mut self, objects: &mut ObjectMap) {
        let group_left = self.entity.left;
        let group_top = self.entity.top;
        for &id in &self.members {
            let Some(shape) = objects.get_mut(&id) else {
                continue;
            };
            let entity = shape.entity_mut();
            if entity.group != Some(self.id) {
                entity.left -= group_left;
                entity.top -= group_top;
                self.saved_controls.insert(id, entity.controls.has_controls);
                entity.controls.has_controls = false;
                entity.group = Some(self.id);
            }
        }
        self.set_objects_coords(objects);
    }

    /// Absolute state of a member: its relative placement composed with the
    /// group's rotation, scale and position.
    pub fn compose_member(&self, member: &Entity) -> Entity {
        let group = &self.entity;
        let (sin, cos) = group.angle_radians().sin_cos();
        let rotated_top = cos * member.top + sin * member.left;
        let rotated_left = -sin * member.top + cos * member.left;

        let mut absolute = member.clone();
        absolute.angle += group.angle;
        absolute.left = group.left + rotated_left * group.scale_x();
        absolute.top = group.top + rotated_top * group.scale_y();
        absolute.set_scale_and_flip(
            member.scale_x() * group.scale_x(),
            member.scale_y() * group.scale_y(),
            member.flip_x(),
            member.flip_y(),
        );
        absolute
    }

    /// Refresh each member's cached coordinates in canvas space.
    pub fn set_objects_coords(&self, objects: &mut ObjectMap) {
        for id in &self.members {
            if let Some(shape) = objects.get_mut(id) {
                let coords = self.compose_member(shape.entity()).compute_coords();
                shape.entity_mut().set_cached_coords(coords);
            }
        }
    }

    /// Write the composed transform back into a member and detach it.
    fn restore_object_state(&mut self, id: ObjectId, objects: &mut ObjectMap) {
        let Some(shape) = objects.get_mut(&id) else {
            log::warn!("group {} lost member {id}", self.id);
            return;
        };
        let mut absolute = self.compose_member(shape.entity());
        if let Some(has_controls) = self.saved_controls.remove(&id) {
            absolute.controls.has_controls = has_controls;
        }
        absolute.set_active(false);
        absolute.group = None;
        absolute.set_coords();
        *shape.entity_mut() = absolute;
    }

    fn restore_all(&mut self, objects: &mut ObjectMap) {
        for id in self.members.clone() {
            self.restore_object_state(id, objects);
        }
    }

    /// Reset rotation and scale so the group can be refitted around its members.
    fn reset_transform(&mut self) {
        self.entity.angle = 0.0;
        self.entity.set_scale_and_flip(1.0, 1.0, false, false);
    }

    /// Re-derive the group box after a membership change.
    fn refit(&mut self, objects: &mut ObjectMap) {
        self.reset_transform();
        if self.members.is_empty() {
            return;
        }
        self.calc_bounds(objects);
        self.update_objects_coords(objects);
        self.entity.set_coords();
    }

    /// Add an object and refit the group around all members.
    pub fn add_with_update(&mut self, id: ObjectId, objects: &mut ObjectMap) -> CanvasResult<()> {
        if !objects.contains_key(&id) {
            return Err(CanvasError::ObjectNotFound(id));
        }
        self.restore_all(objects);
        if !self.members.contains(&id) {
            self.members.push(id);
        }
        self.refit(objects);
        log::debug!("added {id} to group {}", self.id);
        Ok(())
    }

    /// Remove an object and refit the group around the rest.
    pub fn remove_with_update(&mut self, id: ObjectId, objects: &mut ObjectMap) -> CanvasResult<()> {
        if !self.members.contains(&id) {
            return Err(CanvasError::ObjectNotFound(id));
        }
        self.restore_all(objects);
        self.members.retain(|&m| m != id);
        if let Some(shape) = objects.get_mut(&id) {
            shape.entity_mut().set_active(false);
        }
        self.refit(objects);
        log::debug!("removed {id} from group {}", self.id);
        Ok(())
    }

    /// Dissolve the group, returning members to absolute coordinates.
    pub fn destroy(mut self, objects: &mut ObjectMap) -> Vec<ObjectId> {
        self.restore_all(objects);
        log::debug!("disbanded group {}", self.id);
        self.members
    }

    /// Mark every member active so its border is drawn.
    pub fn activate_all_objects(&self, objects: &mut ObjectMap) {
        for id in &self.members {
            if let Some(shape) = objects.get_mut(id) {
                shape.entity_mut().set_active(true);
            }
        }
    }

    /// Render members inside the group transform, then the group's own decoration.
    pub fn render(&mut self, surface: &mut dyn Surface, objects: &ObjectMap) {
        surface.save();
        self.entity.transform(surface);
        for id in &self.members {
            if let Some(shape) = objects.get(id) {
                shape.render_in_group(surface);
            }
        }
        if self.entity.is_active() {
            self.entity.draw_borders(surface, true);
            self.entity.draw_controls(surface, true);
        }
        surface.restore();
        self.entity.set_coords();
    }
}

impl ShapeTrait for Group {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{RectOptions, Rectangle, Shape};

    const EPS: f64 = 1e-9;

    fn add_rect(objects: &mut ObjectMap, options: RectOptions) -> ObjectId {
        let mut rect = Rectangle::new(options);
        rect.entity.set_coords();
        let id = rect.id;
        objects.insert(id, Shape::Rectangle(rect));
        id
    }

    #[test]
    fn test_bounds_cover_members() {
        let mut objects = ObjectMap::new();
        let a = add_rect(&mut objects, RectOptions::new(50.0, 50.0, 20.0, 20.0));
        let b = add_rect(&mut objects, RectOptions::new(150.0, 100.0, 20.0, 20.0));
        let group = Group::new(&[a, b], &mut objects).unwrap();

        // Members span 39..161 horizontally and 39..111 vertically
        assert!((group.entity.left - 100.0).abs() < EPS);
        assert!((group.entity.top - 75.0).abs() < EPS);
        assert!((group.entity.width - 122.0).abs() < EPS);
        assert!((group.entity.height - 72.0).abs() < EPS);
        assert_eq!(group.size(), 2);
        assert!(group.contains(a));
        assert!(group.contains_point(Point::new(100.0, 75.0)));
        assert!(group.contains_point(Point::new(45.0, 45.0)));
        assert!(!group.contains_point(Point::new(170.0, 75.0)));
    }

    #[test]
    fn test_contains_point_follows_rotation() {
        let mut objects = ObjectMap::new();
        let a = add_rect(&mut objects, RectOptions::new(50.0, 50.0, 20.0, 20.0));
        let b = add_rect(&mut objects, RectOptions::new(150.0, 50.0, 20.0, 20.0));
        let mut group = Group::new(&[a, b], &mut objects).unwrap();
        assert!(group.contains_point(Point::new(140.0, 50.0)));

        group.entity.angle = 90.0;
        group.entity.set_coords();
        // The long axis now runs vertically through the center
        assert!(group.contains_point(Point::new(100.0, 100.0)));
        assert!(!group.contains_point(Point::new(140.0, 50.0)));
    }

    #[test]
    fn test_members_become_relative() {
        let mut objects = ObjectMap::new();
        let a = add_rect(&mut objects, RectOptions::new(50.0, 50.0, 20.0, 20.0));
        let b = add_rect(&mut objects, RectOptions::new(150.0, 100.0, 20.0, 20.0));
        let group = Group::new(&[a, b], &mut objects).unwrap();

        let member = objects[&a].entity();
        assert!((member.left + 50.0).abs() < EPS);
        assert!((member.top + 25.0).abs() < EPS);
        assert!(!member.controls.has_controls);
        assert_eq!(member.group(), Some(group.id));

        // Cached coordinates stay in canvas space
        let coords = member.coords().unwrap();
        assert!((coords.tl.position.x - 39.0).abs() < EPS);
    }

    #[test]
    fn test_disband_restores_members() {
        let mut objects = ObjectMap::new();
        let mut options = RectOptions::new(100.0, 80.0, 30.0, 10.0);
        options.object = options.object.with_angle(30.0).with_scale(1.5, 0.5);
        let a = add_rect(&mut objects, options);
        let b = add_rect(&mut objects, RectOptions::new(300.0, 300.0, 10.0, 10.0));
        objects.get_mut(&b).unwrap().entity_mut().controls.has_controls = false;

        let before_a = objects[&a].state();
        let before_b = objects[&b].state();

        let group = Group::new(&[a, b], &mut objects).unwrap();
        let members = group.destroy(&mut objects);
        assert_eq!(members, vec![a, b]);

        for (id, before) in [(a, before_a), (b, before_b)] {
            let after = objects[&id].state();
            assert!((after.left - before.left).abs() < EPS);
            assert!((after.top - before.top).abs() < EPS);
            assert!((after.angle - before.angle).abs() < EPS);
            assert!((after.scale_x - before.scale_x).abs() < EPS);
            assert!((after.scale_y - before.scale_y).abs() < EPS);
        }
        assert!(objects[&a].entity().controls.has_controls);
        assert!(!objects[&b].entity().controls.has_controls);
        assert_eq!(objects[&a].entity().group(), None);
    }

    #[test]
    fn test_disband_composes_group_transform() {
        let mut objects = ObjectMap::new();
        let a = add_rect(&mut objects, RectOptions::new(0.0, 0.0, 10.0, 10.0));
        let b = add_rect(&mut objects, RectOptions::new(100.0, 0.0, 10.0, 10.0));
        let mut group = Group::new(&[a, b], &mut objects).unwrap();

        group.entity.angle = 90.0;
        group.entity.set_scale_x(2.0);
        group.entity.set_scale_y(2.0);
        group.destroy(&mut objects);

        // b sat 50 to the right of the center; a quarter turn moves it below
        let b_entity = objects[&b].entity();
        assert!((b_entity.left - 50.0).abs() < 1e-6);
        assert!((b_entity.top - 100.0).abs() < 1e-6);
        assert!((b_entity.angle - 90.0).abs() < EPS);
        assert!((b_entity.scale_x() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_add_and_remove_with_update() {
        let mut objects = ObjectMap::new();
        let a = add_rect(&mut objects, RectOptions::new(0.0, 0.0, 10.0, 10.0));
        let b = add_rect(&mut objects, RectOptions::new(100.0, 0.0, 10.0, 10.0));
        let c = add_rect(&mut objects, RectOptions::new(200.0, 0.0, 10.0, 10.0));
        let mut group = Group::new(&[a, b], &mut objects).unwrap();

        group.add_with_update(c, &mut objects).unwrap();
        assert_eq!(group.size(), 3);
        assert!((group.entity.left - 100.0).abs() < EPS);

        group.remove_with_update(c, &mut objects).unwrap();
        assert_eq!(group.size(), 2);
        assert!((group.entity.left - 50.0).abs() < EPS);
        let c_entity = objects[&c].entity();
        assert_eq!(c_entity.group(), None);
        assert!((c_entity.left - 200.0).abs() < EPS);
        assert!(!c_entity.is_active());

        assert!(matches!(
            group.remove_with_update(c, &mut objects),
            Err(CanvasError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_missing_member_is_an_error() {
        let mut objects = ObjectMap::new();
        let a = add_rect(&mut objects, RectOptions::new(0.0, 0.0, 10.0, 10.0));
        let missing = Uuid::new_v4();
        assert!(matches!(
            Group::new(&[a, missing], &mut objects),
            Err(CanvasError::ObjectNotFound(id)) if id == missing
        ));
        assert!(matches!(Group::new(&[], &mut objects), Err(CanvasError::EmptyGroup)));
    }

    #[test]
    fn test_member_coords_follow_group_move() {
        let mut objects = ObjectMap::new();
        let a = add_rect(&mut objects, RectOptions::new(0.0, 0.0, 10.0, 10.0));
        let b = add_rect(&mut objects, RectOptions::new(100.0, 0.0, 10.0, 10.0));
        let mut group = Group::new(&[a, b], &mut objects).unwrap();

        group.entity.left += 30.0;
        group.set_objects_coords(&mut objects);
        let member = objects[&a].entity();
        assert!(member.contains_point(Point::new(30.0, 0.0)));
        assert!(!member.contains_point(Point::new(0.0, 0.0)));
    }
}
