//! Scene container and the per-tick update pipeline
//!
//! The tick order is fixed: layer resort, behavior phases (start, update,
//! late-update with physics integration), then collision detection and
//! resolution. Resorting first means a layer changed during the previous
//! tick can never desynchronize the ordered iteration; detecting last means
//! the sweep observes the tick's final positions.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};

use crate::physics::{Collider, Collision, PhysicalBody};
use crate::scene::object::{GameObject, ObjectHandle};
use crate::scene::render::RenderSink;
use crate::scene::SceneError;

/// Layer-ordered owner of all live game objects.
#[derive(Default)]
pub struct Scene {
    /// Kept sorted by layer; stable within a layer (insertion order).
    objects: Vec<ObjectHandle>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh object inside the scene and hand back its handle.
    pub fn spawn(&mut self) -> ObjectHandle {
        self.insert(GameObject::new())
    }

    /// Move a prepared object into the scene.
    pub fn insert(&mut self, object: GameObject) -> ObjectHandle {
        let layer = object.layer();
        let handle = Rc::new(RefCell::new(object));

        // Stable position: after every object with a layer <= the new one.
        let at = self
            .objects
            .partition_point(|existing| existing.borrow().layer() <= layer);
        self.objects.insert(at, Rc::clone(&handle));

        debug!("spawned object on layer {layer} ({} live)", self.objects.len());
        handle
    }

    /// Remove an object by handle. Returns whether it was present.
    pub fn remove(&mut self, handle: &ObjectHandle) -> bool {
        let before = self.objects.len();
        self.objects.retain(|existing| !Rc::ptr_eq(existing, handle));
        let removed = self.objects.len() != before;
        if removed {
            debug!("removed object ({} live)", self.objects.len());
        }
        removed
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate objects in layer order, as of the last resort pass.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectHandle> {
        self.objects.iter()
    }

    /// Re-sort objects whose layer changed since the last pass.
    ///
    /// A no-op when the ordering is intact. The sort is stable, so objects
    /// sharing a layer keep their relative (insertion) order.
    pub fn resort(&mut self) {
        let sorted = self
            .objects
            .windows(2)
            .all(|pair| pair[0].borrow().layer() <= pair[1].borrow().layer());
        if sorted {
            return;
        }

        trace!("layer order changed; resorting {} objects", self.objects.len());
        self.objects.sort_by_key(|object| object.borrow().layer());
    }

    /// Run one simulation tick.
    ///
    /// An error aborts the tick's remaining work; the scene structure stays
    /// intact and the next tick may be attempted normally.
    pub fn tick(&mut self, delta_time: f32) -> Result<(), SceneError> {
        self.resort();

        for object in &self.objects {
            let mut object = object.borrow_mut();
            if !object.is_started() {
                object.start()?;
            }
        }

        for object in &self.objects {
            object.borrow_mut().update(delta_time)?;
        }

        for object in &self.objects {
            object.borrow_mut().late_update(delta_time)?;
        }

        let contacts = self.detect_and_resolve();
        if contacts > 0 {
            trace!("resolved {contacts} contacts");
        }
        Ok(())
    }

    /// Submit every object to the sink, in layer order.
    pub fn render_into(&self, sink: &mut dyn RenderSink) {
        for object in &self.objects {
            let object = object.borrow();
            let transform = object.transform();
            let transform = transform.borrow();
            sink.submit(object.layer(), transform.model_matrix());
        }
    }

    /// O(n²) upper-triangular pair sweep over all colliders.
    ///
    /// Detection runs first over a consistent snapshot of positions; the
    /// responses (which may apply positional corrections) are dispatched
    /// only after every pair has been tested. Returns the contact count.
    fn detect_and_resolve(&self) -> usize {
        type Entry = (Rc<RefCell<Collider>>, Option<Rc<RefCell<PhysicalBody>>>);

        let mut entries: Vec<Entry> = Vec::new();
        for object in &self.objects {
            let object = object.borrow();
            if let Some(collider) = object.collider() {
                entries.push((collider, object.body()));
            }
        }

        let mut contacts: Vec<(usize, usize, Collision)> = Vec::new();
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                // Without a body on either side there is no receiver.
                if entries[i].1.is_none() && entries[j].1.is_none() {
                    continue;
                }

                let hit =
                    Collider::find_collision(&entries[i].0.borrow(), &entries[j].0.borrow());
                if let Some(collision) = hit {
                    contacts.push((i, j, collision));
                }
            }
        }

        for (i, j, collision) in &contacts {
            match (&entries[*i].1, &entries[*j].1) {
                (Some(first), Some(second)) => first
                    .borrow_mut()
                    .respond_to_collision_with(collision, &mut second.borrow_mut()),
                (Some(only), None) | (None, Some(only)) => {
                    only.borrow_mut().respond_to_collision(collision);
                }
                (None, None) => {}
            }
        }

        contacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::object::Behavior;
    use approx::assert_relative_eq;

    fn layers(scene: &Scene) -> Vec<usize> {
        scene.iter().map(|object| object.borrow().layer()).collect()
    }

    fn frictionless_body() -> PhysicalBody {
        let mut body = PhysicalBody::new();
        body.gravity = 0.0;
        body.moving_resistance = 0.0;
        body
    }

    #[test]
    fn objects_iterate_in_layer_order() {
        let mut scene = Scene::new();
        for layer in [3usize, 1, 2] {
            let object = scene.spawn();
            object.borrow_mut().set_layer(layer);
        }

        scene.resort();
        assert_eq!(layers(&scene), vec![1, 2, 3]);
    }

    #[test]
    fn layer_change_applies_at_the_resort_pass() {
        let mut scene = Scene::new();
        let mut handles = Vec::new();
        for layer in [3usize, 1, 2] {
            let object = scene.spawn();
            object.borrow_mut().set_layer(layer);
            handles.push(object);
        }
        scene.resort();
        assert_eq!(layers(&scene), vec![1, 2, 3]);

        // Mutate mid-"tick": ordering is untouched until the pass runs.
        handles[1].borrow_mut().set_layer(5);
        assert_eq!(layers(&scene), vec![5, 2, 3]);

        scene.resort();
        assert_eq!(layers(&scene), vec![2, 3, 5]);
    }

    #[test]
    fn removal_only_drops_the_named_object() {
        let mut scene = Scene::new();
        let keep = scene.spawn();
        let drop = scene.spawn();

        assert!(scene.remove(&drop));
        assert!(!scene.remove(&drop));
        assert_eq!(scene.len(), 1);
        assert!(Rc::ptr_eq(scene.iter().next().unwrap(), &keep));
    }

    #[test]
    fn tick_moves_bodies_by_velocity() {
        let mut scene = Scene::new();
        let object = scene.spawn();
        let body = object.borrow_mut().attach_body(frictionless_body());
        body.borrow_mut().set_velocity(Vec3::new(2.0, 0.0, 0.0));

        scene.tick(0.5).unwrap();

        let transform = object.borrow().transform();
        let position = transform.borrow().position();
        assert_relative_eq!(position, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn pair_without_any_body_is_skipped() {
        let mut scene = Scene::new();
        for x in [0.0f32, 0.5] {
            let object = scene.spawn();
            let mut object = object.borrow_mut();
            object.transform().borrow_mut().set_position(Vec3::new(x, 0.0, 0.0));
            object.attach_collider(Collider::sphere(1.0));
        }

        // Overlapping colliders but no receiver anywhere: nothing to do.
        scene.tick(0.1).unwrap();
    }

    #[test]
    fn single_body_pair_bounces_off_static_geometry() {
        let mut scene = Scene::new();

        let wall = scene.spawn();
        wall.borrow_mut()
            .attach_collider(Collider::cuboid(Vec3::new(2.0, 2.0, 2.0)));

        let ball = scene.spawn();
        let body = {
            let mut ball = ball.borrow_mut();
            ball.transform()
                .borrow_mut()
                .set_position(Vec3::new(1.4, 0.0, 0.0));
            ball.attach_collider(Collider::sphere(0.5));
            ball.attach_body(frictionless_body())
        };
        {
            let mut body = body.borrow_mut();
            body.collide_restitution = 1.0;
            body.set_velocity(Vec3::new(-1.0, 0.0, 0.0));
        }

        scene.tick(0.01).unwrap();

        // Elastic single-body response reflects the x velocity.
        assert_relative_eq!(body.borrow().velocity().x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn two_body_pair_exchanges_impulse() {
        let mut scene = Scene::new();
        let mut bodies = Vec::new();

        for (x, vx) in [(0.0f32, 1.0f32), (0.9, 0.0)] {
            let object = scene.spawn();
            let mut object = object.borrow_mut();
            object
                .transform()
                .borrow_mut()
                .set_position(Vec3::new(x, 0.0, 0.0));
            object.attach_collider(Collider::sphere(0.5));
            let body = object.attach_body(frictionless_body());
            {
                let mut body = body.borrow_mut();
                body.collide_restitution = 1.0;
                body.set_velocity(Vec3::new(vx, 0.0, 0.0));
            }
            bodies.push(body);
        }

        scene.tick(0.01).unwrap();

        // Equal masses, elastic: the mover hands its speed to the target.
        // One tick of drift remains on top of the exchanged velocities.
        assert!(bodies[0].borrow().velocity().x < 0.1);
        assert!(bodies[1].borrow().velocity().x > 0.9);
    }

    #[test]
    fn behavior_layer_change_lands_before_the_next_tick_sweep() {
        struct Promote;

        impl Behavior for Promote {
            fn on_update(
                &mut self,
                object: &mut GameObject,
                _dt: f32,
            ) -> Result<(), SceneError> {
                object.set_layer(9);
                Ok(())
            }
        }

        let mut scene = Scene::new();
        let first = scene.spawn();
        first.borrow_mut().set_layer(4);
        let second = scene.spawn();
        second.borrow_mut().push_behavior(Box::new(Promote));

        scene.resort();
        assert_eq!(layers(&scene), vec![0, 4]);

        scene.tick(0.1).unwrap();
        // The mutation happened mid-tick; the following tick's resort pass
        // observes it.
        scene.tick(0.1).unwrap();
        assert_eq!(layers(&scene), vec![4, 9]);
    }

    #[test]
    fn failed_tick_leaves_the_scene_reusable() {
        struct Fail;

        impl Behavior for Fail {
            fn on_update(&mut self, _o: &mut GameObject, _dt: f32) -> Result<(), SceneError> {
                Err(SceneError::Behavior("boom".to_string()))
            }
        }

        let mut scene = Scene::new();
        let faulty = scene.spawn();
        faulty.borrow_mut().push_behavior(Box::new(Fail));
        let mover = scene.spawn();
        let body = mover.borrow_mut().attach_body(frictionless_body());
        body.borrow_mut().set_velocity(Vec3::new(1.0, 0.0, 0.0));

        assert!(scene.tick(0.1).is_err());

        scene.remove(&faulty);
        assert!(scene.tick(0.1).is_ok());
    }
}
