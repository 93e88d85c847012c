//! Game object: component owner and behavior host
//!
//! An object always owns exactly one transform, created with it and living
//! as long as it does. A collider and a physical body are optional; when
//! attached they are bound to the object's transform through a non-owning
//! reference. Behaviors are boxed scripts stepped by the scene in the
//! start/update/late-update phases.

use std::cell::RefCell;
use std::rc::Rc;

use crate::physics::{Collider, PhysicalBody};
use crate::scene::transform::{Transform, TransformHandle};
use crate::scene::{ComponentError, ComponentKind, SceneError};

/// Shared handle to a scene-owned object.
pub type ObjectHandle = Rc<RefCell<GameObject>>;

/// Script hook stepped once per tick in each behavior phase.
///
/// Every hook receives the owning object and may mutate its components,
/// including the layer key; layer changes take effect at the next resort
/// pass. Errors abort the remaining work of the current tick.
pub trait Behavior {
    /// Runs once, on the first tick after the object enters the scene.
    fn on_start(&mut self, object: &mut GameObject) -> Result<(), SceneError> {
        let _ = object;
        Ok(())
    }

    /// Runs every tick before physics integration.
    fn on_update(&mut self, object: &mut GameObject, delta_time: f32) -> Result<(), SceneError> {
        let _ = (object, delta_time);
        Ok(())
    }

    /// Runs every tick after `on_update`, still before integration.
    fn on_late_update(
        &mut self,
        object: &mut GameObject,
        delta_time: f32,
    ) -> Result<(), SceneError> {
        let _ = (object, delta_time);
        Ok(())
    }
}

/// Component container with a layer-based ordering key.
pub struct GameObject {
    layer: usize,
    transform: TransformHandle,
    collider: Option<Rc<RefCell<Collider>>>,
    body: Option<Rc<RefCell<PhysicalBody>>>,
    behaviors: Vec<Box<dyn Behavior>>,
    started: bool,
}

impl Default for GameObject {
    fn default() -> Self {
        Self::new()
    }
}

impl GameObject {
    /// Object on layer 0 with an identity transform and no other components.
    pub fn new() -> Self {
        Self {
            layer: 0,
            transform: Rc::new(RefCell::new(Transform::new())),
            collider: None,
            body: None,
            behaviors: Vec::new(),
            started: false,
        }
    }

    /// Ordering key for scene iteration.
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Change the ordering key.
    ///
    /// Safe mid-tick: only this field is written; the scene re-sorts in its
    /// dedicated pass before the next iteration over the objects.
    pub fn set_layer(&mut self, layer: usize) {
        self.layer = layer;
    }

    /// Handle to the object's transform.
    pub fn transform(&self) -> TransformHandle {
        Rc::clone(&self.transform)
    }

    /// Attach a collider, binding it to this object's transform.
    /// Replaces any previous collider.
    pub fn attach_collider(&mut self, mut collider: Collider) -> Rc<RefCell<Collider>> {
        collider.bind_transform(Rc::downgrade(&self.transform));
        let handle = Rc::new(RefCell::new(collider));
        self.collider = Some(Rc::clone(&handle));
        handle
    }

    /// Attach a physical body, binding it to this object's transform.
    /// Replaces any previous body.
    pub fn attach_body(&mut self, mut body: PhysicalBody) -> Rc<RefCell<PhysicalBody>> {
        body.bind_transform(Rc::downgrade(&self.transform));
        let handle = Rc::new(RefCell::new(body));
        self.body = Some(Rc::clone(&handle));
        handle
    }

    /// Remove the collider, if any.
    pub fn detach_collider(&mut self) {
        self.collider = None;
    }

    /// Remove the physical body, if any.
    pub fn detach_body(&mut self) {
        self.body = None;
    }

    /// The collider, if one is attached.
    pub fn collider(&self) -> Option<Rc<RefCell<Collider>>> {
        self.collider.as_ref().map(Rc::clone)
    }

    /// The physical body, if one is attached.
    pub fn body(&self) -> Option<Rc<RefCell<PhysicalBody>>> {
        self.body.as_ref().map(Rc::clone)
    }

    /// The collider, or a configuration error naming the missing category.
    pub fn require_collider(&self) -> Result<Rc<RefCell<Collider>>, ComponentError> {
        self.collider()
            .ok_or(ComponentError::Missing(ComponentKind::Collider))
    }

    /// The body, or a configuration error naming the missing category.
    pub fn require_body(&self) -> Result<Rc<RefCell<PhysicalBody>>, ComponentError> {
        self.body()
            .ok_or(ComponentError::Missing(ComponentKind::PhysicalBody))
    }

    /// Add a behavior script; it starts on the next tick.
    pub fn push_behavior(&mut self, behavior: Box<dyn Behavior>) {
        self.behaviors.push(behavior);
    }

    /// Whether the start phase already ran for this object.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start phase: runs each behavior's `on_start` once.
    ///
    /// The object counts as started even when a behavior fails, so a
    /// misconfigured script surfaces its error once instead of being
    /// retried every tick.
    pub(crate) fn start(&mut self) -> Result<(), SceneError> {
        self.started = true;
        self.run_behaviors(|behavior, object| behavior.on_start(object))
    }

    /// Update phase: behaviors only.
    pub(crate) fn update(&mut self, delta_time: f32) -> Result<(), SceneError> {
        self.run_behaviors(|behavior, object| behavior.on_update(object, delta_time))
    }

    /// Late-update phase: behaviors, then body integration, then the
    /// transform commit. The commit runs last so `has_changed` reflects
    /// everything this tick did to the transform.
    pub(crate) fn late_update(&mut self, delta_time: f32) -> Result<(), SceneError> {
        self.run_behaviors(|behavior, object| behavior.on_late_update(object, delta_time))?;

        if let Some(body) = &self.body {
            let mut body = body.borrow_mut();
            body.apply_forces(delta_time);
            body.apply_velocity(delta_time);
        }

        self.transform.borrow_mut().commit();
        Ok(())
    }

    fn run_behaviors(
        &mut self,
        mut step: impl FnMut(&mut dyn Behavior, &mut GameObject) -> Result<(), SceneError>,
    ) -> Result<(), SceneError> {
        // Behaviors are moved out for the duration of the pass so each one
        // can borrow the object mutably.
        let mut behaviors = std::mem::take(&mut self.behaviors);

        let mut result = Ok(());
        for behavior in &mut behaviors {
            result = step(behavior.as_mut(), self);
            if result.is_err() {
                break;
            }
        }

        // Keep behaviors a script pushed during the pass; they go after the
        // existing ones.
        behaviors.append(&mut self.behaviors);
        self.behaviors = behaviors;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    struct Nudge {
        delta: Vec3,
    }

    impl Behavior for Nudge {
        fn on_update(&mut self, object: &mut GameObject, _dt: f32) -> Result<(), SceneError> {
            object.transform().borrow_mut().translate(self.delta);
            Ok(())
        }
    }

    struct Failing;

    impl Behavior for Failing {
        fn on_start(&mut self, _object: &mut GameObject) -> Result<(), SceneError> {
            Err(SceneError::Behavior("intentional".to_string()))
        }
    }

    #[test]
    fn missing_components_are_configuration_errors() {
        let object = GameObject::new();
        assert!(matches!(
            object.require_collider(),
            Err(ComponentError::Missing(ComponentKind::Collider))
        ));
        assert!(matches!(
            object.require_body(),
            Err(ComponentError::Missing(ComponentKind::PhysicalBody))
        ));
    }

    #[test]
    fn attached_components_are_bound_to_the_object_transform() {
        let mut object = GameObject::new();
        object
            .transform()
            .borrow_mut()
            .set_position(Vec3::new(2.0, 0.0, 0.0));

        let collider = object.attach_collider(Collider::sphere(1.0));
        let body = object.attach_body(PhysicalBody::new());

        assert_eq!(
            collider.borrow().world_position(),
            Vec3::new(2.0, 0.0, 0.0)
        );
        assert!(body.borrow().has_transform());
    }

    #[test]
    fn detaching_components_drops_them() {
        let mut object = GameObject::new();
        object.attach_collider(Collider::sphere(1.0));
        object.detach_collider();
        assert!(object.collider().is_none());
    }

    #[test]
    fn behaviors_can_mutate_their_object() {
        let mut object = GameObject::new();
        object.push_behavior(Box::new(Nudge {
            delta: Vec3::new(1.0, 0.0, 0.0),
        }));

        object.update(0.1).unwrap();
        object.update(0.1).unwrap();

        assert_eq!(
            object.transform().borrow().position(),
            Vec3::new(2.0, 0.0, 0.0)
        );
    }

    #[test]
    fn failing_start_surfaces_once_and_marks_started() {
        let mut object = GameObject::new();
        object.push_behavior(Box::new(Failing));

        assert!(object.start().is_err());
        assert!(object.is_started());
    }

    #[test]
    fn late_update_integrates_body_and_commits_transform() {
        let mut object = GameObject::new();
        let body = object.attach_body(PhysicalBody::new());
        {
            let mut body = body.borrow_mut();
            body.gravity = 0.0;
            body.moving_resistance = 0.0;
            body.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        }

        object.late_update(0.5).unwrap();

        let transform = object.transform();
        let transform = transform.borrow();
        assert_eq!(transform.position(), Vec3::new(0.5, 0.0, 0.0));
        // Commit ran after the move.
        assert!(!transform.has_changed());
    }
}
