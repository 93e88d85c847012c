//! Velocity/force integrator bound to a transform
//!
//! A body accumulates continuous forces over a tick, integrates them in
//! `apply_forces`, and commits the resulting velocity into its transform in
//! `apply_velocity`. Collision records are consumed synchronously through
//! the two `respond_to_collision*` entry points; that is the only seam
//! through which gameplay logic observes a collision.
//!
//! Bodies only translate. There is no angular velocity and no torque.

use std::rc::Weak;

use crate::config::PhysicsConfig;
use crate::foundation::math::{clamp_components, sign, Vec3};
use crate::physics::collision::Collision;
use crate::scene::transform::TransformRef;

/// Damping ceiling; `moving_resistance` at or above 1 would blow up the
/// damping denominator, so it is clamped strictly below.
const RESISTANCE_CEILING: f32 = 1.0 - 1e-4;

/// Translating rigid body with impulse-based collision response.
#[derive(Debug, Clone)]
pub struct PhysicalBody {
    velocity: Vec3,
    forces_accumulator: Vec3,
    max_velocity: Option<Vec3>,
    transform: TransformRef,

    /// Body mass. Shares impulse and positional correction between partners.
    pub mass: f32,
    /// Downward acceleration applied along -Y every integration step.
    pub gravity: f32,
    /// Energy retention in collisions; clamped into [0, 1] at use.
    pub collide_restitution: f32,
    /// Velocity damping fraction; clamped below 1 at use.
    pub moving_resistance: f32,
}

impl Default for PhysicalBody {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalBody {
    /// Body with the engine's stock tunables and zero velocity.
    pub fn new() -> Self {
        Self {
            velocity: Vec3::zeros(),
            forces_accumulator: Vec3::zeros(),
            max_velocity: None,
            transform: Weak::new(),
            mass: 1.0,
            gravity: 10.0,
            collide_restitution: 0.8,
            moving_resistance: 0.075,
        }
    }

    /// Body tuned from a [`PhysicsConfig`].
    pub fn from_config(config: &PhysicsConfig) -> Self {
        let mut body = Self::new();
        body.gravity = config.gravity;
        body.collide_restitution = config.collide_restitution;
        body.moving_resistance = config.moving_resistance;
        if let Some(max) = config.max_velocity {
            body.limit_velocity(Vec3::from(max));
        }
        body
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Overwrite the current velocity, subject to the configured clamp.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.clamp_velocity();
    }

    /// Bind the transform this body moves. Replaces any previous binding.
    pub fn bind_transform(&mut self, transform: TransformRef) {
        self.transform = transform;
    }

    /// Whether a live transform is currently bound.
    pub fn has_transform(&self) -> bool {
        self.transform.upgrade().is_some()
    }

    /// Accumulate a continuous force for the next `apply_forces`.
    pub fn report_force(&mut self, direction: Vec3, magnitude: f32) {
        self.forces_accumulator += magnitude / self.mass * direction;
    }

    /// Apply an instantaneous impulse straight to the velocity.
    pub fn apply_force(&mut self, direction: Vec3, magnitude: f32, delta_time: f32) {
        self.velocity += delta_time * magnitude / self.mass * direction;
        self.clamp_velocity();
    }

    /// Per-tick integration: gravity, damping, accumulated forces, clamp.
    ///
    /// The accumulator is zeroed afterwards. With zero gravity, zero
    /// resistance and an empty accumulator the velocity is left untouched.
    pub fn apply_forces(&mut self, delta_time: f32) {
        self.velocity.y -= delta_time * self.mass * self.gravity;

        let resistance = self.moving_resistance.clamp(0.0, RESISTANCE_CEILING);
        if resistance > 0.0 {
            let retained = 1.0 - delta_time * resistance / (1.0 - resistance);
            self.velocity *= retained.max(0.0);
        }

        self.velocity += delta_time * self.forces_accumulator;
        self.clamp_velocity();

        self.forces_accumulator = Vec3::zeros();
    }

    /// Commit `velocity * delta_time` into the bound transform's position.
    ///
    /// Runs after `apply_forces` within the same tick. Without a live
    /// transform binding this is a no-op.
    pub fn apply_velocity(&mut self, delta_time: f32) {
        if let Some(transform) = self.transform.upgrade() {
            transform.borrow_mut().translate(self.velocity * delta_time);
        }
    }

    /// Install a component-wise velocity clamp. Magnitudes are stored
    /// absolute-valued.
    pub fn limit_velocity(&mut self, max: Vec3) {
        self.max_velocity = Some(max.abs());
        self.clamp_velocity();
    }

    /// Remove the velocity clamp.
    pub fn unleash_velocity(&mut self) {
        self.max_velocity = None;
    }

    /// Two-body collision response; `self` is the first shape of the pair.
    ///
    /// Approaching bodies (relative velocity against `collision.direction`)
    /// exchange an impulse along the contact normal with the standard
    /// restitution formula. Separating bodies that still interpenetrate get
    /// a positional correction split by the opposing body's mass.
    pub fn respond_to_collision_with(&mut self, collision: &Collision, other: &mut PhysicalBody) {
        let relative_velocity = self.velocity - other.velocity;
        let closing = relative_velocity.dot(&collision.direction);

        if closing < 0.0 {
            let restitution =
                self.collide_restitution.clamp(0.0, 1.0) * other.collide_restitution.clamp(0.0, 1.0);
            let inverse_mass = 1.0 / self.mass + 1.0 / other.mass;
            let impulse =
                ((-1.0 - restitution) * relative_velocity).dot(&collision.normal) / inverse_mass;

            if impulse != 0.0 {
                self.apply_force(collision.normal, impulse, 1.0);
                other.apply_force(collision.normal, -impulse, 1.0);
            }
        } else if closing > 0.0 {
            let correction = collision.overlap / (self.mass + other.mass) * collision.normal;
            let heading = -sign(self.velocity.dot(&collision.normal));

            self.correct_position(correction * (other.mass * -heading));
            other.correct_position(correction * (self.mass * heading));
        }
    }

    /// Single-body response against an immovable environment shape:
    /// reflects the velocity along the contact normal, scaled by
    /// `-(1 + restitution)`.
    pub fn respond_to_collision(&mut self, collision: &Collision) {
        let restitution = self.collide_restitution.clamp(0.0, 1.0);
        let reflected = (-1.0 - restitution) * self.velocity;
        self.apply_force(collision.normal, reflected.dot(&collision.normal) * self.mass, 1.0);
    }

    fn correct_position(&mut self, delta: Vec3) {
        if let Some(transform) = self.transform.upgrade() {
            transform.borrow_mut().translate(delta);
        }
    }

    fn clamp_velocity(&mut self) {
        if let Some(max) = self.max_velocity {
            self.velocity = clamp_components(self.velocity, max);
        }
    }
}
