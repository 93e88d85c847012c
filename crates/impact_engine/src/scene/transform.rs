//! Hierarchical transform node with change tracking
//!
//! A transform resolves its world-space values by walking its parent chain:
//! positions add, rotations compose, scales multiply component-wise. The
//! parent link is non-owning and re-validated on every use; an expired or
//! absent parent terminates the recursion.
//!
//! Change tracking is hash based. Every mutator folds the new field values
//! into a running state hash seeded with the previous one, so a position
//! that is moved and then moved back before the next [`Transform::commit`]
//! still reads as changed. `commit` recomputes the hash fresh from the
//! fields and snapshots it; consumers that cache derived data (model
//! matrices, projections) read [`Transform::has_changed`] between commits.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::hashing::StateHasher;
use crate::foundation::math::{Mat4, Quat, Vec3};

/// Shared handle to a transform.
pub type TransformHandle = Rc<RefCell<Transform>>;

/// Non-owning reference to a transform, checked for liveness on every use.
pub type TransformRef = Weak<RefCell<Transform>>;

/// Position, rotation and scale node with an optional parent link.
#[derive(Debug)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    parent: TransformRef,
    current_hash: u64,
    committed_hash: u64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Create an identity transform with no parent.
    pub fn new() -> Self {
        let position = Vec3::zeros();
        let rotation = Quat::identity();
        let scale = Vec3::new(1.0, 1.0, 1.0);
        let hash = Self::fresh_hash(&position, &rotation, &scale);
        Self {
            position,
            rotation,
            scale,
            parent: Weak::new(),
            current_hash: hash,
            committed_hash: hash,
        }
    }

    /// Create a transform at a position, otherwise identity.
    pub fn from_position(position: Vec3) -> Self {
        let mut transform = Self::new();
        transform.set_position(position);
        transform
    }

    /// Local position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Local scale.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the local position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.touch();
    }

    /// Add a delta to the local position.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.touch();
    }

    /// Set the local rotation.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.touch();
    }

    /// Set the local scale.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.touch();
    }

    /// Link this transform under a parent.
    ///
    /// The link is non-owning; the parent chain must stay acyclic, which is
    /// the caller's responsibility (no cycle detection is performed).
    pub fn set_parent(&mut self, parent: TransformRef) {
        self.parent = parent;
    }

    /// Remove the parent link.
    pub fn clear_parent(&mut self) {
        self.parent = Weak::new();
    }

    /// World-space position: parent world position plus local position.
    pub fn world_position(&self) -> Vec3 {
        match self.parent.upgrade() {
            Some(parent) => parent.borrow().world_position() + self.position,
            None => self.position,
        }
    }

    /// World-space rotation: local rotation composed with the parent's.
    pub fn world_rotation(&self) -> Quat {
        match self.parent.upgrade() {
            Some(parent) => self.rotation * parent.borrow().world_rotation(),
            None => self.rotation,
        }
    }

    /// World-space scale: parent world scale times local scale.
    pub fn world_scale(&self) -> Vec3 {
        match self.parent.upgrade() {
            Some(parent) => parent.borrow().world_scale().component_mul(&self.scale),
            None => self.scale,
        }
    }

    /// Local model matrix: translate, then rotate, then scale.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Whether any field was mutated since the last [`Transform::commit`].
    pub fn has_changed(&self) -> bool {
        self.current_hash != self.committed_hash
    }

    /// Snapshot the current state as the committed one.
    ///
    /// Invoked exactly once per tick by the owning lifecycle step, after all
    /// mutations for that tick are done.
    pub fn commit(&mut self) {
        self.current_hash = Self::fresh_hash(&self.position, &self.rotation, &self.scale);
        self.committed_hash = self.current_hash;
    }

    fn touch(&mut self) {
        let mut hasher = StateHasher::seeded(self.current_hash);
        hasher.write_vec3(&self.position);
        hasher.write_quat(&self.rotation);
        hasher.write_vec3(&self.scale);
        self.current_hash = hasher.finish();
    }

    fn fresh_hash(position: &Vec3, rotation: &Quat, scale: &Vec3) -> u64 {
        let mut hasher = StateHasher::seeded(0);
        hasher.write_vec3(position);
        hasher.write_quat(rotation);
        hasher.write_vec3(scale);
        hasher.finish()
    }
}
