//! Collider shapes and the separating-axis collision query
//!
//! Shapes are a closed enum: only boxes and spheres exist, so the SAT
//! routine dispatches with a `match` instead of trait objects. A collider
//! owns no transform; it holds a non-owning reference bound from outside
//! and silently degrades to the origin when that reference is absent or
//! expired.
//!
//! The query itself follows the classic narrow-phase recipe: a cheap
//! bounding-radius rejection, candidate axes gathered from both shapes,
//! per-axis interval projection, and a minimum-overlap tie-break. One
//! separating axis is enough to disprove a collision.

use std::rc::Weak;

use crate::foundation::math::{Quat, Vec3};
use crate::physics::collision::{interval_overlap, Collision};
use crate::scene::transform::TransformRef;

/// Closed set of supported collision shapes.
#[derive(Debug, Clone)]
pub enum ColliderShape {
    /// Oriented box described by half-extents and a local rotation offset.
    Box {
        /// Half the edge length along each local axis.
        half_extents: Vec3,
        /// Rotation applied on top of (or instead of) the bound transform's.
        rotation: Quat,
        /// When set, the bound transform's rotation is not composed in.
        ignore_transform_rotation: bool,
    },
    /// Sphere described by its radius.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
}

/// Shape bound to an externally supplied transform.
#[derive(Debug, Clone)]
pub struct Collider {
    shape: ColliderShape,
    transform: TransformRef,
    longest_diagonal: f32,
}

impl Collider {
    /// Axis-aligned box collider from full edge lengths.
    pub fn cuboid(size: Vec3) -> Self {
        Self::oriented_cuboid(size, Quat::identity())
    }

    /// Box collider with a local rotation offset.
    pub fn oriented_cuboid(size: Vec3, rotation: Quat) -> Self {
        let half_extents = size / 2.0;
        Self {
            longest_diagonal: half_extents.magnitude(),
            shape: ColliderShape::Box {
                half_extents,
                rotation,
                ignore_transform_rotation: false,
            },
            transform: Weak::new(),
        }
    }

    /// Sphere collider.
    pub fn sphere(radius: f32) -> Self {
        Self {
            longest_diagonal: radius,
            shape: ColliderShape::Sphere { radius },
            transform: Weak::new(),
        }
    }

    /// The shape this collider wraps.
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Bounding radius used by the broad rejection test.
    pub fn longest_diagonal(&self) -> f32 {
        self.longest_diagonal
    }

    /// Bind the transform this shape follows. Replaces any previous binding.
    pub fn bind_transform(&mut self, transform: TransformRef) {
        self.transform = transform;
    }

    /// Whether a live transform is currently bound.
    pub fn has_transform(&self) -> bool {
        self.transform.upgrade().is_some()
    }

    /// Stop composing the bound transform's rotation into box axes.
    pub fn disable_transform_rotation(&mut self) {
        if let ColliderShape::Box {
            ignore_transform_rotation,
            ..
        } = &mut self.shape
        {
            *ignore_transform_rotation = true;
        }
    }

    /// Resume composing the bound transform's rotation into box axes.
    pub fn enable_transform_rotation(&mut self) {
        if let ColliderShape::Box {
            ignore_transform_rotation,
            ..
        } = &mut self.shape
        {
            *ignore_transform_rotation = false;
        }
    }

    /// World position of the bound transform, or the origin without one.
    pub fn world_position(&self) -> Vec3 {
        match self.transform.upgrade() {
            Some(transform) => transform.borrow().world_position(),
            None => Vec3::zeros(),
        }
    }

    /// Pairwise separating-axis query.
    ///
    /// Symmetric in whether a hit is found; direction-sensitive in output:
    /// `Collision::direction` is `first`'s world position minus `second`'s.
    /// Pure with respect to both colliders, so repeated calls with unchanged
    /// inputs yield bit-identical results.
    pub fn find_collision(first: &Collider, second: &Collider) -> Option<Collision> {
        let direction = first.world_position() - second.world_position();
        let max_diagonal = first.longest_diagonal + second.longest_diagonal;

        // Necessary, not sufficient: shapes further apart than their
        // combined bounding radii cannot collide.
        if direction.magnitude_squared() > max_diagonal * max_diagonal {
            return None;
        }

        let mut axes = Vec::with_capacity(6);
        first.append_axes(&mut axes);
        second.append_axes(&mut axes);

        if axes.is_empty() {
            // Sphere against sphere: the only candidate axis is the line
            // between centers. Concentric spheres have no such line; any
            // axis separates nothing, so pick a fixed one.
            axes.push(direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::x));
        }

        let mut normal = Vec3::zeros();
        let mut min_overlap = f32::INFINITY;

        for axis in &axes {
            let overlap = interval_overlap(first.projection(axis), second.projection(axis))?;
            if overlap < min_overlap {
                min_overlap = overlap;
                normal = *axis;
            }
        }

        Some(Collision::new(direction, normal.abs(), min_overlap))
    }

    /// Append this shape's candidate separating axes, skipping exact
    /// bit-for-bit duplicates already present.
    ///
    /// Insertion order is preserved, which makes the minimum-overlap
    /// tie-break deterministic: the first collider's axes win ties.
    /// Near-duplicate axes from slightly different rotations do not
    /// collapse; they only add redundant, harmless projection work.
    fn append_axes(&self, axes: &mut Vec<Vec3>) {
        match &self.shape {
            ColliderShape::Sphere { .. } => {}
            ColliderShape::Box { .. } => {
                let rotator = self.rotator();
                for basis in [Vec3::x(), Vec3::y(), Vec3::z()] {
                    let axis = rotator * basis;
                    if !axes.iter().any(|known| bits_equal(known, &axis)) {
                        axes.push(axis);
                    }
                }
            }
        }
    }

    /// Projection interval of this shape onto `axis`.
    ///
    /// The endpoints are not guaranteed ordered; `interval_overlap`
    /// normalizes them.
    fn projection(&self, axis: &Vec3) -> (f32, f32) {
        let center = self.world_position().dot(axis);

        match &self.shape {
            ColliderShape::Sphere { radius } => (center - radius, center + radius),
            ColliderShape::Box { half_extents, .. } => {
                let mut half = *half_extents;
                if let Some(transform) = self.transform.upgrade() {
                    half.component_mul_assign(&transform.borrow().world_scale());
                }

                let rotator = self.rotator();
                let reach = (rotator * Vec3::new(half.x, 0.0, 0.0)).dot(axis).abs()
                    + (rotator * Vec3::new(0.0, half.y, 0.0)).dot(axis).abs()
                    + (rotator * Vec3::new(0.0, 0.0, half.z)).dot(axis).abs();

                (center - reach, center + reach)
            }
        }
    }

    /// Effective rotation of a box: its local offset, composed with the
    /// bound transform's world rotation unless the ignore flag is set.
    fn rotator(&self) -> Quat {
        match &self.shape {
            ColliderShape::Sphere { .. } => Quat::identity(),
            ColliderShape::Box {
                rotation,
                ignore_transform_rotation,
                ..
            } => match self.transform.upgrade() {
                Some(transform) if !ignore_transform_rotation => {
                    rotation * transform.borrow().world_rotation()
                }
                _ => *rotation,
            },
        }
    }
}

fn bits_equal(left: &Vec3, right: &Vec3) -> bool {
    left.x.to_bits() == right.x.to_bits()
        && left.y.to_bits() == right.y.to_bits()
        && left.z.to_bits() == right.z.to_bits()
}
