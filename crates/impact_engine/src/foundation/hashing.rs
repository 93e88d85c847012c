//! State hashing for change tracking
//!
//! Transforms (and anything else that wants a cheap "changed since last
//! commit" answer) fold their fields into a `u64` through [`StateHasher`].
//! The hasher is seeded with the previous state hash, so every mutation
//! shifts the value even when a field is later restored to the same number.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::foundation::math::{Quat, Vec3};

/// Incremental hasher over floating-point state.
///
/// Floats are hashed by bit pattern, so `0.0` and `-0.0` count as different
/// states. That is intentional: change tracking answers "was this touched",
/// not "is this numerically equal".
pub struct StateHasher {
    inner: DefaultHasher,
}

impl StateHasher {
    /// Create a hasher seeded with a previous state hash.
    pub fn seeded(seed: u64) -> Self {
        let mut inner = DefaultHasher::new();
        seed.hash(&mut inner);
        Self { inner }
    }

    /// Fold a scalar into the state.
    pub fn write_f32(&mut self, value: f32) {
        value.to_bits().hash(&mut self.inner);
    }

    /// Fold a vector into the state.
    pub fn write_vec3(&mut self, value: &Vec3) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    /// Fold a quaternion into the state.
    pub fn write_quat(&mut self, value: &Quat) {
        let coords = value.as_ref().coords;
        self.write_f32(coords.x);
        self.write_f32(coords.y);
        self.write_f32(coords.z);
        self.write_f32(coords.w);
    }

    /// Finish and return the state hash.
    pub fn finish(self) -> u64 {
        self.inner.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(seed: u64, value: f32) -> u64 {
        let mut hasher = StateHasher::seeded(seed);
        hasher.write_f32(value);
        hasher.finish()
    }

    #[test]
    fn same_seed_and_fields_hash_identically() {
        assert_eq!(hash_of(0, 1.25), hash_of(0, 1.25));
    }

    #[test]
    fn seed_participates_in_the_hash() {
        assert_ne!(hash_of(0, 1.25), hash_of(1, 1.25));
    }

    #[test]
    fn reverted_field_with_chained_seed_keeps_diverging() {
        let committed = hash_of(0, 1.0);
        let touched = hash_of(committed, 2.0);
        let reverted = hash_of(touched, 1.0);
        assert_ne!(reverted, committed);
    }
}
