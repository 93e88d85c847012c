//! Collision detection and rigid-body response
//!
//! Narrow-phase separating-axis queries over a closed shape set, plus the
//! impulse-based integrator that consumes their results. Pair discovery
//! lives in the scene update loop; this module is pure shape and velocity
//! math.

pub mod body;
pub mod collider;
pub mod collision;

pub use body::PhysicalBody;
pub use collider::{Collider, ColliderShape};
pub use collision::Collision;
