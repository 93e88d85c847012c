//! # Impact Engine
//!
//! A scene-graph physics core: separating-axis collision detection between
//! heterogeneous shapes, impulse-based response, and the per-tick update
//! pipeline that discovers colliding pairs and routes the results to their
//! owning bodies.
//!
//! ## Features
//!
//! - **SAT narrow phase**: box and sphere colliders, minimum-overlap
//!   contact normals, broad bounding-radius rejection
//! - **Impulse response**: two-body restitution exchange and single-body
//!   reflection off static geometry
//! - **Scene pipeline**: layer-ordered objects, behavior scripts, fixed
//!   phase ordering per tick
//! - **Hierarchical transforms**: parent-relative world resolution with
//!   hash-based change tracking
//!
//! Deliberately out of scope: continuous collision detection, broad-phase
//! spatial partitioning, contact manifolds, and rotational dynamics. The
//! pair sweep is O(n²) by design.
//!
//! ## Quick Start
//!
//! ```rust
//! use impact_engine::prelude::*;
//!
//! let mut scene = Scene::new();
//!
//! let floor = scene.spawn();
//! floor
//!     .borrow_mut()
//!     .attach_collider(Collider::cuboid(Vec3::new(20.0, 1.0, 20.0)));
//!
//! let ball = scene.spawn();
//! {
//!     let mut ball = ball.borrow_mut();
//!     ball.transform().borrow_mut().set_position(Vec3::new(0.0, 5.0, 0.0));
//!     ball.attach_collider(Collider::sphere(0.5));
//!     ball.attach_body(PhysicalBody::new());
//! }
//!
//! scene.tick(1.0 / 60.0).expect("tick");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;

mod engine;

pub use engine::Simulation;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{ConfigError, PhysicsConfig, SimulationConfig},
        foundation::{
            math::{Mat4, Quat, Vec3},
            time::Timer,
        },
        physics::{Collider, ColliderShape, Collision, PhysicalBody},
        scene::{
            Behavior, ComponentError, GameObject, ObjectHandle, RenderSink, Scene, SceneError,
            Transform, TransformHandle,
        },
        Simulation,
    };
}
