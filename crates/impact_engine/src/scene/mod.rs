//! Scene graph: objects, components, and the per-tick update pipeline
//!
//! The scene is the sole owner of game objects; handles it gives out are
//! reference-counted but creation and removal go through the scene alone.
//! Objects own their components and carry a layer key that orders scene
//! iteration.

pub mod object;
pub mod render;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use object::{Behavior, GameObject, ObjectHandle};
pub use render::RenderSink;
pub use scene::Scene;
pub use transform::{Transform, TransformHandle, TransformRef};

use thiserror::Error;

/// Component categories an object can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Collision shape
    Collider,
    /// Velocity/force integrator
    PhysicalBody,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collider => write!(f, "collider"),
            Self::PhysicalBody => write!(f, "physical body"),
        }
    }
}

/// Configuration error raised at a component access site.
///
/// These are caller mistakes, never retried internally: the request has to
/// be fixed, not the engine state.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// The object has no component of the requested category
    #[error("object has no {0} component")]
    Missing(ComponentKind),
}

/// Failure raised while stepping a scene tick.
///
/// A failed tick aborts its remaining work; objects not yet processed stay
/// valid for the next tick attempt.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A component access precondition was violated
    #[error(transparent)]
    Component(#[from] ComponentError),

    /// A behavior reported a failure of its own
    #[error("behavior failure: {0}")]
    Behavior(String),
}
