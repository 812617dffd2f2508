//! # Convex Collide
//!
//! 2D collision detection for convex shapes described by support functions.
//!
//! ## Features
//!
//! - **Shapes**: spheres, segments, convex polygons, convex hulls and
//!   Minkowski sums of other colliders
//! - **Narrow phase**: GJK distance, MPR intersection and penetration depth,
//!   GJK ray cast time of impact for moving shapes
//! - **Broad phase**: swept AABB sort-and-sweep, collision layers and
//!   swept-capsule culling
//! - **Diagnostics**: optional per-query recorder of simplices and portals
//!
//! ## Quick Start
//!
//! ```rust
//! use convex_collide::prelude::*;
//!
//! let bullet = Collider::point();
//! let wall = Collider::segment(Vec2::new(10.0, -5.0), Vec2::new(10.0, 5.0));
//!
//! let impact = continuous(
//!     &bullet,
//!     &ColliderTransform::identity(),
//!     Vec2::new(20.0, 0.0),
//!     &wall,
//!     &ColliderTransform::identity(),
//!     Vec2::zeros(),
//! );
//! assert!(impact.hit);
//! assert!((impact.toi - 0.5).abs() < 1e-3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod debug;
pub mod foundation;
pub mod physics;

/// Common imports for collision users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, QueryConfig},
        debug::{QueryRecorder, QueryTrace},
        foundation::math::{Rot2, Vec2},
        physics::{
            Aabb, BoundingSphere, BroadPhase, Collider, ColliderError, ColliderTransform,
            Collision, CollisionLayers, CollisionPair, Penetration, Proxy, RayCastStatus, Shape,
            SweptCapsule, TimeOfImpact, continuous, distance, intersects, penetration,
            sweep_and_prune,
        },
    };
}
