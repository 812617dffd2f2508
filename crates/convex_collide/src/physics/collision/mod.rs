//! Collider model, placement and bounding volumes
//!
//! Colliders are defined in model space and placed with a
//! [`ColliderTransform`] at query time; nothing here caches world data.

pub mod primitives;
pub mod shape;
pub mod transform;

pub use primitives::{Aabb, BoundingSphere, SweptCapsule, distance_squared_segment_segment};
pub use shape::{Collider, ColliderError, LocalBounds, Shape, WorldSpaceCollider};
pub use transform::ColliderTransform;
