//! Physics module for collision detection
//!
//! Split the usual way into a broad phase that culls pairs cheaply from
//! swept bounding volumes and a narrow phase that runs exact support-function
//! queries on the survivors.

pub mod broad_phase;
pub mod collision;
pub mod collision_layers;
pub mod narrow_phase;

#[cfg(test)]
mod tests;

pub use broad_phase::{BroadPhase, CollisionPair, Proxy, sweep_and_prune};
pub use collision::{
    Aabb,
    BoundingSphere,
    Collider,
    ColliderError,
    ColliderTransform,
    Shape,
    SweptCapsule,
    WorldSpaceCollider,
};
pub use collision_layers::CollisionLayers;
pub use narrow_phase::{
    Collision,
    Penetration,
    RayCastStatus,
    TimeOfImpact,
    continuous,
    distance,
    intersects,
    penetration,
};
