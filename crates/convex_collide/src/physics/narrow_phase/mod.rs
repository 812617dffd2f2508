//! Narrow-phase queries on placed colliders
//!
//! Every query takes two colliders with their transforms and builds
//! world-space views on the fly. Queries are pure apart from logging and an
//! optional [`QueryRecorder`], so they can run concurrently from any thread.
//!
//! Normals returned by [`Collision::penetration`] and
//! [`Collision::continuous`] point from B toward A and are unit length
//! unless the configuration is degenerate (then they are zero).

pub mod gjk;
pub mod mpr;
pub mod ray_cast;
pub mod simplex;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, QueryConfig};
use crate::debug::{QueryKind, QueryRecorder};
use crate::foundation::math::Vec2;
use crate::physics::collision::{Collider, ColliderTransform, WorldSpaceCollider};

/// Support mapping of `minuend - subtrahend`
#[derive(Debug, Clone, Copy)]
pub struct MinkowskiDifference<'a> {
    minuend: WorldSpaceCollider<'a>,
    subtrahend: WorldSpaceCollider<'a>,
}

impl<'a> MinkowskiDifference<'a> {
    /// Difference of two placed colliders
    pub fn new(minuend: WorldSpaceCollider<'a>, subtrahend: WorldSpaceCollider<'a>) -> Self {
        Self { minuend, subtrahend }
    }

    /// Shape the other is subtracted from
    pub fn minuend(&self) -> &WorldSpaceCollider<'a> {
        &self.minuend
    }

    /// Shape being subtracted
    pub fn subtrahend(&self) -> &WorldSpaceCollider<'a> {
        &self.subtrahend
    }

    /// Interior point: difference of the centers
    pub fn center(&self) -> Vec2 {
        self.minuend.center() - self.subtrahend.center()
    }

    /// Support point of the difference in `direction`
    pub fn support(&self, direction: Vec2) -> Vec2 {
        self.minuend.support(direction) - self.subtrahend.support(-direction)
    }
}

/// Penetration query result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Penetration {
    /// Unit contact normal from B toward A
    pub normal: Vec2,
    /// Positive when overlapping, negative when separated
    pub depth: f32,
    /// False when the refinement cap ran out before the tolerance was met
    pub converged: bool,
}

/// How a ray cast finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RayCastStatus {
    /// Reached the boundary within tolerance
    Converged,
    /// The shapes never meet during the step
    Missed,
    /// Ran out of iterations; the hit is conservative
    IterationCap,
}

/// Continuous collision result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeOfImpact {
    /// Whether the shapes meet during the step
    pub hit: bool,
    /// Fraction of the step at first contact in `[0, 1]`; `1` on a miss
    pub toi: f32,
    /// Unit contact normal from B toward A, zero when the shapes start
    /// overlapping or on a miss
    pub normal: Vec2,
    /// How the cast finished
    pub status: RayCastStatus,
}

/// Narrow-phase query context
///
/// Holds the tolerances and iteration caps; the free functions in this
/// module use [`QueryConfig::default`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Collision {
    config: QueryConfig,
}

impl Collision {
    /// Create a query context, rejecting invalid tolerances or caps
    pub fn new(config: QueryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Euclidean distance between A and B, 0 when they touch or overlap
    pub fn distance(
        &self,
        a: &Collider,
        transform_a: &ColliderTransform,
        b: &Collider,
        transform_b: &ColliderTransform,
    ) -> f32 {
        self.distance_recorded(a, transform_a, b, transform_b, &mut ())
    }

    /// [`Collision::distance`] reporting its iterations to `recorder`
    pub fn distance_recorded<R: QueryRecorder>(
        &self,
        a: &Collider,
        transform_a: &ColliderTransform,
        b: &Collider,
        transform_b: &ColliderTransform,
        recorder: &mut R,
    ) -> f32 {
        recorder.begin(QueryKind::Distance);
        let difference =
            MinkowskiDifference::new(a.to_world_space(transform_a), b.to_world_space(transform_b));
        gjk::distance(&difference, &self.config, recorder)
    }

    /// True when A and B overlap or touch
    pub fn intersects(
        &self,
        a: &Collider,
        transform_a: &ColliderTransform,
        b: &Collider,
        transform_b: &ColliderTransform,
    ) -> bool {
        self.intersects_recorded(a, transform_a, b, transform_b, &mut ())
    }

    /// [`Collision::intersects`] reporting its portals to `recorder`
    pub fn intersects_recorded<R: QueryRecorder>(
        &self,
        a: &Collider,
        transform_a: &ColliderTransform,
        b: &Collider,
        transform_b: &ColliderTransform,
        recorder: &mut R,
    ) -> bool {
        recorder.begin(QueryKind::Intersection);
        let difference =
            MinkowskiDifference::new(b.to_world_space(transform_b), a.to_world_space(transform_a));
        mpr::intersects(&difference, &self.config, recorder)
    }

    /// Contact normal and signed depth of A against B
    pub fn penetration(
        &self,
        a: &Collider,
        transform_a: &ColliderTransform,
        b: &Collider,
        transform_b: &ColliderTransform,
    ) -> Penetration {
        self.penetration_recorded(a, transform_a, b, transform_b, &mut ())
    }

    /// [`Collision::penetration`] reporting its portals and contact to `recorder`
    pub fn penetration_recorded<R: QueryRecorder>(
        &self,
        a: &Collider,
        transform_a: &ColliderTransform,
        b: &Collider,
        transform_b: &ColliderTransform,
        recorder: &mut R,
    ) -> Penetration {
        recorder.begin(QueryKind::Penetration);
        let difference =
            MinkowskiDifference::new(b.to_world_space(transform_b), a.to_world_space(transform_a));
        mpr::penetration(&difference, &self.config, recorder)
    }

    /// First time of impact while A moves by `movement_a` and B by `movement_b`
    ///
    /// Rotation is held fixed over the step; only translation is swept.
    pub fn continuous(
        &self,
        a: &Collider,
        transform_a: &ColliderTransform,
        movement_a: Vec2,
        b: &Collider,
        transform_b: &ColliderTransform,
        movement_b: Vec2,
    ) -> TimeOfImpact {
        self.continuous_recorded(a, transform_a, movement_a, b, transform_b, movement_b, &mut ())
    }

    /// [`Collision::continuous`] reporting its iterations to `recorder`
    pub fn continuous_recorded<R: QueryRecorder>(
        &self,
        a: &Collider,
        transform_a: &ColliderTransform,
        movement_a: Vec2,
        b: &Collider,
        transform_b: &ColliderTransform,
        movement_b: Vec2,
        recorder: &mut R,
    ) -> TimeOfImpact {
        recorder.begin(QueryKind::Continuous);
        let difference =
            MinkowskiDifference::new(a.to_world_space(transform_a), b.to_world_space(transform_b));
        ray_cast::time_of_impact(&difference, movement_b - movement_a, &self.config, recorder)
    }
}

/// [`Collision::distance`] with default tolerances
pub fn distance(
    a: &Collider,
    transform_a: &ColliderTransform,
    b: &Collider,
    transform_b: &ColliderTransform,
) -> f32 {
    Collision::default().distance(a, transform_a, b, transform_b)
}

/// [`Collision::intersects`] with default tolerances
pub fn intersects(
    a: &Collider,
    transform_a: &ColliderTransform,
    b: &Collider,
    transform_b: &ColliderTransform,
) -> bool {
    Collision::default().intersects(a, transform_a, b, transform_b)
}

/// [`Collision::penetration`] with default tolerances
pub fn penetration(
    a: &Collider,
    transform_a: &ColliderTransform,
    b: &Collider,
    transform_b: &ColliderTransform,
) -> Penetration {
    Collision::default().penetration(a, transform_a, b, transform_b)
}

/// [`Collision::continuous`] with default tolerances
pub fn continuous(
    a: &Collider,
    transform_a: &ColliderTransform,
    movement_a: Vec2,
    b: &Collider,
    transform_b: &ColliderTransform,
    movement_b: Vec2,
) -> TimeOfImpact {
    Collision::default().continuous(a, transform_a, movement_a, b, transform_b, movement_b)
}
