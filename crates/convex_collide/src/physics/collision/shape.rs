//! Support-mapped collision shapes
//!
//! Shapes are stored in object space and never materialized as polygons:
//! every query talks to them through [`Shape::support`]. World placement is
//! applied on demand through [`WorldSpaceCollider`].

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Rot2, Vec2};
use super::primitives::{Aabb, BoundingSphere, SweptCapsule};
use super::transform::ColliderTransform;

/// Errors raised while building a collider
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ColliderError {
    /// A convex polygon needs at least one vertex
    #[error("convex polygon has no vertices")]
    EmptyPolygon,

    /// A composite collider needs at least one part
    #[error("{kind} has no parts")]
    EmptyComposite {
        /// Which composite was empty
        kind: &'static str,
    },

    /// A vertex has a NaN or infinite coordinate
    #[error("vertex {index} is not finite")]
    NonFiniteVertex {
        /// Index of the offending vertex
        index: usize,
    },

    /// Sphere radius below zero
    #[error("sphere radius is negative")]
    NegativeRadius,

    /// Sphere radius is NaN or infinite
    #[error("sphere radius is not finite")]
    NonFiniteRadius,
}

/// Shape kinds, all in object space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Disc around the origin; a zero radius makes a point
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Line segment between two endpoints
    Segment {
        /// First endpoint
        a: Vec2,
        /// Second endpoint
        b: Vec2,
    },
    /// Convex polygon given by its vertices (any order, interior points allowed)
    ConvexPolygon {
        /// Vertex list
        vertices: Vec<Vec2>,
    },
    /// Convex hull of several colliders: support is the farthest part support
    ConvexHull {
        /// Hull parts
        parts: Vec<Collider>,
    },
    /// Minkowski sum of several colliders: support is the sum of part supports
    MinkowskiSum {
        /// Summed parts
        parts: Vec<Collider>,
    },
}

impl Shape {
    /// A point guaranteed to be inside (or on) the shape
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Sphere { .. } => Vec2::zeros(),
            Self::Segment { a, b } => (a + b) * 0.5,
            Self::ConvexPolygon { vertices } => {
                vertices.iter().sum::<Vec2>() / vertices.len() as f32
            }
            Self::ConvexHull { parts } => {
                parts.iter().map(Collider::center).sum::<Vec2>() / parts.len() as f32
            }
            Self::MinkowskiSum { parts } => parts.iter().map(Collider::center).sum(),
        }
    }

    /// Farthest point of the shape along `direction`
    ///
    /// Ties keep the first candidate, so the answer is deterministic. The
    /// direction does not need to be normalized.
    pub fn support(&self, direction: Vec2) -> Vec2 {
        match self {
            Self::Sphere { radius } => {
                utils::try_normalize(direction).map_or_else(Vec2::zeros, |unit| unit * *radius)
            }
            Self::Segment { a, b } => {
                if (b - a).dot(&direction) > 0.0 { *b } else { *a }
            }
            Self::ConvexPolygon { vertices } => farthest(vertices.iter().copied(), direction),
            Self::ConvexHull { parts } => {
                farthest(parts.iter().map(|part| part.support(direction)), direction)
            }
            Self::MinkowskiSum { parts } => parts.iter().map(|part| part.support(direction)).sum(),
        }
    }

    fn validate(&self) -> Result<(), ColliderError> {
        match self {
            Self::Sphere { radius } => {
                if !radius.is_finite() {
                    return Err(ColliderError::NonFiniteRadius);
                }
                if *radius < 0.0 {
                    return Err(ColliderError::NegativeRadius);
                }
            }
            Self::Segment { a, b } => {
                if let Some(index) = [a, b].iter().position(|v| !utils::is_finite(**v)) {
                    return Err(ColliderError::NonFiniteVertex { index });
                }
            }
            Self::ConvexPolygon { vertices } => {
                if vertices.is_empty() {
                    return Err(ColliderError::EmptyPolygon);
                }
                if let Some(index) = vertices.iter().position(|v| !utils::is_finite(*v)) {
                    return Err(ColliderError::NonFiniteVertex { index });
                }
            }
            Self::ConvexHull { parts } => {
                if parts.is_empty() {
                    return Err(ColliderError::EmptyComposite { kind: "convex hull" });
                }
            }
            Self::MinkowskiSum { parts } => {
                if parts.is_empty() {
                    return Err(ColliderError::EmptyComposite { kind: "minkowski sum" });
                }
            }
        }
        Ok(())
    }
}

fn farthest<I: Iterator<Item = Vec2>>(mut candidates: I, direction: Vec2) -> Vec2 {
    let Some(first) = candidates.next() else {
        return Vec2::zeros();
    };
    candidates.fold(first, |max, candidate| {
        if direction.dot(&(candidate - max)) > 0.0 { candidate } else { max }
    })
}

/// Object-space bounds sampled once from the four axis-aligned supports
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBounds {
    /// Tight object-space box
    pub aabb: Aabb,
    /// Sphere around the box
    pub sphere: BoundingSphere,
}

impl LocalBounds {
    fn sample(shape: &Shape) -> Self {
        let max_x = shape.support(Vec2::x()).x;
        let min_x = shape.support(-Vec2::x()).x;
        let max_y = shape.support(Vec2::y()).y;
        let min_y = shape.support(-Vec2::y()).y;

        let aabb = Aabb::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y));
        let sphere = BoundingSphere::new(aabb.center(), aabb.extents().norm());
        Self { aabb, sphere }
    }
}

/// An immutable collider: a shape plus its cached object-space bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Shape", into = "Shape")]
pub struct Collider {
    shape: Shape,
    bounds: LocalBounds,
}

impl Collider {
    fn from_shape(shape: Shape) -> Self {
        let bounds = LocalBounds::sample(&shape);
        Self { shape, bounds }
    }

    /// Build a collider from any shape, validating it first
    pub fn try_from_shape(shape: Shape) -> Result<Self, ColliderError> {
        shape.validate()?;
        Ok(Self::from_shape(shape))
    }

    /// Sphere of the given radius centered on the object origin
    ///
    /// The radius should be non-negative and finite; use [`Collider::try_sphere`]
    /// for unchecked input.
    pub fn sphere(radius: f32) -> Self {
        Self::from_shape(Shape::Sphere { radius })
    }

    /// Sphere with radius validation
    pub fn try_sphere(radius: f32) -> Result<Self, ColliderError> {
        Self::try_from_shape(Shape::Sphere { radius })
    }

    /// Zero-radius sphere
    pub fn point() -> Self {
        Self::sphere(0.0)
    }

    /// Line segment between `a` and `b`
    pub fn segment(a: Vec2, b: Vec2) -> Self {
        Self::from_shape(Shape::Segment { a, b })
    }

    /// Convex polygon from a vertex list
    pub fn convex_polygon(vertices: impl Into<Vec<Vec2>>) -> Result<Self, ColliderError> {
        Self::try_from_shape(Shape::ConvexPolygon { vertices: vertices.into() })
    }

    /// Convex hull of the given colliders
    pub fn convex_hull(parts: impl Into<Vec<Collider>>) -> Result<Self, ColliderError> {
        Self::try_from_shape(Shape::ConvexHull { parts: parts.into() })
    }

    /// Minkowski sum of the given colliders
    pub fn minkowski_sum(parts: impl Into<Vec<Collider>>) -> Result<Self, ColliderError> {
        Self::try_from_shape(Shape::MinkowskiSum { parts: parts.into() })
    }

    /// Axis-aligned rectangle with one corner on the object origin
    pub fn rect(width: f32, height: f32) -> Self {
        Self::from_shape(Shape::ConvexPolygon {
            vertices: vec![
                Vec2::zeros(),
                Vec2::new(width, 0.0),
                Vec2::new(width, height),
                Vec2::new(0.0, height),
            ],
        })
    }

    /// Axis-aligned rectangle centered on the object origin
    pub fn centered_rect(half_width: f32, half_height: f32) -> Self {
        Self::from_shape(Shape::ConvexPolygon {
            vertices: vec![
                Vec2::new(-half_width, -half_height),
                Vec2::new(half_width, -half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(-half_width, half_height),
            ],
        })
    }

    /// Capsule: a segment swept by a sphere
    pub fn capsule(a: Vec2, b: Vec2, radius: f32) -> Self {
        Self::from_shape(Shape::MinkowskiSum {
            parts: vec![Self::segment(a, b), Self::sphere(radius)],
        })
    }

    /// The underlying shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Cached object-space bounds
    pub fn local_bounds(&self) -> &LocalBounds {
        &self.bounds
    }

    /// Object-space center
    pub fn center(&self) -> Vec2 {
        self.shape.center()
    }

    /// Object-space support point
    pub fn support(&self, direction: Vec2) -> Vec2 {
        self.shape.support(direction)
    }

    /// Place this collider in world space for a query
    pub fn to_world_space(&self, transform: &ColliderTransform) -> WorldSpaceCollider<'_> {
        WorldSpaceCollider::new(self, transform)
    }

    /// World-space support point for `direction` given in world space
    pub fn world_support(&self, transform: &ColliderTransform, direction: Vec2) -> Vec2 {
        self.to_world_space(transform).support(direction)
    }

    /// World-space center
    pub fn world_center(&self, transform: &ColliderTransform) -> Vec2 {
        transform.transform_point(self.center())
    }

    /// World-space bounding sphere; the radius grows with the largest scale factor
    pub fn bounding_sphere(&self, transform: &ColliderTransform) -> BoundingSphere {
        BoundingSphere::new(
            transform.transform_point(self.bounds.sphere.center),
            self.bounds.sphere.radius * transform.max_scale(),
        )
    }

    /// World-space box around the transformed object-space box
    pub fn aabb(&self, transform: &ColliderTransform) -> Aabb {
        let local = &self.bounds.aabb;
        let corners = [
            local.from,
            Vec2::new(local.to.x, local.from.y),
            local.to,
            Vec2::new(local.from.x, local.to.y),
        ];
        let first = transform.transform_point(corners[0]);
        corners[1..]
            .iter()
            .fold(Aabb::new(first, first), |aabb, corner| aabb.grow(transform.transform_point(*corner)))
    }

    /// Box covering the collider over a straight move by `movement`
    pub fn swept_aabb(&self, transform: &ColliderTransform, movement: Vec2) -> Aabb {
        let start = self.aabb(transform);
        start.union(&start.translated(movement))
    }

    /// Capsule covering the bounding sphere over a straight move by `movement`
    pub fn swept_capsule(&self, transform: &ColliderTransform, movement: Vec2) -> SweptCapsule {
        let sphere = self.bounding_sphere(transform);
        SweptCapsule::new(sphere.center, sphere.center + movement, sphere.radius)
    }
}

impl TryFrom<Shape> for Collider {
    type Error = ColliderError;

    fn try_from(shape: Shape) -> Result<Self, Self::Error> {
        Self::try_from_shape(shape)
    }
}

impl From<Collider> for Shape {
    fn from(collider: Collider) -> Self {
        collider.shape
    }
}

/// A collider placed in world space for the duration of one query
///
/// Caches the rotation so repeated support calls do not recompute it.
#[derive(Debug, Clone, Copy)]
pub struct WorldSpaceCollider<'a> {
    collider: &'a Collider,
    rotation: Rot2,
    translation: Vec2,
    scale: Vec2,
}

impl<'a> WorldSpaceCollider<'a> {
    /// Place `collider` with `transform`
    pub fn new(collider: &'a Collider, transform: &ColliderTransform) -> Self {
        Self {
            collider,
            rotation: transform.rotation_matrix(),
            translation: transform.translation,
            scale: transform.scale,
        }
    }

    /// The placed collider
    pub fn collider(&self) -> &'a Collider {
        self.collider
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        self.rotation * self.scale.component_mul(&self.collider.center()) + self.translation
    }

    /// World-space support point
    ///
    /// The world direction is rotated into object space with the inverse
    /// rotation; the local support is mapped back through rotation and
    /// translation. Scale enters as the linear map `R * S`, whose support is
    /// `R * S * support(S * R^-1 * d)`, which reduces to the plain rotation
    /// path for unit scale.
    pub fn support(&self, direction: Vec2) -> Vec2 {
        let local_direction = self
            .scale
            .component_mul(&self.rotation.inverse_transform_vector(&direction));
        let local_support = self.collider.support(local_direction);
        self.rotation * self.scale.component_mul(&local_support) + self.translation
    }
}
