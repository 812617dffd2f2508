//! Bounding primitives for broad-phase culling
//!
//! Provides bounding spheres, axis-aligned boxes and swept capsules. All of
//! them are conservative: they may report overlap for shapes that do not
//! touch (the narrow phase settles those), but never miss a real contact.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// A bounding sphere for collision culling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    /// The center position of the sphere
    pub center: Vec2,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).norm_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }
}

/// An axis-aligned bounding box spanning `from` (minimum corner) to `to` (maximum corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub from: Vec2,
    /// Maximum corner
    pub to: Vec2,
}

impl Aabb {
    /// Create a new box from its minimum and maximum corners
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    /// Extend the box to contain `point`
    pub fn grow(self, point: Vec2) -> Self {
        Self {
            from: self.from.inf(&point),
            to: self.to.sup(&point),
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            from: self.from.inf(&other.from),
            to: self.to.sup(&other.to),
        }
    }

    /// Box moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.from + offset, self.to + offset)
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec2 {
        (self.from + self.to) * 0.5
    }

    /// Get the extents (half-size) of the box
    pub fn extents(&self) -> Vec2 {
        (self.to - self.from) * 0.5
    }

    /// Check if this box contains a point (boundary included)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.from.x && point.x <= self.to.x &&
        point.y >= self.from.y && point.y <= self.to.y
    }

    /// Check if this box overlaps another (touching counts)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.from.x <= other.to.x && self.to.x >= other.from.x &&
        self.from.y <= other.to.y && self.to.y >= other.from.y
    }
}

/// The area a bounding sphere covers while moving along a straight line
///
/// `a` is the start center, `b` the end center, `r` the radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweptCapsule {
    /// Segment start
    pub a: Vec2,
    /// Segment end
    pub b: Vec2,
    /// Radius around the segment
    pub r: f32,
}

impl SweptCapsule {
    /// Create a capsule from its segment and radius
    pub fn new(a: Vec2, b: Vec2, r: f32) -> Self {
        Self { a, b, r }
    }

    /// Two capsules intersect when their core segments are no farther apart than the radius sum
    pub fn intersects(&self, other: &SweptCapsule) -> bool {
        let distance_squared = distance_squared_segment_segment(self.a, self.b, other.a, other.b);
        let r = self.r + other.r;
        distance_squared <= r * r
    }

    /// Distance between the two capsule surfaces (negative when overlapping)
    pub fn distance(&self, other: &SweptCapsule) -> f32 {
        distance_squared_segment_segment(self.a, self.b, other.a, other.b).sqrt() - self.r - other.r
    }
}

/// Squared distance between segments `p1-q1` and `p2-q2`
///
/// Clamped closest-point computation from Ericson, "Real-Time Collision
/// Detection" 5.1.9. Either segment may degenerate into a point.
pub fn distance_squared_segment_segment(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> f32 {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;

    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let a_is_zero = a <= f32::EPSILON;
    let e_is_zero = e <= f32::EPSILON;

    // Both segments degenerate into points
    if a_is_zero && e_is_zero {
        return r.norm_squared();
    }

    let (s, t) = if a_is_zero {
        // First segment degenerates into a point
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e_is_zero {
            // Second segment degenerates into a point
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            // Parallel segments: pick s = 0 and let t resolve it
            let s = if denom == 0.0 { 0.0 } else { ((b * f - c * e) / denom).clamp(0.0, 1.0) };
            let t = (b * s + f) / e;

            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    (c1 - c2).norm_squared()
}
