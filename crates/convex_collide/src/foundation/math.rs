//! Math utilities and types
//!
//! Provides the 2D math types every query in this crate is written against.

pub use nalgebra::{Vector2, UnitComplex};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D rotation type
pub type Rot2 = UnitComplex<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Math utility functions
pub mod utils {
    use super::Vec2;

    /// Positive normal of a vector: `(x, y)` maps to `(-y, x)`
    #[inline]
    pub fn perp(v: Vec2) -> Vec2 {
        Vec2::new(-v.y, v.x)
    }

    /// 2D cross product (z component of the 3D cross product)
    #[inline]
    pub fn cross(a: Vec2, b: Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }

    /// Strict sign: `1`, `-1`, or `0` for zero (and NaN)
    #[inline]
    pub fn sign(value: f32) -> i8 {
        if value > 0.0 {
            1
        } else if value < 0.0 {
            -1
        } else {
            0
        }
    }

    /// True when both values are strictly positive or both strictly negative
    #[inline]
    pub fn same_sign(a: f32, b: f32) -> bool {
        (a > 0.0 && b > 0.0) || (a < 0.0 && b < 0.0)
    }

    /// Normalize `v`, or `None` when it is too short to carry a direction
    #[inline]
    pub fn try_normalize(v: Vec2) -> Option<Vec2> {
        v.try_normalize(f32::MIN_POSITIVE)
    }

    /// True when every component is finite
    pub fn is_finite(v: Vec2) -> bool {
        v.x.is_finite() && v.y.is_finite()
    }
}
