//! Collider transform: translation, rotation and non-uniform scale
//!
//! Object space maps to world space in the order scale -> rotate -> translate.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Rot2, Vec2};

/// Placement of a collider in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderTransform {
    /// Position in world space
    pub translation: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Scale factors in object space
    ///
    /// Scale is applied exactly to the world support (`R * S * support(S * R⁻¹ * d)`)
    /// and world center, not only to the bounding volumes.
    pub scale: Vec2,
}

impl Default for ColliderTransform {
    fn default() -> Self {
        Self {
            translation: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl ColliderTransform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only translation
    pub fn new(translation: Vec2) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Create a transform with translation and rotation
    pub fn with_rotation(translation: Vec2, rotation: f32) -> Self {
        Self {
            translation,
            rotation,
            ..Default::default()
        }
    }

    /// The same transform with `scale` replaced
    pub fn with_scale(self, scale: Vec2) -> Self {
        Self { scale, ..self }
    }

    /// Create a transform from all three components
    pub fn from_parts(translation: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// The same transform moved by `movement`
    pub fn translated(&self, movement: Vec2) -> Self {
        Self {
            translation: self.translation + movement,
            ..*self
        }
    }

    /// Rotation as a unit complex number
    pub fn rotation_matrix(&self) -> Rot2 {
        Rot2::new(self.rotation)
    }

    /// Largest absolute scale factor
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs())
    }

    /// Map an object-space point to world space
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.rotation_matrix() * self.scale.component_mul(&point) + self.translation
    }
}
