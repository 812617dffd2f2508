//! Collision layer filtering for broad-phase pairs
//!
//! Each proxy sits on one or more layers and carries a mask of the layers it
//! wants to hit. A pair survives only when both sides accept each other.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision groups as bit flags
    ///
    /// The groups carry no meaning of their own; callers assign them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        /// Group 0
        const GROUP_0 = 1 << 0;
        /// Group 1
        const GROUP_1 = 1 << 1;
        /// Group 2
        const GROUP_2 = 1 << 2;
        /// Group 3
        const GROUP_3 = 1 << 3;
        /// Group 4
        const GROUP_4 = 1 << 4;
        /// Group 5
        const GROUP_5 = 1 << 5;
        /// Group 6
        const GROUP_6 = 1 << 6;
        /// Group 7
        const GROUP_7 = 1 << 7;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

impl CollisionLayers {
    /// Check if two proxies should collide given their layers and masks
    ///
    /// A's layer must be in B's mask and B's layer must be in A's mask.
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }

    /// Union of several layers
    pub fn mask(layers: &[CollisionLayers]) -> CollisionLayers {
        layers.iter().fold(Self::empty(), |acc, &layer| acc | layer)
    }
}
