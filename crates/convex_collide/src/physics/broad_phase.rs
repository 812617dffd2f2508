//! Broad phase for swept colliders
//!
//! Two-stage culling: sort-and-sweep over swept AABBs, then layer filtering
//! and a swept-capsule test. Surviving pairs go to the narrow phase. Nothing
//! is kept between calls; every frame starts from the proxies it is given.

use log::debug;

use crate::foundation::math::Vec2;
use crate::physics::collision::{Aabb, Collider, ColliderTransform};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::narrow_phase::{Collision, TimeOfImpact};

/// Candidate pair by proxy index, smaller index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller proxy index
    pub a: usize,
    /// Larger proxy index
    pub b: usize,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller index first)
    pub fn new(a: usize, b: usize) -> Self {
        if a < b { Self { a, b } } else { Self { a: b, b: a } }
    }
}

/// A collider taking part in one frame of broad-phase culling
#[derive(Debug, Clone, Copy)]
pub struct Proxy<'a> {
    /// Shape in object space
    pub collider: &'a Collider,
    /// Placement at the start of the frame
    pub transform: ColliderTransform,
    /// Translation over the frame
    pub movement: Vec2,
    /// Layers this proxy is on
    pub layer: CollisionLayers,
    /// Layers this proxy collides with
    pub mask: CollisionLayers,
}

impl<'a> Proxy<'a> {
    /// Proxy on every layer that accepts every layer
    pub fn new(collider: &'a Collider, transform: ColliderTransform, movement: Vec2) -> Self {
        Self {
            collider,
            transform,
            movement,
            layer: CollisionLayers::default(),
            mask: CollisionLayers::default(),
        }
    }

    /// Set layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Box covering the whole move
    pub fn swept_aabb(&self) -> Aabb {
        self.collider.swept_aabb(&self.transform, self.movement)
    }
}

/// Overlapping box pairs by sort-and-sweep on the x axis
///
/// Touching boxes count as overlapping. Pairs are `(lower, higher)` indices
/// into `boxes`, sorted.
pub fn sweep_and_prune(boxes: &[Aabb]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&i, &j| boxes[i].from.x.total_cmp(&boxes[j].from.x));

    let mut active: Vec<usize> = Vec::new();
    let mut pairs = Vec::new();

    for &index in &order {
        let current = &boxes[index];
        active.retain(|&other| boxes[other].to.x >= current.from.x);

        for &other in &active {
            let candidate = &boxes[other];
            if candidate.from.y <= current.to.y && candidate.to.y >= current.from.y {
                pairs.push((index.min(other), index.max(other)));
            }
        }

        active.push(index);
    }

    pairs.sort_unstable();
    pairs
}

/// Stateless broad phase over a slice of proxies
#[derive(Debug, Clone, Copy)]
pub struct BroadPhase {
    /// Run the swept-capsule test after the box sweep
    pub capsule_filter: bool,
}

impl Default for BroadPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadPhase {
    /// Broad phase with every filter enabled
    pub fn new() -> Self {
        Self { capsule_filter: true }
    }

    /// Pairs that may collide during the frame
    pub fn candidate_pairs(&self, proxies: &[Proxy<'_>]) -> Vec<CollisionPair> {
        let boxes: Vec<Aabb> = proxies.iter().map(Proxy::swept_aabb).collect();
        let overlapping = sweep_and_prune(&boxes);
        let box_pairs = overlapping.len();

        let candidates: Vec<CollisionPair> = overlapping
            .into_iter()
            .filter(|&(i, j)| {
                let (a, b) = (&proxies[i], &proxies[j]);
                CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask)
            })
            .filter(|&(i, j)| !self.capsule_filter || swept_capsules_meet(&proxies[i], &proxies[j]))
            .map(|(i, j)| CollisionPair::new(i, j))
            .collect();

        debug!(
            "Broad phase: {} proxies, {} box pairs, {} candidates",
            proxies.len(),
            box_pairs,
            candidates.len()
        );
        candidates
    }

    /// Candidate pairs that the narrow phase confirms, with their time of impact
    pub fn detect_impacts(
        &self,
        proxies: &[Proxy<'_>],
        collision: &Collision,
    ) -> Vec<(CollisionPair, TimeOfImpact)> {
        self.candidate_pairs(proxies)
            .into_iter()
            .filter_map(|pair| {
                let (a, b) = (&proxies[pair.a], &proxies[pair.b]);
                let impact = collision.continuous(
                    a.collider,
                    &a.transform,
                    a.movement,
                    b.collider,
                    &b.transform,
                    b.movement,
                );
                impact.hit.then_some((pair, impact))
            })
            .collect()
    }
}

fn swept_capsules_meet(a: &Proxy<'_>, b: &Proxy<'_>) -> bool {
    let capsule_a = a.collider.swept_capsule(&a.transform, a.movement);
    let capsule_b = b.collider.swept_capsule(&b.transform, b.movement);
    capsule_a.intersects(&capsule_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box(x: f32, y: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(x + 1.0, y + 1.0))
    }

    #[test]
    fn test_sweep_and_prune_chain() {
        let boxes = [unit_box(0.0, 0.0), unit_box(0.5, 0.5), unit_box(1.2, 0.0), unit_box(5.0, 0.0)];
        assert_eq!(sweep_and_prune(&boxes), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_sweep_and_prune_ignores_input_order() {
        let boxes = [unit_box(1.2, 0.0), unit_box(5.0, 0.0), unit_box(0.5, 0.5), unit_box(0.0, 0.0)];
        assert_eq!(sweep_and_prune(&boxes), vec![(0, 2), (2, 3)]);
    }

    #[test]
    fn test_sweep_and_prune_touching_and_y_rejection() {
        let boxes = [unit_box(0.0, 0.0), unit_box(1.0, 0.0), unit_box(0.5, 3.0)];
        assert_eq!(sweep_and_prune(&boxes), vec![(0, 1)]);
    }

    #[test]
    fn test_layer_filter_drops_rejected_pairs() {
        // 0 and 1 only accept group 1; 2 sits on group 1 and accepts group 0
        let sphere = Collider::sphere(1.0);
        let proxies = [
            Proxy::new(&sphere, ColliderTransform::identity(), Vec2::zeros())
                .with_layers(CollisionLayers::GROUP_0, CollisionLayers::GROUP_1),
            Proxy::new(&sphere, ColliderTransform::new(Vec2::new(1.0, 0.0)), Vec2::zeros())
                .with_layers(CollisionLayers::GROUP_0, CollisionLayers::GROUP_1),
            Proxy::new(&sphere, ColliderTransform::new(Vec2::new(0.0, 1.0)), Vec2::zeros())
                .with_layers(CollisionLayers::GROUP_1, CollisionLayers::GROUP_0),
        ];
        let pairs = BroadPhase::new().candidate_pairs(&proxies);
        assert_eq!(pairs, vec![CollisionPair::new(0, 2), CollisionPair::new(1, 2)]);
    }

    #[test]
    fn test_layer_filter_runs_before_narrow_phase() {
        let bullet = Collider::point();
        let wall = Collider::segment(Vec2::new(50.0, -5.0), Vec2::new(50.0, 5.0));
        let ghost = Proxy::new(&bullet, ColliderTransform::identity(), Vec2::new(100.0, 0.0))
            .with_layers(CollisionLayers::GROUP_2, CollisionLayers::GROUP_2);
        let solid = Proxy::new(&wall, ColliderTransform::identity(), Vec2::zeros())
            .with_layers(CollisionLayers::GROUP_3, CollisionLayers::all());

        let broad_phase = BroadPhase::new();
        assert!(broad_phase.detect_impacts(&[ghost, solid], &Collision::default()).is_empty());

        let ghost = ghost.with_layers(CollisionLayers::GROUP_2, CollisionLayers::GROUP_2 | CollisionLayers::GROUP_3);
        assert_eq!(broad_phase.detect_impacts(&[ghost, solid], &Collision::default()).len(), 1);
    }

    #[test]
    fn test_default_proxies_all_pair_up() {
        let sphere = Collider::sphere(1.0);
        let proxies: Vec<Proxy<'_>> = (0..3)
            .map(|i| Proxy::new(&sphere, ColliderTransform::new(Vec2::new(i as f32 * 0.5, 0.0)), Vec2::zeros()))
            .collect();
        let pairs = BroadPhase::new().candidate_pairs(&proxies);
        assert_eq!(
            pairs,
            vec![CollisionPair::new(0, 1), CollisionPair::new(0, 2), CollisionPair::new(1, 2)]
        );
    }

    #[test]
    fn test_capsule_filter_rejects_diagonal_miss() {
        let sphere = Collider::sphere(0.5);
        let proxies = [
            Proxy::new(&sphere, ColliderTransform::identity(), Vec2::new(10.0, 10.0)),
            Proxy::new(&sphere, ColliderTransform::new(Vec2::new(10.0, 0.0)), Vec2::zeros()),
        ];
        assert!(BroadPhase::new().candidate_pairs(&proxies).is_empty());

        let boxes_only = BroadPhase { capsule_filter: false };
        assert_eq!(boxes_only.candidate_pairs(&proxies), vec![CollisionPair::new(0, 1)]);
    }

    #[test]
    fn test_fast_point_does_not_tunnel() {
        let bullet = Collider::point();
        let wall = Collider::segment(Vec2::new(50.0, -5.0), Vec2::new(50.0, 5.0));
        let proxies = [
            Proxy::new(&bullet, ColliderTransform::identity(), Vec2::new(100.0, 0.0)),
            Proxy::new(&wall, ColliderTransform::identity(), Vec2::zeros()),
        ];
        let impacts = BroadPhase::new().detect_impacts(&proxies, &Collision::default());
        assert_eq!(impacts.len(), 1);
        let (pair, impact) = impacts[0];
        assert_eq!(pair, CollisionPair::new(0, 1));
        assert_relative_eq!(impact.toi, 0.5, epsilon = 1e-3);
        assert_relative_eq!(impact.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-3);
    }
}
