//! GJK distance between two placed colliders
//!
//! Iterates on the Minkowski difference A - B, keeping the simplex reduced
//! with Signed Volumes. Returns 0 for touching or overlapping shapes.

use log::warn;

use super::MinkowskiDifference;
use super::simplex::{Simplex, signed_volumes};
use crate::config::QueryConfig;
use crate::debug::{QueryKind, QueryRecorder};
use crate::foundation::math::Vec2;

/// Euclidean distance between the shapes in `difference`
pub(crate) fn distance<R: QueryRecorder>(
    difference: &MinkowskiDifference<'_>,
    config: &QueryConfig,
    recorder: &mut R,
) -> f32 {
    let mut v = difference.support(Vec2::x());
    if v == Vec2::zeros() {
        return 0.0;
    }

    let mut simplex = Simplex::new();
    let mut previous = Simplex::new();

    for iteration in 1..=config.gjk_max_iterations {
        recorder.iteration(iteration);

        let w = difference.support(-v);

        // Support point already known: no further progress is possible
        if previous.contains(&w) {
            return v.norm();
        }

        let v_length_squared = v.norm_squared();
        if v_length_squared - v.dot(&w) <= config.gjk_relative_error * v_length_squared {
            return v.norm();
        }

        simplex.push(w);
        previous = simplex;

        let reduction = signed_volumes(previous.points());
        v = reduction.closest_point(previous.points());
        simplex = previous.retain(&reduction);

        recorder.gjk_step(simplex.points(), v, w);

        if simplex.is_full()
            || v.norm_squared() <= config.gjk_tolerance * simplex.max_norm_squared()
        {
            return 0.0;
        }
    }

    warn!(
        "GJK distance hit the iteration cap ({}), returning the last estimate",
        config.gjk_max_iterations
    );
    recorder.cap_exhausted(QueryKind::Distance);
    v.norm()
}
