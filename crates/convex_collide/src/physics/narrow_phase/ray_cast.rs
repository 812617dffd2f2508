//! GJK ray cast for continuous collision
//!
//! Casts the relative movement against the Minkowski difference A - B. The
//! simplex is built from `x - p` for support points `p`; the unshifted
//! points are kept alongside so the simplex can be rebuilt as `x` advances.

use log::warn;

use super::{MinkowskiDifference, RayCastStatus, TimeOfImpact};
use crate::config::QueryConfig;
use crate::debug::{QueryKind, QueryRecorder};
use crate::foundation::math::{Vec2, utils};
use super::simplex::{MAX_VERTICES, Simplex, signed_volumes};

/// First time of impact along `ray` (movement of B minus movement of A)
pub(crate) fn time_of_impact<R: QueryRecorder>(
    difference: &MinkowskiDifference<'_>,
    ray: Vec2,
    config: &QueryConfig,
    recorder: &mut R,
) -> TimeOfImpact {
    let mut t = 0.0_f32;
    let mut x = Vec2::zeros();
    let mut normal = Vec2::zeros();
    let mut v = x - difference.support(Vec2::x());
    let mut set_p = Simplex::new();

    for iteration in 1..=config.ray_cast_max_iterations {
        recorder.iteration(iteration);

        let max_length_squared = set_p
            .points()
            .iter()
            .map(|p| (x - p).norm_squared())
            .fold(0.0, f32::max);
        if v.norm_squared() <= config.gjk_tolerance * max_length_squared {
            return TimeOfImpact::contact(t, normal, RayCastStatus::Converged);
        }

        let p = difference.support(v);
        let w = x - p;
        let v_dot_w = v.dot(&w);
        if v_dot_w > 0.0 {
            let v_dot_r = v.dot(&ray);
            if v_dot_r >= 0.0 {
                return TimeOfImpact::miss();
            }

            t -= v_dot_w / v_dot_r;
            if t > 1.0 {
                return TimeOfImpact::miss();
            }

            x = ray * t;
            normal = v;
        }

        if !set_p.contains(&p) {
            set_p.push(p);
        }

        let mut shifted = [Vec2::zeros(); MAX_VERTICES];
        for (slot, point) in shifted.iter_mut().zip(set_p.points()) {
            *slot = x - point;
        }
        let shifted = &shifted[..set_p.len()];

        let reduction = signed_volumes(shifted);
        v = reduction.closest_point(shifted);
        set_p = set_p.retain(&reduction);

        recorder.ray_cast_step(x, p, set_p.points(), v);

        // x enclosed by three support points lies inside A - B
        if set_p.is_full() {
            return TimeOfImpact::contact(t, normal, RayCastStatus::Converged);
        }
    }

    warn!(
        "GJK ray cast hit the iteration cap ({}), reporting a conservative hit at t = {}",
        config.ray_cast_max_iterations, t
    );
    recorder.cap_exhausted(QueryKind::Continuous);
    TimeOfImpact::contact(t, normal, RayCastStatus::IterationCap)
}

impl TimeOfImpact {
    fn contact(toi: f32, v: Vec2, status: RayCastStatus) -> Self {
        Self {
            hit: true,
            toi,
            normal: utils::try_normalize(-v).unwrap_or_else(Vec2::zeros),
            status,
        }
    }

    fn miss() -> Self {
        Self {
            hit: false,
            toi: 1.0,
            normal: Vec2::zeros(),
            status: RayCastStatus::Missed,
        }
    }
}
