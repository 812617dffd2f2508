//! Minkowski Portal Refinement
//!
//! Both queries work on B - A with the interior point `v0 = center(B) -
//! center(A)`. A portal search first finds `v1`-`v2` on opposite sides of
//! the ray from `v0` through the origin. Refinement then pushes the portal
//! out until it decides where the origin lies or sits within tolerance of
//! the boundary.

use log::{error, warn};

use super::{MinkowskiDifference, Penetration};
use crate::config::QueryConfig;
use crate::debug::{MprPortal, PenetrationContext, QueryKind, QueryRecorder};
use crate::foundation::math::{Vec2, utils};

/// Initial portal, or an early answer when the search already decides it
enum Discovery {
    /// `v1` and `v2` lie on opposite sides of the origin ray
    Portal {
        v0: Vec2,
        v1: Vec2,
        v2: Vec2,
        side: f32,
        seed: Vec2,
    },
    /// Origin lies on the line through `v0` and `v1`
    Collinear { v0: Vec2, v1: Vec2 },
    /// The support plane along `normal` through `support` leaves the origin outside
    Outside { normal: Vec2, support: Vec2 },
    /// Search ran out of steps without a straddling portal
    Stalled { v0: Vec2, v1: Vec2 },
    /// Shape centers coincide
    Centered,
}

/// Which side of the ray from `v0` along `origin_ray` the point lies on
fn ray_side(v0: Vec2, point: Vec2, origin_ray: Vec2) -> i8 {
    utils::sign(utils::perp(point - v0).dot(&origin_ray))
}

/// Find a portal `v1`-`v2` that the origin ray passes through
///
/// `v1` starts at the support toward the origin. Each step takes the support
/// along the normal of `v0`-`v1` on the origin side. If that point is on the
/// same side of the ray as `v1` it replaces `v1`, otherwise the two straddle
/// the ray. With `stop_on_separation` set, any support plane that leaves the
/// origin outside ends the search early.
fn discover(difference: &MinkowskiDifference<'_>, max_steps: u32, stop_on_separation: bool) -> Discovery {
    let v0 = difference.center();
    if v0 == Vec2::zeros() {
        return Discovery::Centered;
    }

    let origin_ray = -v0;
    let mut v1 = difference.support(origin_ray);
    if stop_on_separation && v1.dot(&origin_ray) < 0.0 {
        return Discovery::Outside {
            normal: origin_ray,
            support: v1,
        };
    }

    for _ in 0..max_steps {
        let side = ray_side(v0, v1, origin_ray);
        if side == 0 {
            return Discovery::Collinear { v0, v1 };
        }

        let normal = utils::perp(v1 - v0) * f32::from(side);
        let v2 = difference.support(normal);
        // No progress past the v0-v1 line puts the origin outside as well
        if (stop_on_separation && normal.dot(&v2) < 0.0) || normal.dot(&(v2 - v1)) <= 0.0 {
            return Discovery::Outside { normal, support: v2 };
        }

        let side2 = ray_side(v0, v2, origin_ray);
        if side2 == -side || (side2 == 0 && (v2 - v0).dot(&origin_ray) > 0.0) {
            return Discovery::Portal {
                v0,
                v1,
                v2,
                side: f32::from(side),
                seed: normal,
            };
        }
        v1 = v2;
    }

    Discovery::Stalled { v0, v1 }
}

/// Outward normal of the portal `v1`-`v2`
fn portal_normal(v1: Vec2, v2: Vec2, side: f32) -> Vec2 {
    utils::perp((v1 - v2) * side)
}

/// True when the shapes in `difference` (B - A) overlap or touch
pub(crate) fn intersects<R: QueryRecorder>(
    difference: &MinkowskiDifference<'_>,
    config: &QueryConfig,
    recorder: &mut R,
) -> bool {
    let (v0, mut v1, mut v2, side) = match discover(difference, config.mpr_max_refinements, true) {
        Discovery::Centered => return true,
        Discovery::Outside { .. } => return false,
        Discovery::Collinear { v0, v1 } => {
            return v0.norm_squared() <= (v1 - v0).norm_squared();
        }
        Discovery::Stalled { .. } => {
            warn!(
                "MPR portal search hit the step cap ({}), reporting no overlap",
                config.mpr_max_refinements
            );
            recorder.cap_exhausted(QueryKind::Intersection);
            return false;
        }
        Discovery::Portal { v0, v1, v2, side, .. } => (v0, v1, v2, side),
    };
    let origin_ray = -v0;

    for iteration in 1..=config.mpr_max_refinements {
        recorder.iteration(iteration);

        let normal = portal_normal(v1, v2, side);
        let Some(unit_normal) = utils::try_normalize(normal) else {
            // Collapsed portal: nothing of B - A lies past it toward the origin
            return false;
        };

        if normal.dot(&v1) >= 0.0 {
            return true;
        }

        let v3 = difference.support(normal);
        recorder.mpr_step(MprPortal { v0, v1, v2, v3 });

        if normal.dot(&v3) < 0.0 {
            return false;
        }

        if unit_normal.dot(&(v3 - v1)) <= config.mpr_tolerance {
            return false;
        }

        let side3 = ray_side(v0, v3, origin_ray);
        if side3 == 0 {
            return origin_ray.norm_squared() <= (v0 - v3).norm_squared();
        }

        if side * f32::from(side3) > 0.0 {
            v1 = v3;
        } else {
            v2 = v3;
        }
    }

    warn!(
        "MPR intersection hit the refinement cap ({}), reporting no overlap",
        config.mpr_max_refinements
    );
    recorder.cap_exhausted(QueryKind::Intersection);
    false
}

/// Contact normal (B to A) and signed depth for the shapes in `difference`
///
/// The depth is positive for overlap and negative for separation.
pub(crate) fn penetration<R: QueryRecorder>(
    difference: &MinkowskiDifference<'_>,
    config: &QueryConfig,
    recorder: &mut R,
) -> Penetration {
    let result = match discover(difference, config.penetration_max_refinements, false) {
        Discovery::Centered => centered_penetration(difference),
        Discovery::Collinear { v0, v1 } => along_origin_ray(v0, v1),
        Discovery::Outside { normal, support } => {
            let normal = utils::try_normalize(normal).unwrap_or_else(Vec2::zeros);
            Penetration {
                normal,
                depth: support.dot(&normal),
                converged: true,
            }
        }
        Discovery::Stalled { v0, v1 } => {
            error!(
                "MPR portal search did not finish within {} steps",
                config.penetration_max_refinements
            );
            recorder.cap_exhausted(QueryKind::Penetration);
            let estimate = Penetration {
                converged: false,
                ..along_origin_ray(v0, v1)
            };
            debug_assert!(estimate.converged, "MPR portal search did not finish");
            estimate
        }
        Discovery::Portal { v0, v1, v2, side, seed } => {
            refine_penetration(difference, v0, (v1, v2), side, seed, config, recorder)
        }
    };

    if result.converged {
        recorder.penetration(PenetrationContext {
            point_a: difference.subtrahend().support(-result.normal),
            point_b: difference.minuend().support(result.normal),
            normal: result.normal,
        });
    }
    result
}

/// Depth where the origin ray meets the boundary at `v1`
fn along_origin_ray(v0: Vec2, v1: Vec2) -> Penetration {
    let origin_ray = -v0;
    Penetration {
        normal: utils::try_normalize(origin_ray).unwrap_or_else(Vec2::zeros),
        depth: (v1 - v0).norm() - origin_ray.norm(),
        converged: true,
    }
}

/// Coincident centers: take the shortest of four axis-aligned exits
///
/// This samples the boundary instead of searching it, so the depth is an
/// upper bound of the true minimum translation.
fn centered_penetration(difference: &MinkowskiDifference<'_>) -> Penetration {
    let directions = [
        Vec2::new(0.0, -1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(-1.0, 0.0),
    ];

    let mut shortest = difference.support(directions[0]);
    for direction in &directions[1..] {
        let candidate = difference.support(*direction);
        if candidate.norm_squared() < shortest.norm_squared() {
            shortest = candidate;
        }
    }

    Penetration {
        normal: utils::try_normalize(shortest).unwrap_or_else(Vec2::zeros),
        depth: shortest.norm(),
        converged: true,
    }
}

fn refine_penetration<R: QueryRecorder>(
    difference: &MinkowskiDifference<'_>,
    v0: Vec2,
    (mut v1, mut v2): (Vec2, Vec2),
    side: f32,
    seed: Vec2,
    config: &QueryConfig,
    recorder: &mut R,
) -> Penetration {
    let origin_ray = -v0;
    let mut estimate = Penetration {
        normal: Vec2::zeros(),
        depth: 0.0,
        converged: false,
    };

    for iteration in 1..=config.penetration_max_refinements {
        recorder.iteration(iteration);

        let normal = portal_normal(v1, v2, side);
        let Some(unit_normal) = utils::try_normalize(normal) else {
            // Collapsed portal: the seed direction is the face normal
            let unit_seed = utils::try_normalize(seed).unwrap_or_else(Vec2::zeros);
            return Penetration {
                normal: unit_seed,
                depth: v1.dot(&unit_seed),
                converged: true,
            };
        };

        let v3 = difference.support(normal);
        recorder.mpr_step(MprPortal { v0, v1, v2, v3 });

        estimate.normal = unit_normal;
        estimate.depth = v3.dot(&unit_normal);

        if unit_normal.dot(&(v3 - v1)) <= config.mpr_tolerance {
            estimate.converged = true;
            return estimate;
        }

        let side3 = ray_side(v0, v3, origin_ray);
        if side3 == 0 {
            return along_origin_ray(v0, v3);
        }

        if side * f32::from(side3) > 0.0 {
            v1 = v3;
        } else {
            v2 = v3;
        }
    }

    error!(
        "MPR penetration did not converge within {} refinements",
        config.penetration_max_refinements
    );
    recorder.cap_exhausted(QueryKind::Penetration);
    debug_assert!(estimate.converged, "MPR penetration did not converge");
    estimate
}
