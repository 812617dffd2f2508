//! End-to-end scenarios for the narrow and broad phase


use approx::assert_relative_eq;

use crate::config::QueryConfig;
use crate::debug::{QueryKind, QueryTrace};
use crate::foundation::logging;
use crate::foundation::math::Vec2;
use crate::physics::broad_phase::{BroadPhase, Proxy};
use crate::physics::collision::{Collider, ColliderTransform};
use crate::physics::narrow_phase::{
    Collision, RayCastStatus, continuous, distance, intersects, penetration,
};

const EPSILON: f32 = 1e-3;

fn square(half: f32) -> Collider {
    Collider::centered_rect(half, half)
}

fn triangle() -> Collider {
    Collider::convex_polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(0.0, 2.0)])
        .expect("valid triangle")
}

#[test]
fn test_point_against_static_segment() {
    logging::init_for_tests();

    let point = Collider::sphere(0.0);
    let segment = Collider::segment(Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0));

    let result = continuous(
        &point,
        &ColliderTransform::identity(),
        Vec2::new(19.0, 0.0),
        &segment,
        &ColliderTransform::new(Vec2::new(10.0, 0.0)),
        Vec2::zeros(),
    );

    assert!(result.hit);
    assert_eq!(result.status, RayCastStatus::Converged);
    assert_relative_eq!(result.toi, 10.0 / 19.0, epsilon = EPSILON);
    // Contact normal points from the segment back toward the point
    assert_relative_eq!(result.normal, Vec2::new(-1.0, 0.0), epsilon = EPSILON);
}

#[test]
fn test_rotated_square_continuous_regression() {
    logging::init_for_tests();

    let square = Collider::convex_polygon(vec![
        Vec2::new(-160.0, -160.0),
        Vec2::new(160.0, -160.0),
        Vec2::new(160.0, 160.0),
        Vec2::new(-160.0, 160.0),
    ])
    .expect("valid square");
    let square_transform = ColliderTransform::with_rotation(Vec2::new(860.0, 650.0), 1168.25146);

    let point = Collider::sphere(0.0);
    let point_transform = ColliderTransform::new(Vec2::new(675.546448, 487.930237));

    let result = continuous(
        &square,
        &square_transform,
        Vec2::zeros(),
        &point,
        &point_transform,
        Vec2::new(67.5546494, 48.7930183),
    );

    assert!(result.hit);
    assert!(result.toi > 0.0 && result.toi < 1.0, "toi = {}", result.toi);
    assert!(result.normal.norm_squared() > 0.0);
    assert_relative_eq!(result.normal.norm(), 1.0, epsilon = EPSILON);
}

#[test]
fn test_point_near_thin_polygon_does_not_intersect() {
    logging::init_for_tests();

    let point = Collider::sphere(0.0);
    let point_transform = ColliderTransform::new(Vec2::new(203.33334, 239.99979));
    let sliver = Collider::convex_polygon(vec![Vec2::new(-63.5, -0.5), Vec2::new(64.5, 0.5)])
        .expect("valid sliver");
    let sliver_transform = ColliderTransform::new(Vec2::new(300.0, 300.0));

    let contact = penetration(&point, &point_transform, &sliver, &sliver_transform);
    assert!(contact.converged);
    assert!(contact.depth.is_finite());
    assert!(contact.depth < 0.0);
    assert!(!intersects(&point, &point_transform, &sliver, &sliver_transform));
}

#[test]
fn test_rotated_segment_beside_polygon_is_separated() {
    logging::init_for_tests();

    let segment = Collider::segment(Vec2::new(42.64927, 32.29271), Vec2::new(-33.724068, -38.08197));
    let segment_transform = ColliderTransform::with_rotation(Vec2::new(-14.713585, -20.82008), 7.635908);
    let polygon = Collider::convex_polygon(vec![
        Vec2::new(-25.685047, -11.867069),
        Vec2::new(-27.438868, -16.369068),
        Vec2::new(-31.408464, -7.5286636),
        Vec2::new(25.933578, 0.82089996),
    ])
    .expect("valid polygon");
    let polygon_transform = ColliderTransform::with_rotation(Vec2::new(-48.336952, 17.350555), 8.289448);

    let gap = distance(&segment, &segment_transform, &polygon, &polygon_transform);
    assert_relative_eq!(gap, 1.235, epsilon = 1e-2);

    assert!(!intersects(&segment, &segment_transform, &polygon, &polygon_transform));
    assert!(!intersects(&polygon, &polygon_transform, &segment, &segment_transform));

    let contact = penetration(&segment, &segment_transform, &polygon, &polygon_transform);
    assert!(contact.converged);
    assert!(contact.depth < 0.0, "depth = {}", contact.depth);
    assert_relative_eq!(contact.depth, -gap, epsilon = 1e-2);

    let reversed = penetration(&polygon, &polygon_transform, &segment, &segment_transform);
    assert!(reversed.depth < 0.0, "depth = {}", reversed.depth);
}

#[test]
fn test_sphere_penetration_normal_points_from_b_to_a() {
    let sphere = Collider::sphere(1.0);
    let contact = penetration(
        &sphere,
        &ColliderTransform::identity(),
        &sphere,
        &ColliderTransform::new(Vec2::new(1.5, 0.0)),
    );
    assert!(contact.converged);
    assert_relative_eq!(contact.normal, Vec2::new(-1.0, 0.0), epsilon = EPSILON);
    assert_relative_eq!(contact.depth, 0.5, epsilon = EPSILON);
}

#[test]
fn test_rotated_square_distance_and_separation() {
    let unit = square(1.0);
    let diamond = ColliderTransform::with_rotation(Vec2::zeros(), std::f32::consts::FRAC_PI_4);
    let other = ColliderTransform::new(Vec2::new(4.0, 0.0));
    let expected = 3.0 - std::f32::consts::SQRT_2;

    assert_relative_eq!(distance(&unit, &diamond, &unit, &other), expected, epsilon = EPSILON);
    assert!(!intersects(&unit, &diamond, &unit, &other));

    let contact = penetration(&unit, &diamond, &unit, &other);
    assert_relative_eq!(contact.depth, -expected, epsilon = EPSILON);
    assert_relative_eq!(contact.normal, Vec2::new(-1.0, 0.0), epsilon = EPSILON);
}

#[test]
fn test_composite_shapes() {
    let capsule = Collider::capsule(Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0), 0.5);
    let ball = Collider::sphere(1.0);
    let origin = ColliderTransform::identity();

    let d = distance(&capsule, &origin, &ball, &ColliderTransform::new(Vec2::new(0.0, 3.0)));
    assert_relative_eq!(d, 1.5, epsilon = 1e-2);

    let contact = penetration(&ball, &ColliderTransform::new(Vec2::new(1.0, 1.0)), &capsule, &origin);
    assert_relative_eq!(contact.depth, 0.5, epsilon = 1e-2);
    assert_relative_eq!(contact.normal, Vec2::new(0.0, 1.0), epsilon = 1e-2);

    let stadium = Collider::convex_hull(vec![
        Collider::sphere(1.0),
        Collider::capsule(Vec2::new(4.0, 0.0), Vec2::new(4.0, 0.0), 1.0),
    ])
    .expect("valid hull");
    let marker = Collider::point();
    assert!(intersects(&stadium, &origin, &marker, &ColliderTransform::new(Vec2::new(2.0, 0.5))));
    assert!(!intersects(&stadium, &origin, &marker, &ColliderTransform::new(Vec2::new(2.0, 1.5))));
}

#[test]
fn test_scaled_transform() {
    let unit = square(1.0);
    let stretched = ColliderTransform::identity().with_scale(Vec2::new(3.0, 1.0));
    let marker = Collider::point();

    let d = distance(&unit, &stretched, &marker, &ColliderTransform::new(Vec2::new(4.0, 0.0)));
    assert_relative_eq!(d, 1.0, epsilon = EPSILON);
    assert!(intersects(&unit, &stretched, &marker, &ColliderTransform::new(Vec2::new(2.5, 0.5))));
}

#[test]
fn test_intersection_is_symmetric() {
    let shapes = [
        square(1.0),
        triangle(),
        Collider::sphere(0.75),
        Collider::capsule(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.5), 0.25),
        Collider::segment(Vec2::new(-1.5, -1.0), Vec2::new(1.0, 1.0)),
    ];

    for a in &shapes {
        for b in &shapes {
            for step in 0..40 {
                let s = step as f32;
                let ta = ColliderTransform::with_rotation(Vec2::zeros(), s * 0.37);
                let tb = ColliderTransform::with_rotation(
                    Vec2::new((s * 0.61).sin() * 3.0, (s * 0.47).cos() * 2.5),
                    -s * 0.23,
                );
                assert_eq!(intersects(a, &ta, b, &tb), intersects(b, &tb, a, &ta));
            }
        }
    }
}

#[test]
fn test_distance_non_negative_and_zero_on_overlap() {
    let a = square(1.0);
    let b = triangle();

    for ix in -12..=12 {
        for iy in -12..=12 {
            for &rotation in &[0.0_f32, 0.3, 1.1, 2.9] {
                let ta = ColliderTransform::with_rotation(Vec2::zeros(), rotation);
                let tb = ColliderTransform::with_rotation(
                    Vec2::new(ix as f32 * 0.37, iy as f32 * 0.29),
                    -rotation * 0.7,
                );
                let d = distance(&a, &ta, &b, &tb);
                assert!(d >= 0.0);
                if intersects(&a, &ta, &b, &tb) {
                    assert!(d <= 1e-3, "overlapping pair at ({ix}, {iy}) has distance {d}");
                }
            }
        }
    }
}

#[test]
fn test_queries_are_idempotent() {
    let a = triangle();
    let b = Collider::capsule(Vec2::new(0.0, -1.0), Vec2::new(0.0, 1.0), 0.3);
    let ta = ColliderTransform::with_rotation(Vec2::new(0.2, 0.1), 0.8);
    let tb = ColliderTransform::with_rotation(Vec2::new(1.1, 0.9), -0.4);
    let movement_a = Vec2::new(3.0, -1.0);
    let movement_b = Vec2::new(-2.0, 0.5);

    assert_eq!(distance(&a, &ta, &b, &tb), distance(&a, &ta, &b, &tb));
    assert_eq!(intersects(&a, &ta, &b, &tb), intersects(&a, &ta, &b, &tb));
    assert_eq!(penetration(&a, &ta, &b, &tb), penetration(&a, &ta, &b, &tb));
    assert_eq!(
        continuous(&a, &ta, movement_a, &b, &tb, movement_b),
        continuous(&a, &ta, movement_a, &b, &tb, movement_b)
    );
}

#[test]
fn test_ray_cast_cap_reports_conservative_hit() {
    logging::init_for_tests();

    let config = QueryConfig {
        ray_cast_max_iterations: 1,
        ..QueryConfig::default()
    };
    let collision = Collision::new(config).expect("valid config");
    let point = Collider::point();
    let segment = Collider::segment(Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0));

    let mut trace = QueryTrace::new();
    let result = collision.continuous_recorded(
        &point,
        &ColliderTransform::identity(),
        Vec2::new(19.0, 0.0),
        &segment,
        &ColliderTransform::new(Vec2::new(10.0, 0.0)),
        Vec2::zeros(),
        &mut trace,
    );

    assert!(result.hit);
    assert_eq!(result.status, RayCastStatus::IterationCap);
    assert!(result.toi <= 10.0 / 19.0 + EPSILON);
    assert_eq!(trace.kind, Some(QueryKind::Continuous));
    assert_eq!(trace.cap_exhaustions, 1);
}

#[test]
fn test_recorded_queries_match_plain_queries() {
    let collision = Collision::default();
    let a = square(1.0);
    let b = Collider::sphere(0.5);
    let ta = ColliderTransform::identity();
    let tb = ColliderTransform::new(Vec2::new(1.2, 0.4));
    let mut trace = QueryTrace::new();

    assert_eq!(
        collision.intersects_recorded(&a, &ta, &b, &tb, &mut trace),
        collision.intersects(&a, &ta, &b, &tb)
    );
    assert_eq!(trace.kind, Some(QueryKind::Intersection));

    assert_eq!(
        collision.penetration_recorded(&a, &ta, &b, &tb, &mut trace),
        collision.penetration(&a, &ta, &b, &tb)
    );
    assert!(!trace.mpr_portals.is_empty());
    assert!(trace.penetration.is_some());

    assert_eq!(
        collision.distance_recorded(&a, &ta, &b, &tb, &mut trace),
        collision.distance(&a, &ta, &b, &tb)
    );
    assert_eq!(trace.kind, Some(QueryKind::Distance));
    assert!(trace.mpr_portals.is_empty());
}

#[test]
fn test_broad_phase_feeds_narrow_phase() {
    let ball = Collider::sphere(1.0);
    let wall = Collider::segment(Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0));
    let far = square(1.0);

    let proxies = [
        Proxy::new(&ball, ColliderTransform::identity(), Vec2::new(20.0, 0.0)),
        Proxy::new(&wall, ColliderTransform::new(Vec2::new(10.0, 0.0)), Vec2::zeros()),
        Proxy::new(&far, ColliderTransform::new(Vec2::new(0.0, 50.0)), Vec2::zeros()),
    ];

    let impacts = BroadPhase::new().detect_impacts(&proxies, &Collision::default());
    assert_eq!(impacts.len(), 1);
    let (pair, impact) = impacts[0];
    assert_eq!((pair.a, pair.b), (0, 1));
    assert_relative_eq!(impact.toi, 9.0 / 20.0, epsilon = 5e-3);
}
