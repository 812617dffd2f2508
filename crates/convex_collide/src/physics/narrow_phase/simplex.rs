//! Simplex storage and Signed Volumes reduction
//!
//! The reduction finds the point of a 1-, 2- or 3-vertex simplex closest to
//! the origin and the smallest sub-simplex that supports it. It reports the
//! kept vertices by index so callers can carry parallel data (the ray cast
//! keeps the unshifted support points) through the reduction.

use crate::foundation::math::{Vec2, utils};

/// Largest simplex in the plane
pub const MAX_VERTICES: usize = 3;

/// Up to three points with no heap storage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simplex {
    points: [Vec2; MAX_VERTICES],
    len: usize,
}

impl Default for Simplex {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplex {
    /// Empty simplex
    pub fn new() -> Self {
        Self {
            points: [Vec2::zeros(); MAX_VERTICES],
            len: 0,
        }
    }

    /// Live vertices
    pub fn points(&self) -> &[Vec2] {
        &self.points[..self.len]
    }

    /// Number of live vertices
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no vertex has been added
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when all three slots are used
    pub fn is_full(&self) -> bool {
        self.len == MAX_VERTICES
    }

    /// Append a vertex, returning `false` when the simplex is already full
    pub fn push(&mut self, point: Vec2) -> bool {
        if self.is_full() {
            return false;
        }
        self.points[self.len] = point;
        self.len += 1;
        true
    }

    /// Exact membership test
    pub fn contains(&self, point: &Vec2) -> bool {
        self.points().iter().any(|p| p == point)
    }

    /// Largest squared norm among the vertices (0 for an empty simplex)
    pub fn max_norm_squared(&self) -> f32 {
        self.points().iter().map(|p| p.norm_squared()).fold(0.0, f32::max)
    }

    /// Keep only the vertices a reduction selected, in its order
    pub fn retain(&self, reduction: &Reduction) -> Self {
        let mut kept = Self::new();
        for &index in reduction.indices() {
            kept.push(self.points[index]);
        }
        kept
    }
}

/// Outcome of a Signed Volumes reduction
///
/// `indices` name the kept vertices of the input and `weights` are their
/// barycentric coordinates of the closest point; the weights are positive
/// and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reduction {
    indices: [usize; MAX_VERTICES],
    weights: [f32; MAX_VERTICES],
    len: usize,
}

impl Reduction {
    fn empty() -> Self {
        Self {
            indices: [0; MAX_VERTICES],
            weights: [0.0; MAX_VERTICES],
            len: 0,
        }
    }

    fn vertex(index: usize) -> Self {
        Self {
            indices: [index, 0, 0],
            weights: [1.0, 0.0, 0.0],
            len: 1,
        }
    }

    /// Indices of the kept vertices
    pub fn indices(&self) -> &[usize] {
        &self.indices[..self.len]
    }

    /// Barycentric weights of the kept vertices
    pub fn weights(&self) -> &[f32] {
        &self.weights[..self.len]
    }

    /// Number of kept vertices
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for the reduction of an empty input
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The closest point, rebuilt from the reduced input
    pub fn closest_point(&self, points: &[Vec2]) -> Vec2 {
        self.indices()
            .iter()
            .zip(self.weights())
            .map(|(&index, &weight)| points[index] * weight)
            .sum()
    }
}

/// Signed Volumes reduction of up to three points
///
/// An empty input, or one with more than three points, reduces to nothing.
pub fn signed_volumes(points: &[Vec2]) -> Reduction {
    match points.len() {
        1 => Reduction::vertex(0),
        2 => s1d(points, 0, 1),
        3 => s2d(points),
        _ => Reduction::empty(),
    }
}

/// Reduction of the segment `points[i0]`-`points[i1]`
fn s1d(points: &[Vec2], i0: usize, i1: usize) -> Reduction {
    let s1 = points[i0];
    let s2 = points[i1];

    let edge = s2 - s1;
    let edge_length_squared = edge.norm_squared();
    if edge_length_squared <= f32::MIN_POSITIVE {
        return Reduction::vertex(i0);
    }

    // Origin projected onto the supporting line
    let projected = s1 + edge * ((-s1).dot(&edge) / edge_length_squared);

    // Work on the axis with the largest extent to keep the division stable
    let s2s1 = s1 - s2;
    let axis = usize::from(s2s1.y.abs() > s2s1.x.abs());
    let mu_max = s2s1[axis];

    let cofactor1 = projected[axis] - s2[axis];
    let cofactor2 = s1[axis] - projected[axis];

    if !utils::same_sign(mu_max, cofactor1) {
        return Reduction::vertex(i1);
    }
    if !utils::same_sign(mu_max, cofactor2) {
        return Reduction::vertex(i0);
    }

    Reduction {
        indices: [i0, i1, 0],
        weights: [cofactor1 / mu_max, cofactor2 / mu_max, 0.0],
        len: 2,
    }
}

/// Reduction of the triangle `points[0..3]`
fn s2d(points: &[Vec2]) -> Reduction {
    let (s1, s2, s3) = (points[0], points[1], points[2]);

    let cofactor31 = utils::cross(s2, s3);
    let cofactor32 = utils::cross(s3, s1);
    let cofactor33 = utils::cross(s1, s2);
    let determinant = cofactor31 + cofactor32 + cofactor33;

    let same1 = utils::same_sign(determinant, cofactor31);
    let same2 = utils::same_sign(determinant, cofactor32);
    let same3 = utils::same_sign(determinant, cofactor33);

    if same1 && same2 && same3 {
        return Reduction {
            indices: [0, 1, 2],
            weights: [
                cofactor31 / determinant,
                cofactor32 / determinant,
                cofactor33 / determinant,
            ],
            len: 3,
        };
    }

    // Origin outside: the answer lies on an edge facing it
    let candidates = [(same1, 1, 2), (same2, 0, 2), (same3, 0, 1)];
    let mut best: Option<(Reduction, f32)> = None;
    for &(same, i0, i1) in &candidates {
        if same {
            continue;
        }
        let reduction = s1d(points, i0, i1);
        let distance_squared = reduction.closest_point(points).norm_squared();
        if best.map_or(true, |(_, best_distance)| distance_squared < best_distance) {
            best = Some((reduction, distance_squared));
        }
    }

    best.map_or_else(|| Reduction::vertex(0), |(reduction, _)| reduction)
}
