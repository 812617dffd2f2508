//! Per-query iteration history for visualization and diagnostics
//!
//! A recorder is owned by the caller and handed to exactly one query at a
//! time, so queries stay reentrant and can run on many threads at once.

use crate::foundation::math::Vec2;

/// Which query produced a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// GJK distance
    Distance,
    /// MPR boolean intersection
    Intersection,
    /// MPR penetration depth
    Penetration,
    /// GJK ray cast time of impact
    Continuous,
}

/// One GJK distance iteration
#[derive(Debug, Clone, PartialEq)]
pub struct GjkStep {
    /// Reduced simplex after the iteration
    pub simplex: Vec<Vec2>,
    /// Closest point of the simplex to the origin
    pub v: Vec2,
    /// Support point added this iteration
    pub w: Vec2,
}

/// One GJK ray cast iteration
#[derive(Debug, Clone, PartialEq)]
pub struct RayCastStep {
    /// Current source point on the ray
    pub x: Vec2,
    /// Support point sampled this iteration
    pub p: Vec2,
    /// Support points kept after reduction
    pub set_p: Vec<Vec2>,
    /// Vector from the closest point of the simplex to `x`
    pub v: Vec2,
}

/// One MPR refinement: the interior point, the portal and the new support point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MprPortal {
    /// Interior point (center difference)
    pub v0: Vec2,
    /// Portal endpoint
    pub v1: Vec2,
    /// Portal endpoint
    pub v2: Vec2,
    /// Support point along the portal normal
    pub v3: Vec2,
}

/// Contact resolved by the penetration query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenetrationContext {
    /// Deepest point of A along the contact
    pub point_a: Vec2,
    /// Deepest point of B along the contact
    pub point_b: Vec2,
    /// Contact normal from B to A
    pub normal: Vec2,
}

/// Receives query internals as they happen
///
/// Every method defaults to doing nothing; `()` is the disabled recorder.
pub trait QueryRecorder {
    /// A query starts
    fn begin(&mut self, _kind: QueryKind) {}

    /// Iteration counter update
    fn iteration(&mut self, _count: u32) {}

    /// GJK distance iteration finished
    fn gjk_step(&mut self, _simplex: &[Vec2], _v: Vec2, _w: Vec2) {}

    /// GJK ray cast iteration finished
    fn ray_cast_step(&mut self, _x: Vec2, _p: Vec2, _set_p: &[Vec2], _v: Vec2) {}

    /// MPR refinement sampled a new support point
    fn mpr_step(&mut self, _portal: MprPortal) {}

    /// Penetration query resolved a contact
    fn penetration(&mut self, _context: PenetrationContext) {}

    /// A query ran out of iterations
    fn cap_exhausted(&mut self, _kind: QueryKind) {}
}

impl QueryRecorder for () {}

/// Recorder that keeps the full history of the last query
#[derive(Debug, Clone, Default)]
pub struct QueryTrace {
    /// Query being traced
    pub kind: Option<QueryKind>,

    /// Iterations used by the last query
    pub iterations: u32,

    /// GJK distance history
    pub gjk_steps: Vec<GjkStep>,

    /// Ray cast history
    pub ray_cast_steps: Vec<RayCastStep>,

    /// Portal history
    pub mpr_portals: Vec<MprPortal>,

    /// Resolved contact, if the last query was a penetration query
    pub penetration: Option<PenetrationContext>,

    /// Cap exhaustions seen over the lifetime of this trace (not reset by `begin`)
    pub cap_exhaustions: u32,
}

impl QueryTrace {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last query's history
    pub fn clear(&mut self) {
        self.kind = None;
        self.iterations = 0;
        self.gjk_steps.clear();
        self.ray_cast_steps.clear();
        self.mpr_portals.clear();
        self.penetration = None;
    }
}

impl QueryRecorder for QueryTrace {
    fn begin(&mut self, kind: QueryKind) {
        self.clear();
        self.kind = Some(kind);
    }

    fn iteration(&mut self, count: u32) {
        self.iterations = count;
    }

    fn gjk_step(&mut self, simplex: &[Vec2], v: Vec2, w: Vec2) {
        self.gjk_steps.push(GjkStep { simplex: simplex.to_vec(), v, w });
    }

    fn ray_cast_step(&mut self, x: Vec2, p: Vec2, set_p: &[Vec2], v: Vec2) {
        self.ray_cast_steps.push(RayCastStep { x, p, set_p: set_p.to_vec(), v });
    }

    fn mpr_step(&mut self, portal: MprPortal) {
        self.mpr_portals.push(portal);
    }

    fn penetration(&mut self, context: PenetrationContext) {
        self.penetration = Some(context);
    }

    fn cap_exhausted(&mut self, _kind: QueryKind) {
        self.cap_exhaustions += 1;
    }
}
