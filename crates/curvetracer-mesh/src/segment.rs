//! Line segments and segment-box tests.

use curvetracer_math::{Point3, Vec3};

use crate::bbox::Aabb3;

/// A line segment from `start` to `end`, parameterized by `t` in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Start point (`t = 0`).
    pub start: Point3,
    /// End point (`t = 1`).
    pub end: Point3,
    /// `end - start`, not normalized.
    pub direction: Vec3,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Segment {
    /// Create a segment between two points.
    pub fn new(start: Point3, end: Point3) -> Self {
        let direction = end - start;
        let inv = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        let sign = [
            if inv.x < 0.0 { 1 } else { 0 },
            if inv.y < 0.0 { 1 } else { 0 },
            if inv.z < 0.0 { 1 } else { 0 },
        ];
        Self {
            start,
            end,
            direction,
            inv_direction: inv,
            sign,
        }
    }

    /// Segment length.
    pub fn length(&self) -> f64 {
        self.direction.norm()
    }

    /// Whether start and end coincide.
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::zeros()
    }

    /// Evaluate the segment's supporting line at parameter `t`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.start + t * self.direction
    }

    /// Test the supporting line against an AABB using the slab method,
    /// restricted to parameters in `[t_lo, t_hi]`.
    ///
    /// Returns the clipped `(t_min, t_max)` overlap, or `None`.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3, t_lo: f64, t_hi: f64) -> Option<(f64, f64)> {
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[self.sign[0]].x - self.start.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.start.x) * self.inv_direction.x;

        let mut t_min = tx1;
        let mut t_max = tx2;

        let ty1 = (bounds[self.sign[1]].y - self.start.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.start.y) * self.inv_direction.y;

        t_min = t_min.max(ty1);
        t_max = t_max.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.start.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.start.z) * self.inv_direction.z;

        t_min = t_min.max(tz1);
        t_max = t_max.min(tz2);

        if t_max >= t_min && t_max >= t_lo && t_min <= t_hi {
            Some((t_min.max(t_lo), t_max.min(t_hi)))
        } else {
            None
        }
    }
}

/// A segment-triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Parameter along the segment (0 at start, 1 at end).
    pub t: f64,
    /// Intersection point on the segment's supporting line.
    pub point: Point3,
    /// Index of the triangle that was hit.
    pub triangle: usize,
}

impl SegmentHit {
    /// Order hits by `t`, then by triangle index.
    pub fn cmp_order(&self, other: &Self) -> std::cmp::Ordering {
        self.t
            .total_cmp(&other.t)
            .then(self.triangle.cmp(&other.triangle))
    }
}
