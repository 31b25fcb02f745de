//! Axis-aligned bounding boxes.

use curvetracer_math::{Point3, Vec3};

/// Axis-aligned box `[min, max]`. The empty box has `min > max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Box with the given corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// The box containing nothing; any inclusion replaces it.
    pub fn empty() -> Self {
        let inf = f64::INFINITY;
        Self::new(Point3::new(inf, inf, inf), Point3::new(-inf, -inf, -inf))
    }

    /// Smallest box containing all `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.include_point(p);
        }
        aabb
    }

    /// Whether no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow to contain `p`.
    pub fn include_point(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grow to contain `other`.
    pub fn include_aabb(&mut self, other: &Aabb3) {
        if !other.is_empty() {
            self.include_point(&other.min);
            self.include_point(&other.max);
        }
    }

    /// A copy grown by `tol` in all directions.
    pub fn expanded(&self, tol: f64) -> Self {
        let d = Vec3::repeat(tol);
        Self::new(self.min - d, self.max + d)
    }

    /// Box center.
    pub fn center(&self) -> Point3 {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Box extent along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Surface area, zero for an empty box.
    pub fn surface_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.extent();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}
