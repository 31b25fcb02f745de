#![warn(missing_docs)]

//! Math types for curvetracer.
//!
//! World space is RAS millimeters, grid space is continuous IJK voxel
//! coordinates. A [`Transform`] is the 4x4 homogeneous matrix that maps
//! one into the other.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in world or grid space.
pub type Point3 = nalgebra::Point3<f64>;

/// A displacement in world or grid space.
pub type Vec3 = Vector3<f64>;

/// A 4x4 homogeneous matrix acting on column vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Row-major accessible matrix (`matrix[(row, col)]`).
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// The identity mapping.
    pub fn identity() -> Self {
        Self::from_matrix(Matrix4::identity())
    }

    /// Wrap an existing matrix.
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Build from four rows, as hosts usually serialize them.
    pub fn from_rows(rows: &[[f64; 4]; 4]) -> Self {
        Self::from_matrix(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    /// Shift by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_matrix(Matrix4::new_translation(&Vec3::new(dx, dy, dz)))
    }

    /// Per-axis scale, e.g. voxel spacing.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_matrix(Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)))
    }

    /// `self * other`: applies `other` first.
    pub fn then(&self, other: &Transform) -> Self {
        Self::from_matrix(self.matrix * other.matrix)
    }

    /// Map a point as `(x, y, z, 1)`, keeping the first three components.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let h = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(h.x, h.y, h.z)
    }

    /// The inverse mapping, or `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_invertible() {
            return None;
        }
        self.matrix.try_inverse().map(Self::from_matrix)
    }

    /// Whether the determinant is finite and non-zero.
    pub fn is_invertible(&self) -> bool {
        let det = self.matrix.determinant();
        det.is_finite() && det != 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Relative tolerance for degeneracy tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Ratio below which a cross product counts as zero, relative to the
    /// product of the input lengths.
    pub relative: f64,
}

impl Tolerance {
    /// `1e-12`.
    pub const DEFAULT: Self = Self { relative: 1e-12 };

    /// Whether `a` and `b` span no area: either is zero, or `|a × b|` is
    /// negligible next to `|a| |b|`.
    pub fn spans_no_area(&self, a: &Vec3, b: &Vec3) -> bool {
        let scale = a.norm() * b.norm();
        scale == 0.0 || a.cross(b).norm() <= self.relative * scale
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Angle between two vectors in radians, `acos((a·b) / (|a||b|))`.
///
/// Returns `None` if either vector has zero length. The cosine is clamped
/// to `[-1, 1]` so rounding never produces NaN for (anti)parallel vectors.
pub fn angle_between(a: &Vec3, b: &Vec3) -> Option<f64> {
    let denom = a.norm() * b.norm();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let cos = (a.dot(b) / denom).clamp(-1.0, 1.0);
    Some(cos.acos())
}

/// Angle between two vectors in degrees.
pub fn angle_between_degrees(a: &Vec3, b: &Vec3) -> Option<f64> {
    angle_between(a, b).map(|rad| rad * 180.0 / std::f64::consts::PI)
}
