//! Indexed triangle surface meshes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use curvetracer_math::{Point3, Vec3};

use crate::bbox::Aabb3;
use crate::error::{MeshError, Result};

/// A triangle given by its three corner positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertex positions, in winding order.
    pub v: [Point3; 3],
}

impl Triangle {
    /// Create a triangle from vertices.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self { v: [v0, v1, v2] }
    }

    /// Edge vectors from the first vertex: `(v1 - v0, v2 - v0)`.
    pub fn edges(&self) -> (Vec3, Vec3) {
        (self.v[1] - self.v[0], self.v[2] - self.v[0])
    }

    /// Twice the triangle area.
    pub fn double_area(&self) -> f64 {
        let (e1, e2) = self.edges();
        e1.cross(&e2).norm()
    }

    /// Bounding box of the three vertices.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_points(&self.v)
    }

    /// Vertex centroid.
    pub fn centroid(&self) -> Point3 {
        Point3::from((self.v[0].coords + self.v[1].coords + self.v[2].coords) / 3.0)
    }
}

/// An indexed triangle mesh representing one surface.
///
/// Triangle indices are checked against the vertex count on construction,
/// so [`SurfaceMesh::triangle`] never reads out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    vertices: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    /// Create a mesh from vertex positions and triangle connectivity.
    pub fn new(vertices: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Result<Self> {
        for (t, tri) in triangles.iter().enumerate() {
            for &index in tri {
                if index as usize >= vertices.len() {
                    return Err(MeshError::IndexOutOfRange {
                        triangle: t,
                        index,
                        vertices: vertices.len(),
                    });
                }
            }
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Create from a flat vertex array (interleaved x, y, z) and flat indices.
    pub fn from_flat(vertices: &[f64], indices: &[u32]) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::InvalidMesh(format!(
                "vertex array length {} is not a multiple of 3",
                vertices.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::InvalidMesh(format!(
                "index array length {} is not a multiple of 3",
                indices.len()
            )));
        }
        let verts = vertices
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let tris = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new(verts, tris)
    }

    /// Like [`SurfaceMesh::from_flat`] for single-precision vertex buffers.
    pub fn from_flat_f32(vertices: &[f32], indices: &[u32]) -> Result<Self> {
        let verts: Vec<f64> = vertices.iter().map(|&v| f64::from(v)).collect();
        Self::from_flat(&verts, indices)
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Triangle connectivity.
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangle `idx` with resolved vertex positions.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.num_triangles()`.
    pub fn triangle(&self, idx: usize) -> Triangle {
        let [a, b, c] = self.triangles[idx];
        Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    /// Iterate over all triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangles.len()).map(move |i| self.triangle(i))
    }

    /// Bounding box of all vertices.
    pub fn bounds(&self) -> Aabb3 {
        Aabb3::from_points(&self.vertices)
    }

    /// Hash of the vertex bit patterns and indices.
    ///
    /// Equal meshes give equal fingerprints within one build of the crate.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.vertices.len().hash(&mut hasher);
        for v in &self.vertices {
            v.x.to_bits().hash(&mut hasher);
            v.y.to_bits().hash(&mut hasher);
            v.z.to_bits().hash(&mut hasher);
        }
        self.triangles.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SurfaceMesh {
        let vertices = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ];
        SurfaceMesh::from_flat(&vertices, &[0, 1, 2, 0, 2, 3]).unwrap()
    }

    #[test]
    fn test_from_flat() {
        let mesh = quad();
        assert_eq!(mesh.num_triangles(), 2);
        let tri = mesh.triangle(1);
        assert_eq!(tri.v[2], Point3::new(0.0, 1.0, 0.0));
        assert!((tri.double_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_index_out_of_range() {
        let err = SurfaceMesh::new(vec![Point3::origin(); 2], vec![[0, 1, 2]]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                triangle: 0,
                index: 2,
                vertices: 2
            }
        );
    }

    #[test]
    fn test_flat_length_checked() {
        assert!(SurfaceMesh::from_flat(&[0.0, 1.0], &[]).is_err());
        assert!(SurfaceMesh::from_flat(&[0.0; 9], &[0, 1]).is_err());
        let f32_mesh = SurfaceMesh::from_flat_f32(&[0.0; 9], &[0, 1, 2]).unwrap();
        assert_eq!(f32_mesh.num_triangles(), 1);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = quad();
        let b = quad();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut verts = a.vertices().to_vec();
        verts[2].z = 1e-9;
        let c = SurfaceMesh::new(verts, a.indices().to_vec()).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_centroid_and_bounds() {
        let mesh = quad();
        let c = mesh.triangle(0).centroid();
        assert!((c.x - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(mesh.bounds().max, Point3::new(1.0, 1.0, 0.0));
    }
}
