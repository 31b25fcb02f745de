#![warn(missing_docs)]

//! Triangle surface meshes and segment intersection for curvetracer.
//!
//! # Architecture
//!
//! - [`SurfaceMesh`] - Indexed triangle mesh for one anatomical structure
//! - [`Segment`] - Line segment with precomputed slab-test data
//! - [`intersect`] - Segment-triangle tests with a world-space tolerance
//! - [`bvh`] - Bounding volume hierarchy for acceleration
//!
//! # Example
//!
//! ```
//! use curvetracer_math::Point3;
//! use curvetracer_mesh::{Bvh, Segment, SurfaceMesh};
//!
//! let mesh = SurfaceMesh::from_flat(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!     &[0, 1, 2],
//! )
//! .unwrap();
//! let bvh = Bvh::build(&mesh);
//!
//! let seg = Segment::new(Point3::new(0.2, 0.2, 1.0), Point3::new(0.2, 0.2, -1.0));
//! let hit = bvh.first_hit(&seg, 0.001).unwrap();
//! assert_eq!(hit.triangle, 0);
//! ```

pub mod bbox;
pub mod bvh;
pub mod error;
pub mod intersect;
mod mesh;
mod segment;

pub use bbox::Aabb3;
pub use bvh::{Bvh, BvhNode};
pub use error::{MeshError, Result};
pub use intersect::{closest_point_on_triangle, intersect_triangle};
pub use mesh::{SurfaceMesh, Triangle};
pub use segment::{Segment, SegmentHit};
