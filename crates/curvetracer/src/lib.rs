#![warn(missing_docs)]

//! curvetracer: trajectory analysis against label maps and surface models
//!
//! Two independent routines over immutable inputs:
//!
//! - [`sample_trajectory`] reads the label map voxel under every trajectory
//!   point.
//! - [`entry_angle`] measures the angle between a trajectory and the normal
//!   of the first surface triangle it crosses; [`angle_table`] does this for
//!   every structure of a hierarchy, reusing BVHs through a [`BvhCache`].
//!
//! # Example
//!
//! ```rust
//! use curvetracer::{entry_angle, EntryAngle, Point3, Settings, SurfaceMesh};
//!
//! let mesh = SurfaceMesh::from_flat(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!     &[0, 1, 2],
//! )
//! .unwrap();
//! let first = Point3::new(0.25, 0.25, -1.0);
//! let last = Point3::new(0.25, 0.25, 1.0);
//!
//! let angle = entry_angle(Some(&mesh), Some(first), Some(last), &Settings::default()).unwrap();
//! assert_eq!(angle, EntryAngle::Degrees(0.0));
//! ```

pub mod angle;
pub mod cache;
pub mod error;
pub mod sampling;
pub mod scene;
pub mod settings;
pub mod structures;
pub mod trajectory;

pub use angle::{
    entry_angle, entry_angle_cached, entry_angle_with_bvh, trajectory_entry_angle,
    triangle_normal, EntryAngle,
};
pub use cache::BvhCache;
pub use error::{CurveTracerError, Result};
pub use sampling::{sample_trajectory, validate_inputs, VoxelSample};
pub use scene::SceneInputs;
pub use settings::{NoIntersectionPolicy, Settings};
pub use structures::{angle_table, AngleRow, Structure, StructureHierarchy};
pub use trajectory::{ControlPoint, Trajectory};

pub use curvetracer_ir::Scene;
pub use curvetracer_math::{Point3, Transform, Vec3};
pub use curvetracer_mesh::{Bvh, SurfaceMesh};
pub use curvetracer_volume::{LabelVolume, VolumeError, VoxelGrid};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_core_types_are_send_and_sync() {
        assert_send_sync::<Bvh>();
        assert_send_sync::<SurfaceMesh>();
        assert_send_sync::<LabelVolume>();
        assert_send_sync::<VoxelGrid>();
        assert_send_sync::<Transform>();
        assert_send_sync::<BvhCache>();
        assert_send_sync::<Settings>();
        assert_send_sync::<Trajectory>();
        assert_send_sync::<StructureHierarchy>();
        assert_send_sync::<EntryAngle>();
        assert_send_sync::<CurveTracerError>();
        assert_send_sync::<Scene>();
    }
}
