//! Error types for voxel grids and sampling.

use thiserror::Error;

/// Errors that can occur while building or sampling a label volume.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolumeError {
    /// Grid construction arguments are inconsistent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The grid has no voxels.
    #[error("volume has no image data")]
    NoImageData,

    /// Sampling was requested for a trajectory without points.
    #[error("trajectory has no points")]
    EmptyTrajectory,

    /// The world-to-grid matrix cannot be inverted.
    #[error("world-to-grid transform is singular")]
    SingularTransform,

    /// A world point maps to a voxel index outside the grid.
    #[error("{} maps to voxel {index:?}, outside grid {dims:?}", point_desc(.point))]
    OutOfBounds {
        /// Index of the offending point in the sampled sequence, if any.
        point: Option<usize>,
        /// Rounded grid index.
        index: [i64; 3],
        /// Grid dimensions.
        dims: [usize; 3],
    },

    /// The requested scalar component does not exist.
    #[error("component {component} out of range (grid has {components})")]
    ComponentOutOfRange {
        /// Requested component.
        component: usize,
        /// Components per voxel.
        components: usize,
    },
}

fn point_desc(point: &Option<usize>) -> String {
    match point {
        Some(i) => format!("point {i}"),
        None => "point".to_string(),
    }
}

impl VolumeError {
    /// Attach a point index to an out-of-bounds error.
    pub fn at_point(self, index: usize) -> Self {
        match self {
            VolumeError::OutOfBounds { index: voxel, dims, .. } => VolumeError::OutOfBounds {
                point: Some(index),
                index: voxel,
                dims,
            },
            other => other,
        }
    }
}

/// Result type for volume operations.
pub type Result<T> = std::result::Result<T, VolumeError>;
