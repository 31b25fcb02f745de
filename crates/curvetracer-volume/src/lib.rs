#![warn(missing_docs)]

//! Label map volumes and voxel sampling for curvetracer.
//!
//! A [`LabelVolume`] pairs a [`VoxelGrid`] with its world-to-grid affine
//! matrix. Sampling maps a world point through the matrix, rounds to the
//! nearest voxel (halves away from zero) and reads the scalar there. Points
//! outside the grid are reported as [`VolumeError::OutOfBounds`].
//!
//! # Example
//!
//! ```
//! use curvetracer_math::{Point3, Transform};
//! use curvetracer_volume::{LabelVolume, VoxelGrid};
//!
//! let mut grid = VoxelGrid::filled([4, 4, 4], 0.0).unwrap();
//! grid.set([1, 2, 3], 0, 5.0).unwrap();
//! let volume = LabelVolume::new("labels", grid, Transform::identity()).unwrap();
//! assert_eq!(volume.sample(&Point3::new(1.2, 1.9, 3.0)).unwrap(), 5.0);
//! ```

pub mod error;
pub mod grid;
pub mod sampler;

pub use error::{Result, VolumeError};
pub use grid::VoxelGrid;
pub use sampler::{grid_index, sample, sample_component, LabelVolume, VoxelSamples};
