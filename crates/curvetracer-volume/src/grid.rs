//! Regular 3D scalar grid.

use crate::error::{Result, VolumeError};

/// A regular voxel grid of `f64` scalars.
///
/// Storage is x-fastest, then y, then z, with components interleaved per
/// voxel: `index = ((k * ny + j) * nx + i) * components + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    dims: [usize; 3],
    components: usize,
    data: Vec<f64>,
}

impl VoxelGrid {
    /// Create a grid, checking that `data` matches `dims` and `components`.
    pub fn new(dims: [usize; 3], components: usize, data: Vec<f64>) -> Result<Self> {
        if components == 0 {
            return Err(VolumeError::InvalidInput(
                "grid must have at least one component".into(),
            ));
        }
        let expected = voxel_total(dims, components)?;
        if data.len() != expected {
            return Err(VolumeError::InvalidInput(format!(
                "grid {:?} x {} needs {} values, got {}",
                dims,
                components,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            dims,
            components,
            data,
        })
    }

    /// Single-component grid filled with `value`.
    pub fn filled(dims: [usize; 3], value: f64) -> Result<Self> {
        let len = voxel_total(dims, 1)?;
        Self::new(dims, 1, vec![value; len])
    }

    /// Grid dimensions `[nx, ny, nz]`.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Scalar components per voxel.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Raw data in storage order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of voxels.
    pub fn voxel_count(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Whether the grid holds any voxels.
    pub fn has_image_data(&self) -> bool {
        self.voxel_count() > 0
    }

    /// Whether `index` addresses a voxel of this grid.
    pub fn contains(&self, index: [i64; 3]) -> bool {
        index
            .iter()
            .zip(self.dims.iter())
            .all(|(&i, &d)| i >= 0 && (i as u64) < d as u64)
    }

    fn offset(&self, [i, j, k]: [usize; 3], component: usize) -> usize {
        ((k * self.dims[1] + j) * self.dims[0] + i) * self.components + component
    }

    /// Value at `index`, component `component`.
    pub fn get(&self, index: [i64; 3], component: usize) -> Result<f64> {
        if component >= self.components {
            return Err(VolumeError::ComponentOutOfRange {
                component,
                components: self.components,
            });
        }
        if !self.contains(index) {
            return Err(VolumeError::OutOfBounds {
                point: None,
                index,
                dims: self.dims,
            });
        }
        let ijk = [index[0] as usize, index[1] as usize, index[2] as usize];
        Ok(self.data[self.offset(ijk, component)])
    }

    /// Set the value at `index`, component `component`.
    pub fn set(&mut self, index: [usize; 3], component: usize, value: f64) -> Result<()> {
        if component >= self.components {
            return Err(VolumeError::ComponentOutOfRange {
                component,
                components: self.components,
            });
        }
        let signed = [index[0] as i64, index[1] as i64, index[2] as i64];
        if !self.contains(signed) {
            return Err(VolumeError::OutOfBounds {
                point: None,
                index: signed,
                dims: self.dims,
            });
        }
        let offset = self.offset(index, component);
        self.data[offset] = value;
        Ok(())
    }
}

/// `nx * ny * nz * components`, or an error if it overflows.
fn voxel_total(dims: [usize; 3], components: usize) -> Result<usize> {
    dims.iter()
        .try_fold(components, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| VolumeError::InvalidInput(format!("grid {dims:?} is too large")))
}
