//! World-space nearest-voxel sampling.

use curvetracer_math::{Point3, Transform};
use log::debug;

use crate::error::{Result, VolumeError};
use crate::grid::VoxelGrid;

/// Round a fractional grid coordinate to an integer index.
///
/// Halves round away from zero. Non-finite or huge values map to
/// `i64::MIN` so they always fail the bounds check.
fn round_index(v: f64) -> i64 {
    let r = v.round();
    if r.is_finite() && r.abs() < i64::MAX as f64 {
        r as i64
    } else {
        i64::MIN
    }
}

/// Map a world point to the nearest voxel index of `world_to_grid`.
///
/// The point is homogenized to `(x, y, z, 1)` and multiplied by the matrix;
/// each resulting coordinate is rounded half away from zero.
pub fn grid_index(world_to_grid: &Transform, point: &Point3) -> [i64; 3] {
    let ijk = world_to_grid.apply_point(point);
    [round_index(ijk.x), round_index(ijk.y), round_index(ijk.z)]
}

/// Sample component 0 of `grid` at the voxel nearest to `point`.
pub fn sample(grid: &VoxelGrid, world_to_grid: &Transform, point: &Point3) -> Result<f64> {
    sample_component(grid, world_to_grid, point, 0)
}

/// Sample one component of `grid` at the voxel nearest to `point`.
pub fn sample_component(
    grid: &VoxelGrid,
    world_to_grid: &Transform,
    point: &Point3,
    component: usize,
) -> Result<f64> {
    grid.get(grid_index(world_to_grid, point), component)
}

/// A voxel grid with its world-to-grid transform (a label map volume).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    /// Display name.
    pub name: String,
    grid: VoxelGrid,
    world_to_grid: Transform,
}

impl LabelVolume {
    /// Create a volume from a grid and a world-to-grid (RAS to IJK) matrix.
    pub fn new(name: impl Into<String>, grid: VoxelGrid, world_to_grid: Transform) -> Result<Self> {
        if !world_to_grid.is_invertible() {
            return Err(VolumeError::SingularTransform);
        }
        let name = name.into();
        debug!(
            "label volume '{}': dims {:?}, {} component(s)",
            name,
            grid.dims(),
            grid.components()
        );
        Ok(Self {
            name,
            grid,
            world_to_grid,
        })
    }

    /// Create a volume from a grid-to-world (IJK to RAS) matrix.
    pub fn from_grid_to_world(
        name: impl Into<String>,
        grid: VoxelGrid,
        grid_to_world: &Transform,
    ) -> Result<Self> {
        let world_to_grid = grid_to_world
            .inverse()
            .ok_or(VolumeError::SingularTransform)?;
        Self::new(name, grid, world_to_grid)
    }

    /// The voxel grid.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// The world-to-grid matrix.
    pub fn world_to_grid(&self) -> &Transform {
        &self.world_to_grid
    }

    /// Whether the underlying grid holds voxels.
    pub fn has_image_data(&self) -> bool {
        self.grid.has_image_data()
    }

    /// Nearest voxel index for a world point.
    pub fn grid_index(&self, point: &Point3) -> [i64; 3] {
        grid_index(&self.world_to_grid, point)
    }

    /// Sample component 0 at a world point.
    pub fn sample(&self, point: &Point3) -> Result<f64> {
        sample(&self.grid, &self.world_to_grid, point)
    }

    /// Lazily sample component 0 at each point, aligned with `points`.
    pub fn samples<'a>(&'a self, points: &'a [Point3]) -> VoxelSamples<'a> {
        VoxelSamples {
            volume: self,
            points,
            next: 0,
        }
    }
}

/// Iterator over per-point voxel samples.
///
/// Each item is computed when requested. Out-of-bounds errors carry the
/// index of the point that produced them.
#[derive(Debug, Clone)]
pub struct VoxelSamples<'a> {
    volume: &'a LabelVolume,
    points: &'a [Point3],
    next: usize,
}

impl Iterator for VoxelSamples<'_> {
    type Item = Result<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let point = self.points.get(self.next)?;
        let index = self.next;
        self.next += 1;
        Some(self.volume.sample(point).map_err(|e| e.at_point(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for VoxelSamples<'_> {}
