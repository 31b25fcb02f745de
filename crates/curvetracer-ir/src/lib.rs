//! Scene snapshots for curvetracer.
//!
//! This crate defines the plain-data document a host hands to the
//! curvetracer routines: a label map volume, a trajectory of labeled
//! fiducial points, and a hierarchy of surface models. It mirrors the
//! host's node types but carries no behavior; conversion into the
//! geometric types happens in the `curvetracer` crate.
//!
//! Every entity is optional, matching a host scene where nodes may not
//! have been selected yet.

use serde::{Deserialize, Serialize};

/// 3D vector with f64 components (world units, conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A 4x4 matrix stored as four rows.
pub type Matrix4Rows = [[f64; 4]; 4];

fn default_components() -> usize {
    1
}

/// A label map volume: voxel data plus its placement in world space.
///
/// Exactly one of `ras_to_ijk` (world to grid) or `ijk_to_ras`
/// (grid to world) is expected; `ras_to_ijk` wins if both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMapNode {
    /// Node name.
    pub name: String,
    /// Grid dimensions `[nx, ny, nz]`.
    pub dims: [usize; 3],
    /// Scalar components per voxel.
    #[serde(default = "default_components")]
    pub components: usize,
    /// World (RAS) to grid (IJK) matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ras_to_ijk: Option<Matrix4Rows>,
    /// Grid (IJK) to world (RAS) matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ijk_to_ras: Option<Matrix4Rows>,
    /// Voxel values, x fastest, components interleaved.
    pub data: Vec<f64>,
}

/// One fiducial control point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fiducial {
    /// Point label (e.g. "F-1").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// World position.
    pub position: Vec3,
}

/// An ordered list of fiducials forming a trajectory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FiducialNode {
    /// Node name.
    pub name: String,
    /// Control points in trajectory order.
    #[serde(default)]
    pub points: Vec<Fiducial>,
}

/// Triangle mesh buffers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshData {
    /// Flat vertex positions `[x0, y0, z0, x1, ...]`.
    pub vertices: Vec<f64>,
    /// Flat triangle indices `[i0, i1, i2, ...]`.
    pub indices: Vec<u32>,
}

/// A model node; `mesh` is absent when no surface is associated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelNode {
    /// Model name, shown as the structure label.
    pub name: String,
    /// Associated surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshData>,
}

/// A named group of models.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelHierarchyNode {
    /// Hierarchy name.
    pub name: String,
    /// Child models in display order.
    #[serde(default)]
    pub children: Vec<ModelNode>,
}

/// A scene snapshot, the `.json` input of the curvetracer tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Format version string (e.g. "0.1").
    pub version: String,
    /// Label map to sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_map: Option<LabelMapNode>,
    /// Trajectory fiducials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<FiducialNode>,
    /// Structures to measure entry angles against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<ModelHierarchyNode>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            label_map: None,
            trajectory: None,
            models: None,
        }
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
