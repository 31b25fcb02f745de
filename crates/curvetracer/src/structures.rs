//! Per-structure entry angle table.

use curvetracer_mesh::SurfaceMesh;
use log::{debug, info};

use crate::angle::{check_direction, entry_angle_cached, EntryAngle};
use crate::cache::BvhCache;
use crate::error::Result;
use crate::settings::Settings;
use crate::trajectory::Trajectory;

/// A named structure, optionally carrying its surface mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// Display name.
    pub name: String,
    /// Surface mesh, if one is associated.
    pub mesh: Option<SurfaceMesh>,
}

impl Structure {
    /// Create a structure with a mesh.
    pub fn new(name: impl Into<String>, mesh: SurfaceMesh) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
        }
    }

    /// Create a structure without a mesh.
    pub fn without_mesh(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesh: None,
        }
    }
}

/// An ordered group of structures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureHierarchy {
    /// Display name.
    pub name: String,
    /// Children in display order.
    pub children: Vec<Structure>,
}

impl StructureHierarchy {
    /// Create a hierarchy.
    pub fn new(name: impl Into<String>, children: Vec<Structure>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Children that carry a mesh, in order.
    pub fn meshes(&self) -> impl Iterator<Item = (&str, &SurfaceMesh)> + '_ {
        self.children
            .iter()
            .filter_map(|c| c.mesh.as_ref().map(|m| (c.name.as_str(), m)))
    }
}

/// One row of the angle table.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleRow {
    /// Structure name.
    pub name: String,
    /// Entry angle into the structure.
    pub angle: EntryAngle,
}

/// Entry angle for every child of `hierarchy` that has a mesh.
///
/// Children without a mesh are skipped. A zero-length trajectory fails
/// before any structure is visited. Otherwise the first failing child aborts
/// the table and its error names the structure.
pub fn angle_table(
    hierarchy: &StructureHierarchy,
    trajectory: Option<&Trajectory>,
    settings: &Settings,
    cache: &mut BvhCache,
) -> Result<Vec<AngleRow>> {
    info!(
        "computing entry angles for {} structure(s) in '{}'",
        hierarchy.children.len(),
        hierarchy.name
    );
    settings.validate()?;

    let first = trajectory.and_then(|t| t.first()).copied();
    let last = trajectory.and_then(|t| t.last()).copied();
    if let (Some(first), Some(last)) = (&first, &last) {
        check_direction(first, last)?;
    }

    let mut rows = Vec::new();
    for (name, mesh) in hierarchy.meshes() {
        let angle = entry_angle_cached(cache, name, Some(mesh), first, last, settings)
            .map_err(|e| e.in_structure(name))?;
        debug!("{}: {:?}", name, angle);
        rows.push(AngleRow {
            name: name.to_string(),
            angle,
        });
    }
    Ok(rows)
}
