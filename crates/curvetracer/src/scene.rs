//! Conversion of scene snapshots into library types.

use curvetracer_ir::{FiducialNode, LabelMapNode, ModelHierarchyNode, Scene};
use curvetracer_math::{Point3, Transform};
use curvetracer_mesh::SurfaceMesh;
use curvetracer_volume::{LabelVolume, VoxelGrid};

use crate::error::{CurveTracerError, Result};
use crate::structures::{Structure, StructureHierarchy};
use crate::trajectory::{ControlPoint, Trajectory};

/// Build a label volume from a label map node.
pub fn label_volume_from_node(node: &LabelMapNode) -> Result<LabelVolume> {
    let grid = VoxelGrid::new(node.dims, node.components, node.data.clone())?;
    let volume = match (&node.ras_to_ijk, &node.ijk_to_ras) {
        (Some(rows), _) => LabelVolume::new(&node.name, grid, Transform::from_rows(rows))?,
        (None, Some(rows)) => {
            LabelVolume::from_grid_to_world(&node.name, grid, &Transform::from_rows(rows))?
        }
        (None, None) => {
            return Err(CurveTracerError::InvalidInput(format!(
                "label map '{}' has no transform",
                node.name
            )))
        }
    };
    Ok(volume)
}

/// Build a trajectory from a fiducial node.
pub fn trajectory_from_node(node: &FiducialNode) -> Trajectory {
    let points = node
        .points
        .iter()
        .map(|f| ControlPoint {
            label: f.label.clone(),
            position: Point3::new(f.position.x, f.position.y, f.position.z),
        })
        .collect();
    Trajectory::new(&node.name, points)
}

/// Build a structure hierarchy from a model hierarchy node.
pub fn hierarchy_from_node(node: &ModelHierarchyNode) -> Result<StructureHierarchy> {
    let children = node
        .children
        .iter()
        .map(|model| -> Result<Structure> {
            let mesh = model
                .mesh
                .as_ref()
                .map(|m| SurfaceMesh::from_flat(&m.vertices, &m.indices))
                .transpose()
                .map_err(|e| CurveTracerError::from(e).in_structure(&model.name))?;
            Ok(Structure {
                name: model.name.clone(),
                mesh,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(StructureHierarchy::new(&node.name, children))
}

/// The library-side view of a scene snapshot.
#[derive(Debug, Clone, Default)]
pub struct SceneInputs {
    /// Label volume, if the scene has a label map.
    pub volume: Option<LabelVolume>,
    /// Trajectory, if the scene has one.
    pub trajectory: Option<Trajectory>,
    /// Structures, if the scene has a model hierarchy.
    pub structures: Option<StructureHierarchy>,
}

impl SceneInputs {
    /// Convert every entity present in `scene`.
    pub fn from_scene(scene: &Scene) -> Result<Self> {
        Ok(Self {
            volume: scene.label_map.as_ref().map(label_volume_from_node).transpose()?,
            trajectory: scene.trajectory.as_ref().map(trajectory_from_node),
            structures: scene.models.as_ref().map(hierarchy_from_node).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvetracer_ir::{Fiducial, MeshData, ModelNode, Vec3};
    use curvetracer_mesh::MeshError;
    use curvetracer_volume::VolumeError;

    fn scale_rows(s: f64) -> [[f64; 4]; 4] {
        [
            [s, 0.0, 0.0, 0.0],
            [0.0, s, 0.0, 0.0],
            [0.0, 0.0, s, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    fn label_map() -> LabelMapNode {
        LabelMapNode {
            name: "labels".to_string(),
            dims: [2, 2, 1],
            components: 1,
            ras_to_ijk: None,
            ijk_to_ras: Some(scale_rows(2.0)),
            data: vec![0.0, 1.0, 2.0, 3.0],
        }
    }

    #[test]
    fn test_grid_to_world_is_inverted() {
        let volume = label_volume_from_node(&label_map()).unwrap();
        // World (2, 2, 0) is voxel (1, 1, 0).
        assert_eq!(volume.sample(&Point3::new(2.0, 2.0, 0.0)).unwrap(), 3.0);
    }

    #[test]
    fn test_missing_transform_rejected() {
        let mut node = label_map();
        node.ijk_to_ras = None;
        assert!(matches!(
            label_volume_from_node(&node),
            Err(CurveTracerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_singular_transform_rejected() {
        let mut node = label_map();
        node.ras_to_ijk = Some(scale_rows(0.0));
        assert_eq!(
            label_volume_from_node(&node).unwrap_err(),
            CurveTracerError::Volume(VolumeError::SingularTransform)
        );
    }

    #[test]
    fn test_trajectory_keeps_labels() {
        let node = FiducialNode {
            name: "path".to_string(),
            points: vec![
                Fiducial {
                    label: Some("F-1".to_string()),
                    position: Vec3::new(1.0, 2.0, 3.0),
                },
                Fiducial {
                    label: None,
                    position: Vec3::new(4.0, 5.0, 6.0),
                },
            ],
        };
        let traj = trajectory_from_node(&node);
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.points()[0].label.as_deref(), Some("F-1"));
        assert_eq!(traj.last(), Some(&Point3::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn test_bad_mesh_names_structure() {
        let node = ModelHierarchyNode {
            name: "anatomy".to_string(),
            children: vec![ModelNode {
                name: "broken".to_string(),
                mesh: Some(MeshData {
                    vertices: vec![0.0, 0.0, 0.0],
                    indices: vec![0, 1, 2],
                }),
            }],
        };
        match hierarchy_from_node(&node).unwrap_err() {
            CurveTracerError::Structure { name, source } => {
                assert_eq!(name, "broken");
                assert!(matches!(
                    *source,
                    CurveTracerError::Mesh(MeshError::IndexOutOfRange { .. })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_scene_converts_to_nothing() {
        let inputs = SceneInputs::from_scene(&Scene::new()).unwrap();
        assert!(inputs.volume.is_none());
        assert!(inputs.trajectory.is_none());
        assert!(inputs.structures.is_none());
    }
}
