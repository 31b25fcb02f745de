//! Voxel values along a trajectory.

use curvetracer_math::Point3;
use curvetracer_volume::{LabelVolume, VolumeError};
use log::info;

use crate::error::{CurveTracerError, Result};
use crate::trajectory::Trajectory;

/// The voxel value under one trajectory point.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelSample {
    /// Label of the control point.
    pub label: Option<String>,
    /// World position of the control point.
    pub position: Point3,
    /// Component 0 of the voxel nearest the point.
    pub value: f64,
}

/// Check that a label volume with voxels and a trajectory are present.
pub fn validate_inputs(
    volume: Option<&LabelVolume>,
    trajectory: Option<&Trajectory>,
) -> Result<()> {
    let Some(volume) = volume else {
        return Err(CurveTracerError::InvalidInput(
            "no input label map".to_string(),
        ));
    };
    if trajectory.is_none() {
        return Err(CurveTracerError::InvalidInput(
            "no input trajectory".to_string(),
        ));
    }
    if !volume.has_image_data() {
        return Err(VolumeError::NoImageData.into());
    }
    Ok(())
}

/// Sample `volume` at every point of `trajectory`, in order.
///
/// Fails on an empty trajectory, a volume without voxels, or the first
/// point that falls outside the grid.
pub fn sample_trajectory(volume: &LabelVolume, trajectory: &Trajectory) -> Result<Vec<VoxelSample>> {
    info!(
        "sampling '{}' at {} point(s) of '{}'",
        volume.name,
        trajectory.len(),
        trajectory.name
    );
    if trajectory.is_empty() {
        return Err(VolumeError::EmptyTrajectory.into());
    }
    if !volume.has_image_data() {
        return Err(VolumeError::NoImageData.into());
    }

    trajectory
        .points()
        .iter()
        .zip(volume.samples(trajectory.positions()))
        .map(|(point, value)| -> Result<VoxelSample> {
            Ok(VoxelSample {
                label: point.label.clone(),
                position: point.position,
                value: value?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::ControlPoint;
    use curvetracer_math::Transform;
    use curvetracer_volume::VoxelGrid;

    fn volume() -> LabelVolume {
        let data = (0..27).map(|v| v as f64).collect();
        let grid = VoxelGrid::new([3, 3, 3], 1, data).unwrap();
        LabelVolume::new("labels", grid, Transform::identity()).unwrap()
    }

    #[test]
    fn test_samples_follow_trajectory_order() {
        let traj = Trajectory::new(
            "path",
            vec![
                ControlPoint::new("F-1", Point3::new(0.0, 0.0, 0.0)),
                ControlPoint::new("F-2", Point3::new(2.2, 0.6, 0.0)),
                ControlPoint::unlabeled(Point3::new(0.0, 0.0, 1.9)),
            ],
        );
        let samples = sample_trajectory(&volume(), &traj).unwrap();
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0.0, 5.0, 18.0]);
        assert_eq!(samples[1].label.as_deref(), Some("F-2"));
        assert_eq!(samples[2].label, None);
    }

    #[test]
    fn test_empty_trajectory_fails() {
        let err = sample_trajectory(&volume(), &Trajectory::default()).unwrap_err();
        assert_eq!(err, CurveTracerError::Volume(VolumeError::EmptyTrajectory));
    }

    #[test]
    fn test_out_of_bounds_names_point() {
        let traj = Trajectory::from_positions(
            "path",
            &[Point3::new(1.0, 1.0, 1.0), Point3::new(3.0, 0.0, 0.0)],
        );
        let err = sample_trajectory(&volume(), &traj).unwrap_err();
        assert_eq!(
            err,
            CurveTracerError::Volume(VolumeError::OutOfBounds {
                point: Some(1),
                index: [3, 0, 0],
                dims: [3, 3, 3],
            })
        );
    }

    #[test]
    fn test_validate_inputs() {
        let vol = volume();
        let traj = Trajectory::default();
        assert!(validate_inputs(Some(&vol), Some(&traj)).is_ok());
        assert!(matches!(
            validate_inputs(None, Some(&traj)),
            Err(CurveTracerError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_inputs(Some(&vol), None),
            Err(CurveTracerError::InvalidInput(_))
        ));

        let empty = LabelVolume::new(
            "empty",
            VoxelGrid::new([0, 0, 0], 1, Vec::new()).unwrap(),
            Transform::identity(),
        )
        .unwrap();
        assert_eq!(
            validate_inputs(Some(&empty), Some(&traj)),
            Err(CurveTracerError::Volume(VolumeError::NoImageData))
        );
    }
}
