//! Scene snapshots through conversion, sampling, and the angle table.

use curvetracer::{
    angle_table, sample_trajectory, validate_inputs, BvhCache, CurveTracerError, EntryAngle,
    Scene, SceneInputs, Settings, VolumeError,
};

const SCENE: &str = r#"{
  "version": "0.1",
  "label_map": {
    "name": "segmentation",
    "dims": [4, 4, 4],
    "ras_to_ijk": [
      [-1.0, 0.0, 0.0, 3.0],
      [0.0, 1.0, 0.0, 0.0],
      [0.0, 0.0, 1.0, 0.0],
      [0.0, 0.0, 0.0, 1.0]
    ],
    "data": [
      0,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0,
      0,0,0,0, 0,1,1,0, 0,1,1,0, 0,0,0,0,
      0,0,0,0, 0,2,2,0, 0,2,2,0, 0,0,0,0,
      0,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0
    ]
  },
  "trajectory": {
    "name": "needle",
    "points": [
      { "label": "entry", "position": { "x": 2.0, "y": 1.0, "z": 3.0 } },
      { "label": "mid", "position": { "x": 1.6, "y": 1.4, "z": 2.0 } },
      { "label": "target", "position": { "x": 2.0, "y": 2.0, "z": 1.0 } }
    ]
  },
  "models": {
    "name": "anatomy",
    "children": [
      {
        "name": "skin",
        "mesh": {
          "vertices": [-10, -10, 2.5,  10, -10, 2.5,  10, 10, 2.5,  -10, 10, 2.5],
          "indices": [0, 1, 2, 0, 2, 3]
        }
      },
      { "name": "unassigned" }
    ]
  }
}"#;

fn inputs() -> SceneInputs {
    let scene = Scene::from_json(SCENE).unwrap();
    SceneInputs::from_scene(&scene).unwrap()
}

#[test]
fn samples_follow_world_to_grid_mapping() {
    let inputs = inputs();
    let volume = inputs.volume.as_ref().unwrap();
    let trajectory = inputs.trajectory.as_ref().unwrap();
    validate_inputs(Some(volume), Some(trajectory)).unwrap();

    let samples = sample_trajectory(volume, trajectory).unwrap();
    let rows: Vec<(&str, f64)> = samples
        .iter()
        .map(|s| (s.label.as_deref().unwrap_or(""), s.value))
        .collect();
    // entry -> (1, 1, 3), mid -> (1, 1, 2), target -> (1, 2, 1)
    assert_eq!(rows, vec![("entry", 0.0), ("mid", 2.0), ("target", 1.0)]);
}

#[test]
fn out_of_grid_point_is_reported() {
    let mut scene = Scene::from_json(SCENE).unwrap();
    if let Some(traj) = scene.trajectory.as_mut() {
        traj.points[1].position.x = -1.0;
    }
    let inputs = SceneInputs::from_scene(&scene).unwrap();
    let err = sample_trajectory(
        inputs.volume.as_ref().unwrap(),
        inputs.trajectory.as_ref().unwrap(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        CurveTracerError::Volume(VolumeError::OutOfBounds {
            point: Some(1),
            index: [4, 1, 2],
            dims: [4, 4, 4],
        })
    );
}

#[test]
fn angle_table_from_scene() {
    let inputs = inputs();
    let rows = angle_table(
        inputs.structures.as_ref().unwrap(),
        inputs.trajectory.as_ref(),
        &Settings::default(),
        &mut BvhCache::new(),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "skin");
    // first - last = (0, -1, 2); plane normal e2 x e1 = (0, 0, -400).
    let expected = (2.0f64 / 5.0f64.sqrt()).acos().to_degrees();
    match rows[0].angle {
        EntryAngle::Degrees(d) => assert!((180.0 - d - expected).abs() < 1e-9),
        other => panic!("unexpected angle: {other:?}"),
    }
}
