//! Trajectories: ordered, labeled world-space points.

use curvetracer_math::{Point3, Vec3};

/// One labeled trajectory point.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoint {
    /// Point label, if the host assigned one.
    pub label: Option<String>,
    /// World position.
    pub position: Point3,
}

impl ControlPoint {
    /// Create a labeled point.
    pub fn new(label: impl Into<String>, position: Point3) -> Self {
        Self {
            label: Some(label.into()),
            position,
        }
    }

    /// Create an unlabeled point.
    pub fn unlabeled(position: Point3) -> Self {
        Self {
            label: None,
            position,
        }
    }
}

/// An ordered sequence of control points, e.g. a needle path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    /// Display name.
    pub name: String,
    points: Vec<ControlPoint>,
    positions: Vec<Point3>,
}

impl Trajectory {
    /// Create a trajectory from control points.
    pub fn new(name: impl Into<String>, points: Vec<ControlPoint>) -> Self {
        let positions = points.iter().map(|p| p.position).collect();
        Self {
            name: name.into(),
            points,
            positions,
        }
    }

    /// Create an unlabeled trajectory from positions.
    pub fn from_positions(name: impl Into<String>, positions: &[Point3]) -> Self {
        Self::new(
            name,
            positions.iter().copied().map(ControlPoint::unlabeled).collect(),
        )
    }

    /// Control points in order.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Point positions in order.
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trajectory has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point position.
    pub fn first(&self) -> Option<&Point3> {
        self.positions.first()
    }

    /// Last point position.
    pub fn last(&self) -> Option<&Point3> {
        self.positions.last()
    }

    /// `first - last`, the direction entry angles are measured against.
    pub fn direction(&self) -> Option<Vec3> {
        Some(self.first()? - self.last()?)
    }
}
