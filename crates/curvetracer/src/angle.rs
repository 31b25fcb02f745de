//! Entry angle of a trajectory into a surface mesh.
//!
//! The trajectory direction is `first - last`. The segment from `last` to
//! `first` is cast against the mesh BVH; the first triangle hit along it
//! (smallest segment parameter, then smallest triangle index) supplies the
//! surface normal `e2 × e1`. The result is the angle between that normal
//! and the trajectory direction, in degrees.

use curvetracer_math::{angle_between_degrees, Point3, Tolerance, Vec3};
use curvetracer_mesh::{Bvh, Segment, SurfaceMesh};
use log::debug;

use crate::cache::BvhCache;
use crate::error::{CurveTracerError, Result};
use crate::settings::{NoIntersectionPolicy, Settings};
use crate::trajectory::Trajectory;

/// Outcome of an entry angle computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryAngle {
    /// Mesh or trajectory endpoints were not supplied.
    Undefined,
    /// The trajectory segment does not touch the mesh.
    NoIntersection,
    /// Angle between the hit triangle's normal and the trajectory, in `[0, 180]`.
    Degrees(f64),
}

impl EntryAngle {
    /// The angle, if one was computed.
    pub fn degrees(&self) -> Option<f64> {
        match self {
            EntryAngle::Degrees(d) => Some(*d),
            _ => None,
        }
    }

    /// The angle, with `NoIntersection` reported as 0.0.
    pub fn degrees_or_sentinel(&self) -> Option<f64> {
        match self {
            EntryAngle::Undefined => None,
            EntryAngle::NoIntersection => Some(0.0),
            EntryAngle::Degrees(d) => Some(*d),
        }
    }

    /// The angle as reported under `policy`.
    pub fn resolve(&self, policy: NoIntersectionPolicy) -> Option<f64> {
        match policy {
            NoIntersectionPolicy::Empty => self.degrees(),
            NoIntersectionPolicy::Zero => self.degrees_or_sentinel(),
        }
    }

    /// Whether the trajectory hit the mesh.
    pub fn is_hit(&self) -> bool {
        matches!(self, EntryAngle::Degrees(_))
    }
}

/// Compute the entry angle of the trajectory `first`..`last` into `mesh`.
///
/// Builds a fresh BVH; use [`entry_angle_cached`] to reuse one across calls.
pub fn entry_angle(
    mesh: Option<&SurfaceMesh>,
    first: Option<Point3>,
    last: Option<Point3>,
    settings: &Settings,
) -> Result<EntryAngle> {
    settings.validate()?;
    let (Some(mesh), Some(first), Some(last)) = (mesh, first, last) else {
        return Ok(EntryAngle::Undefined);
    };
    check_direction(&first, &last)?;
    let bvh = Bvh::build(mesh);
    entry_angle_with_bvh(&bvh, &first, &last, settings)
}

/// Like [`entry_angle`], fetching the BVH that `cache` holds for
/// `structure`.
pub fn entry_angle_cached(
    cache: &mut BvhCache,
    structure: &str,
    mesh: Option<&SurfaceMesh>,
    first: Option<Point3>,
    last: Option<Point3>,
    settings: &Settings,
) -> Result<EntryAngle> {
    settings.validate()?;
    let (Some(mesh), Some(first), Some(last)) = (mesh, first, last) else {
        return Ok(EntryAngle::Undefined);
    };
    check_direction(&first, &last)?;
    let bvh = cache.get_or_build(structure, mesh);
    entry_angle_with_bvh(&bvh, &first, &last, settings)
}

/// Entry angle against an already built BVH.
pub fn entry_angle_with_bvh(
    bvh: &Bvh,
    first: &Point3,
    last: &Point3,
    settings: &Settings,
) -> Result<EntryAngle> {
    settings.validate()?;
    let traj = check_direction(first, last)?;
    let seg = Segment::new(*last, *first);

    let Some(hit) = bvh.first_hit(&seg, settings.tolerance) else {
        debug!("trajectory does not intersect mesh");
        return Ok(EntryAngle::NoIntersection);
    };

    let normal = triangle_normal(bvh.mesh(), hit.triangle)?;
    let degrees = angle_between_degrees(&normal, &traj).ok_or_else(|| {
        CurveTracerError::InvalidInput("trajectory direction is not finite".to_string())
    })?;
    debug!(
        "first hit: triangle {} at t = {:.6}, angle {:.6}°",
        hit.triangle, hit.t, degrees
    );
    Ok(EntryAngle::Degrees(degrees))
}

/// Entry angle using the first and last points of `trajectory`.
pub fn trajectory_entry_angle(
    mesh: Option<&SurfaceMesh>,
    trajectory: Option<&Trajectory>,
    settings: &Settings,
) -> Result<EntryAngle> {
    let first = trajectory.and_then(|t| t.first()).copied();
    let last = trajectory.and_then(|t| t.last()).copied();
    entry_angle(mesh, first, last, settings)
}

/// Unit normal `e2 × e1` of triangle `idx`.
///
/// Fails with `DegenerateGeometry` when the triangle has (numerically) zero
/// area.
pub fn triangle_normal(mesh: &SurfaceMesh, idx: usize) -> Result<Vec3> {
    let (e1, e2) = mesh.triangle(idx).edges();
    let n = e2.cross(&e1);
    let len = n.norm();
    if Tolerance::DEFAULT.spans_no_area(&e1, &e2) || !len.is_finite() {
        return Err(CurveTracerError::DegenerateGeometry { triangle: idx });
    }
    Ok(n / len)
}

pub(crate) fn check_direction(first: &Point3, last: &Point3) -> Result<Vec3> {
    let traj = first - last;
    let len = traj.norm();
    if len == 0.0 {
        return Err(CurveTracerError::InvalidInput(
            "trajectory has zero length (first and last points coincide)".to_string(),
        ));
    }
    if !len.is_finite() {
        return Err(CurveTracerError::InvalidInput(
            "trajectory endpoints are not finite".to_string(),
        ));
    }
    Ok(traj)
}
