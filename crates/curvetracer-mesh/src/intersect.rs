//! Segment-triangle intersection with a world-space tolerance.
//!
//! A segment hits a triangle when the point where its supporting line
//! crosses the triangle's plane lies within `tolerance` of the triangle and
//! within `tolerance` of the segment's extent. This admits near misses at
//! shared edges and vertices.
//!
//! Segments parallel to a triangle's plane never hit it. Zero-area
//! triangles are treated as their longest edge: they are hit when the
//! segment passes within `tolerance` of that edge.

use curvetracer_math::{Point3, Tolerance, Vec3};

use crate::mesh::Triangle;
use crate::segment::Segment;

/// Intersect `seg` with `tri`, returning the segment parameter of the hit.
pub fn intersect_triangle(seg: &Segment, tri: &Triangle, tolerance: f64) -> Option<f64> {
    let len = seg.length();
    if len == 0.0 {
        return None;
    }
    let slack = tolerance / len;

    let (e1, e2) = tri.edges();
    if Tolerance::DEFAULT.spans_no_area(&e1, &e2) {
        return intersect_degenerate(seg, tri, tolerance, slack);
    }
    let edge_scale = e1.norm() * e2.norm();

    // Möller–Trumbore against the supporting line.
    let d = seg.direction;
    let pvec = d.cross(&e2);
    let det = e1.dot(&pvec);
    if det.abs() <= Tolerance::DEFAULT.relative * len * edge_scale {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = seg.start - tri.v[0];
    let u = tvec.dot(&pvec) * inv_det;
    let qvec = tvec.cross(&e1);
    let v = d.dot(&qvec) * inv_det;
    let t = e2.dot(&qvec) * inv_det;

    if !(t >= -slack && t <= 1.0 + slack) {
        return None;
    }
    if u >= 0.0 && v >= 0.0 && u + v <= 1.0 {
        return Some(t);
    }

    let p = seg.at(t);
    let q = closest_point_on_triangle(&p, tri);
    if (p - q).norm() <= tolerance {
        Some(t)
    } else {
        None
    }
}

fn intersect_degenerate(seg: &Segment, tri: &Triangle, tolerance: f64, slack: f64) -> Option<f64> {
    let edges = [(0, 1), (1, 2), (2, 0)];
    let (a, b) = edges
        .iter()
        .map(|&(i, j)| (tri.v[i], tri.v[j]))
        .fold((tri.v[0], tri.v[0]), |best, cand| {
            if (cand.1 - cand.0).norm_squared() > (best.1 - best.0).norm_squared() {
                cand
            } else {
                best
            }
        });
    let (t, p, q) = closest_points_segments(&seg.start, &seg.end, &a, &b);
    if (p - q).norm() <= tolerance && t >= -slack && t <= 1.0 + slack {
        Some(t)
    } else {
        None
    }
}

/// Closest point on a triangle to `p`.
pub fn closest_point_on_triangle(p: &Point3, tri: &Triangle) -> Point3 {
    let [a, b, c] = tri.v;
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + v * ab;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + w * ac;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + w * (c - b);
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Closest points between segments `p1-q1` and `p2-q2`.
///
/// Returns the parameter on the first segment and the two closest points.
fn closest_points_segments(
    p1: &Point3,
    q1: &Point3,
    p2: &Point3,
    q2: &Point3,
) -> (f64, Point3, Point3) {
    let d1: Vec3 = q1 - p1;
    let d2: Vec3 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t) = if a == 0.0 && e == 0.0 {
        (0.0, 0.0)
    } else if a == 0.0 {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e == 0.0 {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let mut s = if denom > 0.0 {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (s, p1 + d1 * s, p2 + d2 * t)
}
