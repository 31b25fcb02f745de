//! Bounding Volume Hierarchy over mesh triangles.
//!
//! Uses Surface Area Heuristic (SAH) for construction.

use log::debug;

use curvetracer_math::Point3;

use crate::bbox::Aabb3;
use crate::intersect::intersect_triangle;
use crate::mesh::SurfaceMesh;
use crate::segment::{Segment, SegmentHit};

/// A BVH node - either a leaf containing triangles or an internal node with children.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Triangle indices contained in this leaf.
        triangles: Vec<usize>,
    },
    /// Internal node with two children.
    Internal {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// The AABB of this node.
    pub fn aabb(&self) -> &Aabb3 {
        match self {
            BvhNode::Leaf { aabb, .. } => aabb,
            BvhNode::Internal { aabb, .. } => aabb,
        }
    }
}

type TriangleData = (usize, Aabb3, Point3);

/// Bounding Volume Hierarchy for accelerated segment-mesh intersection.
#[derive(Debug, Clone)]
pub struct Bvh {
    root: Option<BvhNode>,
    mesh: SurfaceMesh,
}

impl Bvh {
    /// Build a BVH over the triangles of `mesh` using SAH construction.
    pub fn build(mesh: &SurfaceMesh) -> Self {
        let mut tri_data: Vec<TriangleData> = mesh
            .triangles()
            .enumerate()
            .map(|(idx, tri)| {
                let aabb = tri.aabb();
                (idx, aabb, aabb.center())
            })
            .collect();

        let root = if tri_data.is_empty() {
            None
        } else {
            Some(build_node(&mut tri_data))
        };

        debug!(
            "built BVH over {} triangles ({} nodes)",
            mesh.num_triangles(),
            root.as_ref().map_or(0, count_nodes)
        );

        Self {
            root,
            mesh: mesh.clone(),
        }
    }

    /// All intersections of `seg` with the mesh, sorted by `t` then triangle index.
    ///
    /// `tolerance` is in world units, see [`intersect_triangle`].
    pub fn intersect_segment(&self, seg: &Segment, tolerance: f64) -> Vec<SegmentHit> {
        let mut hits = Vec::new();
        if seg.is_degenerate() {
            return hits;
        }

        if let Some(ref root) = self.root {
            let slack = tolerance / seg.length();
            self.trace_node(seg, tolerance, slack, root, &mut hits);
        }

        hits.sort_by(SegmentHit::cmp_order);
        hits
    }

    /// The first intersection along `seg`: smallest `t`, then smallest triangle index.
    pub fn first_hit(&self, seg: &Segment, tolerance: f64) -> Option<SegmentHit> {
        if seg.is_degenerate() {
            return None;
        }
        let mut closest: Option<SegmentHit> = None;

        if let Some(ref root) = self.root {
            let slack = tolerance / seg.length();
            self.trace_node_closest(seg, tolerance, slack, root, &mut closest);
        }

        closest
    }

    fn trace_node(
        &self,
        seg: &Segment,
        tolerance: f64,
        slack: f64,
        node: &BvhNode,
        hits: &mut Vec<SegmentHit>,
    ) {
        if seg
            .intersect_aabb(&node.aabb().expanded(tolerance), -slack, 1.0 + slack)
            .is_none()
        {
            return;
        }
        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &idx in triangles {
                    if let Some(hit) = self.test_triangle(seg, idx, tolerance) {
                        hits.push(hit);
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                self.trace_node(seg, tolerance, slack, left, hits);
                self.trace_node(seg, tolerance, slack, right, hits);
            }
        }
    }

    /// Trace the segment, keeping only the first hit in `(t, triangle)` order.
    fn trace_node_closest(
        &self,
        seg: &Segment,
        tolerance: f64,
        slack: f64,
        node: &BvhNode,
        closest: &mut Option<SegmentHit>,
    ) {
        let Some((t_min, _)) =
            seg.intersect_aabb(&node.aabb().expanded(tolerance), -slack, 1.0 + slack)
        else {
            return;
        };
        // Equal entry parameters may still hold a lower triangle index.
        if closest.is_some_and(|c| t_min > c.t) {
            return;
        }

        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &idx in triangles {
                    if let Some(hit) = self.test_triangle(seg, idx, tolerance) {
                        let better = match closest {
                            Some(c) => hit.cmp_order(c).is_lt(),
                            None => true,
                        };
                        if better {
                            *closest = Some(hit);
                        }
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                // Visit children in order of AABB entry distance
                let entry = |n: &BvhNode| {
                    seg.intersect_aabb(&n.aabb().expanded(tolerance), -slack, 1.0 + slack)
                        .map(|(t, _)| t)
                };
                match (entry(left), entry(right)) {
                    (Some(lt), Some(rt)) => {
                        if lt <= rt {
                            self.trace_node_closest(seg, tolerance, slack, left, closest);
                            self.trace_node_closest(seg, tolerance, slack, right, closest);
                        } else {
                            self.trace_node_closest(seg, tolerance, slack, right, closest);
                            self.trace_node_closest(seg, tolerance, slack, left, closest);
                        }
                    }
                    (Some(_), None) => {
                        self.trace_node_closest(seg, tolerance, slack, left, closest);
                    }
                    (None, Some(_)) => {
                        self.trace_node_closest(seg, tolerance, slack, right, closest);
                    }
                    (None, None) => {}
                }
            }
        }
    }

    fn test_triangle(&self, seg: &Segment, idx: usize, tolerance: f64) -> Option<SegmentHit> {
        let tri = self.mesh.triangle(idx);
        intersect_triangle(seg, &tri, tolerance).map(|t| SegmentHit {
            t,
            point: seg.at(t),
            triangle: idx,
        })
    }

    /// The mesh this BVH was built over.
    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    /// Get a reference to the root node, if any.
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }
}

fn count_nodes(node: &BvhNode) -> usize {
    match node {
        BvhNode::Leaf { .. } => 1,
        BvhNode::Internal { left, right, .. } => 1 + count_nodes(left) + count_nodes(right),
    }
}

/// Build a BVH node recursively using SAH.
fn build_node(tri_data: &mut [TriangleData]) -> BvhNode {
    let mut bounds = Aabb3::empty();
    for (_, aabb, _) in tri_data.iter() {
        bounds.include_aabb(aabb);
    }

    // Base case: small number of triangles -> leaf
    if tri_data.len() <= 4 {
        return BvhNode::Leaf {
            aabb: bounds,
            triangles: tri_data.iter().map(|(id, _, _)| *id).collect(),
        };
    }

    let mid = match find_best_split(tri_data, &bounds) {
        Some((axis, pos)) => partition_triangles(tri_data, axis, pos),
        None => 0,
    };

    // Fall back to a median split when SAH cannot separate the centroids.
    // Sorting by index keeps the tree independent of the input permutation.
    let mid = if mid == 0 || mid == tri_data.len() {
        tri_data.sort_by_key(|(id, _, _)| *id);
        tri_data.len() / 2
    } else {
        mid
    };

    let (left_data, right_data) = tri_data.split_at_mut(mid);

    BvhNode::Internal {
        aabb: bounds,
        left: Box::new(build_node(left_data)),
        right: Box::new(build_node(right_data)),
    }
}

fn axis_value(p: &Point3, axis: usize) -> f64 {
    match axis {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

/// Find the best split axis and position using SAH.
fn find_best_split(tri_data: &[TriangleData], bounds: &Aabb3) -> Option<(usize, f64)> {
    const NUM_BUCKETS: usize = 12;

    let extent = bounds.extent();
    let total_area = bounds.surface_area();

    let mut best: Option<(f64, usize, f64)> = None;

    for axis in 0..3 {
        let axis_extent = axis_value(&Point3::from(extent), axis);
        if axis_extent < 1e-10 {
            continue;
        }
        let axis_min = axis_value(&bounds.min, axis);

        let mut bucket_counts = [0usize; NUM_BUCKETS];
        let mut bucket_bounds = [Aabb3::empty(); NUM_BUCKETS];

        for (_, aabb, centroid) in tri_data {
            let c = axis_value(centroid, axis);
            let b = ((c - axis_min) / axis_extent * NUM_BUCKETS as f64) as usize;
            let b = b.min(NUM_BUCKETS - 1);

            bucket_counts[b] += 1;
            bucket_bounds[b].include_aabb(aabb);
        }

        // Sweep to find best split
        for split in 1..NUM_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for i in 0..split {
                left_count += bucket_counts[i];
                left_bounds.include_aabb(&bucket_bounds[i]);
            }

            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for i in split..NUM_BUCKETS {
                right_count += bucket_counts[i];
                right_bounds.include_aabb(&bucket_bounds[i]);
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            // SAH cost: traversal + P(left) * N_left + P(right) * N_right
            let cost = if total_area > 0.0 {
                0.125
                    + left_bounds.surface_area() / total_area * left_count as f64
                    + right_bounds.surface_area() / total_area * right_count as f64
            } else {
                (left_count.max(right_count)) as f64
            };

            if best.map_or(true, |(c, _, _)| cost < c) {
                let pos = axis_min + (split as f64 / NUM_BUCKETS as f64) * axis_extent;
                best = Some((cost, axis, pos));
            }
        }
    }

    best.map(|(_, axis, pos)| (axis, pos))
}

/// Partition triangles by centroid along an axis.
fn partition_triangles(tri_data: &mut [TriangleData], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = tri_data.len();

    while left < right {
        if axis_value(&tri_data[left].2, axis) < pos {
            left += 1;
        } else {
            right -= 1;
            tri_data.swap(left, right);
        }
    }

    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvetracer_math::Vec3;

    /// Closed axis-aligned box mesh, 12 triangles with outward winding.
    fn make_box(size: f64) -> SurfaceMesh {
        let s = size;
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(s, 0.0, 0.0),
            Point3::new(s, s, 0.0),
            Point3::new(0.0, s, 0.0),
            Point3::new(0.0, 0.0, s),
            Point3::new(s, 0.0, s),
            Point3::new(s, s, s),
            Point3::new(0.0, s, s),
        ];
        let t = vec![
            [0, 2, 1], [0, 3, 2], // bottom
            [4, 5, 6], [4, 6, 7], // top
            [0, 1, 5], [0, 5, 4], // front
            [2, 3, 7], [2, 7, 6], // back
            [1, 2, 6], [1, 6, 5], // right
            [0, 4, 7], [0, 7, 3], // left
        ];
        SurfaceMesh::new(v, t).unwrap()
    }

    /// A grid of small triangles in the z = 0 plane, enough to force internal nodes.
    fn make_plane_grid(n: usize) -> SurfaceMesh {
        let mut v = Vec::new();
        let mut t = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                v.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let row = (n + 1) as u32;
        for j in 0..n as u32 {
            for i in 0..n as u32 {
                let a = j * row + i;
                t.push([a, a + 1, a + row + 1]);
                t.push([a, a + row + 1, a + row]);
            }
        }
        SurfaceMesh::new(v, t).unwrap()
    }

    #[test]
    fn test_bvh_build() {
        let bvh = Bvh::build(&make_box(10.0));
        assert!(bvh.root().is_some());
        assert!(matches!(bvh.root(), Some(BvhNode::Internal { .. })));
    }

    #[test]
    fn test_empty_mesh_has_no_root() {
        let mesh = SurfaceMesh::new(vec![], vec![]).unwrap();
        let bvh = Bvh::build(&mesh);
        assert!(bvh.root().is_none());
        let seg = Segment::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert!(bvh.intersect_segment(&seg, 0.001).is_empty());
        assert!(bvh.first_hit(&seg, 0.001).is_none());
    }

    #[test]
    fn test_segment_through_box() {
        let bvh = Bvh::build(&make_box(10.0));
        let seg = Segment::new(Point3::new(3.0, 4.0, -5.0), Point3::new(3.0, 4.0, 15.0));

        let hits = bvh.intersect_segment(&seg, 0.001);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].point.z - 0.0).abs() < 1e-8);
        assert!((hits[1].point.z - 10.0).abs() < 1e-8);
        assert!(hits[0].triangle < 2);
        assert!((2..4).contains(&hits[1].triangle));
    }

    #[test]
    fn test_segment_ending_inside_box() {
        let bvh = Bvh::build(&make_box(10.0));
        let seg = Segment::new(Point3::new(5.0, 3.0, 20.0), Point3::new(5.0, 3.0, 5.0));
        let hits = bvh.intersect_segment(&seg, 0.001);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].triangle, 2);
        assert!((hits[0].point.z - 10.0).abs() < 1e-8);
    }

    #[test]
    fn test_segment_miss() {
        let bvh = Bvh::build(&make_box(10.0));
        let seg = Segment::new(Point3::new(50.0, 50.0, -5.0), Point3::new(50.0, 50.0, 15.0));
        assert!(bvh.intersect_segment(&seg, 0.001).is_empty());
        assert!(bvh.first_hit(&seg, 0.001).is_none());
    }

    #[test]
    fn test_first_hit_matches_sorted_hits() {
        let bvh = Bvh::build(&make_box(10.0));
        let segs = [
            Segment::new(Point3::new(-5.0, -4.0, -3.0), Point3::new(15.0, 14.0, 13.0)),
            Segment::new(Point3::new(5.0, 15.0, 5.0), Point3::new(5.0, -5.0, 5.0)),
            Segment::new(Point3::new(2.5, 7.5, 12.0), Point3::new(2.5, 7.5, -2.0)),
        ];
        for seg in &segs {
            let all = bvh.intersect_segment(seg, 0.001);
            assert_eq!(bvh.first_hit(seg, 0.001), all.first().copied());
        }
    }

    #[test]
    fn test_shared_diagonal_tie_breaks_to_lower_index() {
        // The segment crosses the diagonal shared by triangles 0 and 1 of the top face.
        let bvh = Bvh::build(&make_box(10.0));
        let seg = Segment::new(Point3::new(5.0, 5.0, 20.0), Point3::new(5.0, 5.0, 15.0));
        let long = Segment::new(seg.start, Point3::new(5.0, 5.0, 5.0));
        assert!(bvh.first_hit(&seg, 0.001).is_none());

        let hits = bvh.intersect_segment(&long, 0.001);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].t, hits[1].t);
        assert_eq!((hits[0].triangle, hits[1].triangle), (2, 3));
        assert_eq!(bvh.first_hit(&long, 0.001).unwrap().triangle, 2);
    }

    #[test]
    fn test_large_grid_matches_brute_force() {
        let mesh = make_plane_grid(8);
        let bvh = Bvh::build(&mesh);
        assert!(matches!(bvh.root(), Some(BvhNode::Internal { .. })));

        let start = Point3::new(3.4, 5.4, 4.0);
        let seg = Segment::new(start, start + Vec3::new(0.4, -0.2, -8.0));
        let hits = bvh.intersect_segment(&seg, 0.001);

        let brute: Vec<usize> = (0..mesh.num_triangles())
            .filter(|&i| intersect_triangle(&seg, &mesh.triangle(i), 0.001).is_some())
            .collect();
        assert_eq!(hits.len(), brute.len());
        assert_eq!(hits.len(), 1);
        assert_eq!(bvh.first_hit(&seg, 0.001).unwrap().triangle, brute[0]);
    }
}
