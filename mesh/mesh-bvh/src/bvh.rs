//! Bounding volume hierarchy over a triangle soup.

use std::time::Instant;

use mesh_types::{Aabb, DEGENERATE_AREA_RATIO, MeshBounds, Point3, Triangle, Vector3};
use tracing::{debug, info, warn};

use crate::error::{BvhError, BvhResult};
use crate::ray::{Ray, ray_triangle_intersect};
use crate::split::{LongestAxisMedian, Split, SplitStrategy};

/// Internal tree node.
///
/// `start..end` indexes the owning [`Bvh`]'s triangle array; the builder
/// reorders that array so every subtree covers a contiguous range.
#[derive(Debug)]
struct Node {
    bounds: Aabb,
    start: usize,
    end: usize,
    axis: usize,
    children: Option<(Box<Node>, Box<Node>)>,
}

/// Bounding volume hierarchy built once from a triangle soup.
///
/// Each node bounds the triangles of its subtree; leaves hold exactly one
/// triangle. The tree owns copies of its triangles and is immutable after
/// [`Bvh::load`], so it can be shared across threads by reference.
///
/// # Example
///
/// ```
/// use mesh_bvh::Bvh;
/// use mesh_types::{unit_cube, MeshTopology, Point3};
///
/// let bvh = Bvh::load(unit_cube().triangle_soup()).unwrap();
/// assert_eq!(bvh.triangle_count(), 12);
///
/// assert!(bvh.min_signed_distance(&Point3::new(0.5, 0.5, 0.5)) < 0.0);
/// assert!(bvh.min_signed_distance(&Point3::new(2.0, 0.5, 0.5)) > 0.0);
/// ```
#[derive(Debug)]
pub struct Bvh {
    triangles: Vec<Triangle>,
    root: Node,
    discarded: usize,
}

/// Borrowed view of one node of a [`Bvh`].
///
/// Returned by the hit queries and used to walk the tree.
#[derive(Debug, Clone, Copy)]
pub struct BvhNode<'a> {
    bvh: &'a Bvh,
    node: &'a Node,
}

impl<'a> BvhNode<'a> {
    /// Tight bounds of every triangle in this subtree.
    #[must_use]
    pub fn bounds(&self) -> &'a Aabb {
        &self.node.bounds
    }

    /// Every triangle in this subtree.
    #[must_use]
    pub fn elements(&self) -> &'a [Triangle] {
        &self.bvh.triangles[self.node.start..self.node.end]
    }

    /// Leaves have no children and hold a single triangle.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.node.children.is_none()
    }

    /// Split axis (0 = X, 1 = Y, 2 = Z), `None` for leaves.
    #[must_use]
    pub fn axis(&self) -> Option<usize> {
        self.node.children.as_ref().map(|_| self.node.axis)
    }

    /// Left child, `None` for leaves.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.children().map(|(l, _)| l)
    }

    /// Right child, `None` for leaves.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.children().map(|(_, r)| r)
    }

    /// Both children, `None` for leaves.
    #[must_use]
    pub fn children(&self) -> Option<(Self, Self)> {
        self.node.children.as_ref().map(|(l, r)| {
            (
                Self { bvh: self.bvh, node: l },
                Self { bvh: self.bvh, node: r },
            )
        })
    }

    /// Relative traversal cost: bounds cost area times element count.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cost(&self) -> f64 {
        self.node.bounds.cost_area() * self.elements().len() as f64
    }

    fn descend(self, test: &impl Fn(&Aabb) -> bool) -> Option<Self> {
        let Some((left, right)) = self.children() else {
            return Some(self);
        };
        match (test(left.bounds()), test(right.bounds())) {
            (true, true) => Some(self),
            (true, false) => left.descend(test),
            (false, true) => right.descend(test),
            (false, false) => None,
        }
    }
}

/// Closest surface point found by [`Bvh::nearest`].
#[derive(Debug, Clone, Copy)]
pub struct Nearest<'a> {
    /// Closest point on the surface.
    pub point: Point3<f64>,
    /// Unsigned distance to `point`.
    pub distance: f64,
    /// Distance signed by the owning triangle's face normal.
    pub signed_distance: f64,
    /// Triangle owning `point`.
    pub triangle: &'a Triangle,
    /// Index of `triangle` in [`Bvh::triangles`].
    pub index: usize,
}

/// Closest ray intersection found by [`Bvh::ray_cast`].
#[derive(Debug, Clone, Copy)]
pub struct RayHit<'a> {
    /// Ray parameter of the hit.
    pub t: f64,
    /// Hit point.
    pub point: Point3<f64>,
    /// Barycentric coordinates of the hit for `(v0, v1, v2)`.
    pub barycentric: Vector3<f64>,
    /// Triangle that was hit.
    pub triangle: &'a Triangle,
    /// Index of `triangle` in [`Bvh::triangles`].
    pub index: usize,
}

impl Bvh {
    /// Build a hierarchy with the [`LongestAxisMedian`] split.
    ///
    /// Degenerate triangles (see [`Triangle::is_degenerate`] with
    /// [`DEGENERATE_AREA_RATIO`]) are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`BvhError::InvalidState`] when the input is empty or every
    /// triangle is degenerate.
    pub fn load(triangles: impl IntoIterator<Item = Triangle>) -> BvhResult<Self> {
        Self::load_with(triangles, &LongestAxisMedian)
    }

    /// Build a hierarchy with a custom split strategy.
    ///
    /// # Errors
    ///
    /// Returns [`BvhError::InvalidState`] when the input is empty or every
    /// triangle is degenerate.
    pub fn load_with<S: SplitStrategy + ?Sized>(
        triangles: impl IntoIterator<Item = Triangle>,
        strategy: &S,
    ) -> BvhResult<Self> {
        let start = Instant::now();

        let mut total = 0usize;
        let mut triangles: Vec<Triangle> = triangles
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|tri| !tri.is_degenerate(DEGENERATE_AREA_RATIO))
            .collect();
        let discarded = total - triangles.len();

        if total == 0 {
            return Err(BvhError::InvalidState {
                reason: "no triangles to load".to_string(),
            });
        }
        if discarded > 0 {
            warn!(discarded, total, "Discarding degenerate triangles");
        }
        if triangles.is_empty() {
            return Err(BvhError::InvalidState {
                reason: format!("all {total} triangles are degenerate"),
            });
        }

        info!(triangles = triangles.len(), "Building BVH");
        let root = build_recursive(&mut triangles, 0, strategy);

        let bvh = Self {
            triangles,
            root,
            discarded,
        };
        let stats = bvh.stats();
        info!(
            triangles = bvh.triangles.len(),
            leaves = stats.leaf_count,
            depth = stats.max_depth,
            elapsed_ms = start.elapsed().as_millis(),
            "BVH built"
        );
        Ok(bvh)
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> BvhNode<'_> {
        BvhNode {
            bvh: self,
            node: &self.root,
        }
    }

    /// Bounds of all triangles.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.root.bounds
    }

    /// All triangles, in tree order.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles held by the tree.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of degenerate input triangles dropped at load.
    #[must_use]
    pub fn discarded_count(&self) -> usize {
        self.discarded
    }

    /// Deepest node whose subtree the ray reaches unambiguously.
    ///
    /// Descends into a child only when the ray hits its bounds. If both
    /// children are hit the current node is returned; if neither is, `None`.
    #[must_use]
    pub fn hit_ray(&self, ray: &Ray) -> Option<BvhNode<'_>> {
        let test = |b: &Aabb| {
            b.ray_intersect(&ray.origin, &ray.inv_direction, ray.t_min, ray.t_max)
                .is_some()
        };
        let root = self.root();
        if test(root.bounds()) { root.descend(&test) } else { None }
    }

    /// Deepest node whose bounds unambiguously contain `point`.
    ///
    /// Same descent as [`Bvh::hit_ray`] with containment as the test.
    #[must_use]
    pub fn hit_point(&self, point: &Point3<f64>) -> Option<BvhNode<'_>> {
        let test = |b: &Aabb| b.contains(point);
        let root = self.root();
        if test(root.bounds()) { root.descend(&test) } else { None }
    }

    /// Triangles of every leaf whose bounds intersect `region`.
    #[must_use]
    pub fn query_aabb(&self, region: &Aabb) -> Vec<&Triangle> {
        let mut out = Vec::new();
        self.collect(&self.root, &|b: &Aabb| b.intersects(region), &mut out);
        out
    }

    /// Triangles of every leaf whose bounds come within `radius` of `center`.
    #[must_use]
    pub fn query_sphere(&self, center: &Point3<f64>, radius: f64) -> Vec<&Triangle> {
        let mut out = Vec::new();
        self.collect(&self.root, &|b: &Aabb| b.distance_to(center) <= radius, &mut out);
        out
    }

    /// Triangles of every leaf whose bounds contain `point`.
    #[must_use]
    pub fn query_point(&self, point: &Point3<f64>) -> Vec<&Triangle> {
        let mut out = Vec::new();
        self.collect(&self.root, &|b: &Aabb| b.contains(point), &mut out);
        out
    }

    fn collect<'a>(
        &'a self,
        node: &Node,
        test: &impl Fn(&Aabb) -> bool,
        out: &mut Vec<&'a Triangle>,
    ) {
        if !test(&node.bounds) {
            return;
        }
        match &node.children {
            None => out.extend(&self.triangles[node.start..node.end]),
            Some((left, right)) => {
                self.collect(left, test, out);
                self.collect(right, test, out);
            }
        }
    }

    /// Closest surface point to `point`.
    ///
    /// Branch-and-bound search: a subtree is skipped once its bounds are
    /// farther than the best distance so far. Among equally near triangles
    /// the one first in tree order wins, so the result matches an
    /// exhaustive scan.
    #[must_use]
    pub fn nearest(&self, point: &Point3<f64>) -> Nearest<'_> {
        let mut best = (f64::INFINITY, self.root.start);
        self.nearest_recursive(&self.root, point, &mut best);

        let (distance, index) = best;
        let triangle = &self.triangles[index];
        Nearest {
            point: triangle.closest_point(point),
            distance,
            signed_distance: triangle.signed_distance(point),
            triangle,
            index,
        }
    }

    fn nearest_recursive(&self, node: &Node, point: &Point3<f64>, best: &mut (f64, usize)) {
        if node.bounds.distance_to(point) > best.0 {
            return;
        }
        match &node.children {
            None => {
                for index in node.start..node.end {
                    let d = self.triangles[index].unsigned_distance(point);
                    if d.total_cmp(&best.0).then(index.cmp(&best.1)).is_lt() {
                        *best = (d, index);
                    }
                }
            }
            Some((left, right)) => {
                let dl = left.bounds.distance_to(point);
                let dr = right.bounds.distance_to(point);
                if dr < dl {
                    self.nearest_recursive(right, point, best);
                    self.nearest_recursive(left, point, best);
                } else {
                    self.nearest_recursive(left, point, best);
                    self.nearest_recursive(right, point, best);
                }
            }
        }
    }

    /// Unsigned distance from `point` to the closest triangle.
    #[must_use]
    pub fn min_distance(&self, point: &Point3<f64>) -> f64 {
        self.nearest(point).distance
    }

    /// Signed distance from `point` to the closest triangle.
    ///
    /// Triangles are compared by magnitude, so the sign comes from the
    /// nearest surface even when a farther triangle reports a more negative
    /// value. Negative means `point` is behind that triangle's face.
    #[must_use]
    pub fn min_signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.nearest(point).signed_distance
    }

    /// Closest intersection of `ray` with any triangle.
    #[must_use]
    pub fn ray_cast(&self, ray: &Ray) -> Option<RayHit<'_>> {
        let mut best: Option<(f64, f64, f64, usize)> = None;
        self.ray_cast_recursive(&self.root, ray, &mut best);

        best.map(|(t, u, v, index)| RayHit {
            t,
            point: ray.at(t),
            barycentric: Vector3::new(1.0 - u - v, u, v),
            triangle: &self.triangles[index],
            index,
        })
    }

    fn ray_cast_recursive(&self, node: &Node, ray: &Ray, best: &mut Option<(f64, f64, f64, usize)>) {
        let t_max = best.map_or(ray.t_max, |b| b.0);
        if node
            .bounds
            .ray_intersect(&ray.origin, &ray.inv_direction, ray.t_min, t_max)
            .is_none()
        {
            return;
        }
        match &node.children {
            None => {
                let clipped = ray.with_range(ray.t_min, t_max);
                for index in node.start..node.end {
                    if let Some((t, u, v)) = ray_triangle_intersect(&clipped, &self.triangles[index]) {
                        if best.is_none_or(|b| t < b.0) {
                            *best = Some((t, u, v, index));
                        }
                    }
                }
            }
            Some((left, right)) => {
                self.ray_cast_recursive(left, ray, best);
                self.ray_cast_recursive(right, ray, best);
            }
        }
    }

    /// Structure statistics.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        collect_stats(&self.root, 0, &mut stats);
        stats
    }
}

fn build_recursive<S: SplitStrategy + ?Sized>(
    triangles: &mut [Triangle],
    offset: usize,
    strategy: &S,
) -> Node {
    let bounds = triangles.bounds();
    let len = triangles.len();

    if len == 1 {
        return Node {
            bounds,
            start: offset,
            end: offset + 1,
            axis: 0,
            children: None,
        };
    }

    let Split { axis, mid } = strategy.split(&bounds, triangles);
    let clamped = mid.clamp(1, len - 1);
    if clamped != mid {
        debug!(mid, len, "Split point out of range, clamping");
    }
    let mid = clamped;
    let (lower, upper) = triangles.split_at_mut(mid);
    let left = build_recursive(lower, offset, strategy);
    let right = build_recursive(upper, offset + mid, strategy);

    Node {
        bounds,
        start: offset,
        end: offset + len,
        axis,
        children: Some((Box::new(left), Box::new(right))),
    }
}

fn collect_stats(node: &Node, depth: usize, stats: &mut BvhStats) {
    stats.max_depth = stats.max_depth.max(depth);

    match &node.children {
        None => {
            let count = node.end - node.start;
            stats.leaf_count += 1;
            stats.total_triangles_in_leaves += count;
            stats.max_leaf_size = stats.max_leaf_size.max(count);
        }
        Some((left, right)) => {
            stats.internal_count += 1;
            collect_stats(left, depth + 1, stats);
            collect_stats(right, depth + 1, stats);
        }
    }
}

/// Statistics about BVH structure.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BvhStats {
    /// Number of internal (branch) nodes.
    pub internal_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Maximum depth of the tree (root is depth 0).
    pub max_depth: usize,
    /// Maximum number of triangles in any leaf.
    pub max_leaf_size: usize,
    /// Total triangles stored across all leaves.
    pub total_triangles_in_leaves: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{MeshTopology, unit_cube};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn cube_bvh() -> Bvh {
        Bvh::load(unit_cube().triangle_soup()).unwrap()
    }

    fn random_soup(seed: u64, count: usize) -> Vec<Triangle> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let base = Point3::new(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                );
                let mut corner = || {
                    base + Vector3::new(
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.5..0.5),
                    )
                };
                Triangle::new(base, corner(), corner())
            })
            .collect()
    }

    fn assert_invariants(node: BvhNode<'_>) {
        for tri in node.elements() {
            for v in tri.vertices() {
                assert!(node.bounds().contains(&v));
            }
        }
        match node.children() {
            None => assert_eq!(node.elements().len(), 1),
            Some((left, right)) => {
                assert!(node.elements().len() >= 2);
                assert_eq!(*node.bounds(), left.bounds().union(right.bounds()));

                let n = left.elements().len();
                assert_eq!(n + right.elements().len(), node.elements().len());
                assert_eq!(left.elements(), &node.elements()[..n]);
                assert_eq!(right.elements(), &node.elements()[n..]);

                assert_invariants(left);
                assert_invariants(right);
            }
        }
    }

    #[test]
    fn load_empty_is_invalid_state() {
        let err = Bvh::load(Vec::new()).unwrap_err();
        assert!(matches!(err, BvhError::InvalidState { .. }));
    }

    #[test]
    fn load_all_degenerate_is_invalid_state() {
        let flat = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        let err = Bvh::load(vec![flat.clone(), flat]).unwrap_err();
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn degenerate_triangles_are_discarded() {
        let mut soup = unit_cube().triangle_soup();
        soup.push(Triangle::from_arrays([0.0; 3], [0.0; 3], [1.0, 1.0, 1.0]));
        let bvh = Bvh::load(soup).unwrap();
        assert_eq!(bvh.triangle_count(), 12);
        assert_eq!(bvh.discarded_count(), 1);
    }

    #[test]
    fn micro_scale_cube_is_not_degenerate() {
        let soup: Vec<Triangle> = unit_cube()
            .triangle_soup()
            .iter()
            .map(|t| {
                let [a, b, c] = t.vertices();
                Triangle::new(a * 1e-6, b * 1e-6, c * 1e-6)
            })
            .collect();
        let bvh = Bvh::load(soup).unwrap();
        assert_eq!(bvh.triangle_count(), 12);
        assert_eq!(bvh.discarded_count(), 0);

        let center = Point3::new(0.5e-6, 0.5e-6, 0.5e-6);
        assert_relative_eq!(bvh.min_signed_distance(&center), -0.5e-6, max_relative = 1e-9);
        let outside = Point3::new(0.5e-6, 0.5e-6, 2e-6);
        assert_relative_eq!(bvh.min_signed_distance(&outside), 1e-6, max_relative = 1e-9);
    }

    #[test]
    fn single_triangle_is_leaf() {
        let bvh = Bvh::load(vec![Triangle::from_arrays(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        )])
        .unwrap();
        assert!(bvh.root().is_leaf());
        assert!(bvh.root().axis().is_none());
        assert_eq!(bvh.stats().leaf_count, 1);
    }

    #[test]
    fn two_disjoint_triangles_split_into_two_leaves() {
        let a = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = Triangle::from_arrays([100.0, 0.0, 0.0], [101.0, 0.0, 0.0], [100.0, 1.0, 0.0]);
        let bvh = Bvh::load(vec![b.clone(), a.clone()]).unwrap();

        let root = bvh.root();
        assert!(!root.is_leaf());
        assert_eq!(root.axis(), Some(0));

        let (left, right) = root.children().unwrap();
        assert!(left.is_leaf() && right.is_leaf());
        assert_eq!(left.elements(), &[a]);
        assert_eq!(right.elements(), &[b]);
    }

    #[test]
    fn cube_tree_invariants() {
        assert_invariants(cube_bvh().root());
    }

    #[test]
    fn random_tree_invariants_and_depth() {
        let bvh = Bvh::load(random_soup(11, 257)).unwrap();
        assert_invariants(bvh.root());

        let stats = bvh.stats();
        assert_eq!(stats.leaf_count, 257);
        assert_eq!(stats.internal_count, 256);
        assert_eq!(stats.max_leaf_size, 1);
        assert_eq!(stats.total_triangles_in_leaves, 257);
        // Median split: ceil(log2(257)) levels
        assert_eq!(stats.max_depth, 9);
    }

    #[test]
    fn cube_signs() {
        let bvh = cube_bvh();
        assert_relative_eq!(bvh.min_signed_distance(&Point3::new(0.5, 0.5, 0.5)), -0.5, epsilon = 1e-12);
        assert_relative_eq!(bvh.min_signed_distance(&Point3::new(0.5, 0.5, 0.9)), -0.1, epsilon = 1e-12);
        assert_relative_eq!(bvh.min_signed_distance(&Point3::new(0.5, 0.5, 1.5)), 0.5, epsilon = 1e-12);
        assert!(bvh.min_signed_distance(&Point3::new(-1.0, -1.0, -1.0)) > 0.0);
        assert_relative_eq!(bvh.min_distance(&Point3::new(0.5, 0.5, -2.0)), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn pruned_nearest_matches_exhaustive_scan() {
        let bvh = Bvh::load(random_soup(3, 300)).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let p = Point3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
            );
            let (index, brute) = bvh
                .triangles()
                .iter()
                .map(|t| t.unsigned_distance(&p))
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .unwrap();

            let nearest = bvh.nearest(&p);
            assert_eq!(nearest.distance, brute);
            assert_eq!(nearest.index, index);
            assert_eq!(nearest.signed_distance.abs(), brute);
            assert_relative_eq!((nearest.point - p).norm(), brute, max_relative = 1e-4);
        }
    }

    #[test]
    fn hit_point_descends_to_leaf() {
        let a = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = Triangle::from_arrays([10.0, 0.0, 0.0], [11.0, 0.0, 0.0], [10.0, 1.0, 0.0]);
        let bvh = Bvh::load(vec![a.clone(), b]).unwrap();

        let node = bvh.hit_point(&Point3::new(0.2, 0.2, 0.0)).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.elements(), &[a]);

        // Between the children: inside the root bounds, in neither child
        assert!(bvh.hit_point(&Point3::new(5.0, 0.5, 0.0)).is_none());
        assert!(bvh.hit_point(&Point3::new(0.0, 0.0, 5.0)).is_none());
    }

    #[test]
    fn hit_ray_returns_self_when_both_children_hit() {
        let a = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = Triangle::from_arrays([10.0, 0.0, 0.0], [11.0, 0.0, 0.0], [10.0, 1.0, 0.0]);
        let bvh = Bvh::load(vec![a, b.clone()]).unwrap();

        let along = Ray::new(Point3::new(-1.0, 0.1, 0.0), Vector3::x());
        let node = bvh.hit_ray(&along).unwrap();
        assert!(!node.is_leaf());

        let down = Ray::new(Point3::new(10.2, 0.2, 5.0), -Vector3::z());
        let node = bvh.hit_ray(&down).unwrap();
        assert_eq!(node.elements(), &[b]);

        let miss = Ray::new(Point3::new(5.0, 0.2, 5.0), -Vector3::z());
        assert!(bvh.hit_ray(&miss).is_none());
    }

    #[test]
    fn region_queries() {
        let bvh = cube_bvh();

        let top = Aabb::new(Point3::new(0.2, 0.2, 0.9), Point3::new(0.8, 0.8, 1.1));
        let hits = bvh.query_aabb(&top);
        assert!(hits.iter().all(|t| t.bounds().intersects(&top)));
        assert!(hits.iter().any(|t| t.normal().z > 0.9));

        assert!(bvh.query_aabb(&Aabb::from_point(Point3::new(5.0, 5.0, 5.0))).is_empty());
        assert_eq!(bvh.query_sphere(&Point3::new(0.5, 0.5, 0.5), 10.0).len(), 12);
        assert!(bvh.query_sphere(&Point3::new(0.5, 0.5, 3.0), 1.0).is_empty());

        let on_face = bvh.query_point(&Point3::new(0.5, 0.5, 0.0));
        assert!(on_face.iter().any(|t| t.normal().z < -0.9));
    }

    #[test]
    fn ray_cast_finds_closest_face() {
        let bvh = cube_bvh();
        let ray = Ray::new(Point3::new(0.3, 0.4, 5.0), -Vector3::z());
        let hit = bvh.ray_cast(&ray).unwrap();
        assert_relative_eq!(hit.t, 4.0, epsilon = 1e-12);
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1e-12);
        assert!(hit.triangle.normal().z > 0.9);
        assert_relative_eq!(hit.barycentric.sum(), 1.0, epsilon = 1e-12);

        let inside = Ray::new(Point3::new(0.5, 0.3, 0.6), Vector3::x());
        let hit = bvh.ray_cast(&inside).unwrap();
        assert_relative_eq!(hit.point.x, 1.0, epsilon = 1e-12);
        assert!(hit.triangle.normal().x > 0.9);

        let away = Ray::new(Point3::new(0.5, 0.5, 5.0), Vector3::z());
        assert!(bvh.ray_cast(&away).is_none());
    }

    #[test]
    fn node_cost_shrinks_toward_leaves() {
        let bvh = Bvh::load(random_soup(5, 64)).unwrap();
        let root = bvh.root();
        let (left, right) = root.children().unwrap();
        assert!(left.cost() < root.cost());
        assert!(right.cost() < root.cost());
    }
}
