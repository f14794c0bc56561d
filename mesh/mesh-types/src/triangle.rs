//! Triangle type and the exact point-to-triangle geometric kernel.

use nalgebra::{Point3, Vector2, Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, VertexColor};

/// Largest ratio of area to squared longest edge that still counts as
/// degenerate.
///
/// The ratio is scale-free, so a well-formed micrometre mesh passes while a
/// sliver of any size is rejected by the spatial index and the SDF pipeline.
pub const DEGENERATE_AREA_RATIO: f64 = 1e-12;

/// Optional per-vertex attributes of a triangle.
///
/// Every attribute is either absent or present for all three corners; a
/// partially populated attribute cannot be expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleAttributes {
    /// Per-corner colors.
    pub colors: Option<[VertexColor; 3]>,
    /// Per-corner shading normals.
    pub normals: Option<[Vector3<f64>; 3]>,
    /// Per-corner texture coordinates.
    pub texcoords: Option<[Vector2<f64>; 3]>,
    /// Per-corner tangents; `w` carries the bitangent handedness.
    pub tangents: Option<[Vector4<f64>; 3]>,
}

impl TriangleAttributes {
    /// Check if no attribute is populated.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.colors.is_none()
            && self.normals.is_none()
            && self.texcoords.is_none()
            && self.tangents.is_none()
    }

    /// Same attributes with corners 1 and 2 swapped, matching [`Triangle::reversed`].
    #[must_use]
    fn reversed(&self) -> Self {
        fn swap<T: Copy>(a: Option<[T; 3]>) -> Option<[T; 3]> {
            a.map(|[x, y, z]| [x, z, y])
        }
        Self {
            colors: swap(self.colors),
            normals: swap(self.normals),
            texcoords: swap(self.texcoords),
            tangents: swap(self.tangents),
        }
    }
}

/// A triangle with concrete vertex positions.
///
/// Stores its three vertices together with the derived unit normal and area.
/// The vertices can only change through [`Triangle::set`], which keeps the
/// derived values in sync.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**
/// (normal points toward viewer).
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// // Area of a right triangle with legs 1 and 1
/// assert!((tri.area() - 0.5).abs() < 1e-10);
///
/// // Normal points in +Z direction
/// assert!((tri.normal().z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    v0: Point3<f64>,
    v1: Point3<f64>,
    v2: Point3<f64>,
    normal: Vector3<f64>,
    area: f64,
    attributes: TriangleAttributes,
}

impl Triangle {
    /// Create a new triangle from three points.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    /// assert_eq!(tri.v1(), Point3::new(1.0, 0.0, 0.0));
    /// ```
    #[must_use]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        let mut tri = Self {
            v0,
            v1,
            v2,
            normal: Vector3::zeros(),
            area: 0.0,
            attributes: TriangleAttributes::default(),
        };
        tri.set(v0, v1, v2);
        tri
    }

    /// Create a triangle from coordinate arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Triangle;
    ///
    /// let tri = Triangle::from_arrays(
    ///     [0.0, 0.0, 0.0],
    ///     [1.0, 0.0, 0.0],
    ///     [0.0, 1.0, 0.0],
    /// );
    /// assert!((tri.area() - 0.5).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self::new(Point3::from(v0), Point3::from(v1), Point3::from(v2))
    }

    /// Replace the three vertices and recompute the normal and area.
    ///
    /// Per-vertex attributes are kept.
    pub fn set(&mut self, v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) {
        self.v0 = v0;
        self.v1 = v1;
        self.v2 = v2;

        let n = self.normal_unnormalized();
        let len = n.norm();
        self.area = len * 0.5;
        self.normal = if self.area > DEGENERATE_AREA_RATIO * self.longest_edge_squared() {
            n / len
        } else {
            Vector3::zeros()
        };
    }

    /// Replace all per-vertex attributes at once.
    #[must_use]
    pub fn with_attributes(mut self, attributes: TriangleAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attach per-corner colors.
    #[must_use]
    pub fn with_colors(mut self, colors: [VertexColor; 3]) -> Self {
        self.attributes.colors = Some(colors);
        self
    }

    /// Attach per-corner shading normals.
    #[must_use]
    pub fn with_normals(mut self, normals: [Vector3<f64>; 3]) -> Self {
        self.attributes.normals = Some(normals);
        self
    }

    /// Attach per-corner texture coordinates.
    #[must_use]
    pub fn with_texcoords(mut self, texcoords: [Vector2<f64>; 3]) -> Self {
        self.attributes.texcoords = Some(texcoords);
        self
    }

    /// Attach per-corner tangents.
    #[must_use]
    pub fn with_tangents(mut self, tangents: [Vector4<f64>; 3]) -> Self {
        self.attributes.tangents = Some(tangents);
        self
    }

    /// First vertex.
    #[inline]
    #[must_use]
    pub const fn v0(&self) -> Point3<f64> {
        self.v0
    }

    /// Second vertex.
    #[inline]
    #[must_use]
    pub const fn v1(&self) -> Point3<f64> {
        self.v1
    }

    /// Third vertex.
    #[inline]
    #[must_use]
    pub const fn v2(&self) -> Point3<f64> {
        self.v2
    }

    /// Get vertices as an array.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Per-vertex attributes.
    #[inline]
    #[must_use]
    pub const fn attributes(&self) -> &TriangleAttributes {
        &self.attributes
    }

    /// Check whether per-corner shading normals are present.
    #[inline]
    #[must_use]
    pub const fn has_normals(&self) -> bool {
        self.attributes.normals.is_some()
    }

    /// Check whether per-corner colors are present.
    #[inline]
    #[must_use]
    pub const fn has_colors(&self) -> bool {
        self.attributes.colors.is_some()
    }

    /// Check whether per-corner texture coordinates are present.
    #[inline]
    #[must_use]
    pub const fn has_texcoords(&self) -> bool {
        self.attributes.texcoords.is_some()
    }

    /// Check whether per-corner tangents are present.
    #[inline]
    #[must_use]
    pub const fn has_tangents(&self) -> bool {
        self.attributes.tangents.is_some()
    }

    /// Compute the (unnormalized) face normal via cross product.
    ///
    /// The direction follows the right-hand rule with CCW winding.
    /// The magnitude equals twice the triangle's area.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    ///     Point3::new(0.0, 2.0, 0.0),
    /// );
    ///
    /// let n = tri.normal_unnormalized();
    /// // Magnitude = 2 * area = 2 * 2 = 4
    /// assert!((n.norm() - 4.0).abs() < 1e-10);
    /// ```
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Unit face normal.
    ///
    /// The zero vector for degenerate triangles (zero area).
    #[inline]
    #[must_use]
    pub const fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Area of the triangle.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// // Right triangle with legs 3 and 4
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(3.0, 0.0, 0.0),
    ///     Point3::new(0.0, 4.0, 0.0),
    /// );
    /// assert!((tri.area() - 6.0).abs() < 1e-10);
    /// ```
    #[inline]
    #[must_use]
    pub const fn area(&self) -> f64 {
        self.area
    }

    /// Compute the centroid (center of mass).
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::new(
            (self.v0.x + self.v1.x + self.v2.x) / 3.0,
            (self.v0.y + self.v1.y + self.v2.y) / 3.0,
            (self.v0.z + self.v1.z + self.v2.z) / 3.0,
        )
    }

    /// Tight axis-aligned bounds of the three vertices.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_triangle(self)
    }

    /// Get the three edges as (start, end) pairs.
    ///
    /// Returns edges in order: v0→v1, v1→v2, v2→v0.
    #[must_use]
    pub const fn edges(&self) -> [(Point3<f64>, Point3<f64>); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Compute the lengths of the three edges.
    ///
    /// Returns `[len01, len12, len20]` where `lenXY` is the distance from vX to vY.
    #[inline]
    #[must_use]
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            (self.v1 - self.v0).norm(),
            (self.v2 - self.v1).norm(),
            (self.v0 - self.v2).norm(),
        ]
    }

    /// Check if the triangle is degenerate (zero or near-zero area).
    ///
    /// The area is compared against `ratio` times the squared longest edge,
    /// so the test does not depend on the scale of the mesh. A triangle whose
    /// vertices coincide is always degenerate.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{DEGENERATE_AREA_RATIO, Triangle};
    ///
    /// let tiny = Triangle::from_arrays([0.0, 0.0, 0.0], [1e-9, 0.0, 0.0], [0.0, 1e-9, 0.0]);
    /// assert!(!tiny.is_degenerate(DEGENERATE_AREA_RATIO));
    ///
    /// let sliver = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    /// assert!(sliver.is_degenerate(DEGENERATE_AREA_RATIO));
    /// ```
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self, ratio: f64) -> bool {
        self.area.is_nan() || self.area <= ratio * self.longest_edge_squared()
    }

    fn longest_edge_squared(&self) -> f64 {
        (self.v1 - self.v0)
            .norm_squared()
            .max((self.v2 - self.v1).norm_squared())
            .max((self.v0 - self.v2).norm_squared())
    }

    /// Create a new triangle with reversed winding (flipped normal).
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut tri = Self::new(self.v0, self.v2, self.v1);
        tri.attributes = self.attributes.reversed();
        tri
    }

    /// Barycentric coordinates of `point` with respect to triangle `(a, b, c)`.
    ///
    /// The point is projected onto the triangle's plane and the result is the
    /// ratio of the signed areas of the three sub-triangles to the whole, so
    /// `a * u + b * v + c * w` reconstructs the projection and `u + v + w = 1`.
    /// Coordinates are negative outside the triangle.
    ///
    /// Degenerate triangles divide by (near) zero; the result then contains
    /// huge or NaN values and must be ignored by the caller.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let bary = Triangle::barycentric(
    ///     &Point3::new(0.25, 0.25, 3.0),
    ///     &Point3::new(0.0, 0.0, 0.0),
    ///     &Point3::new(1.0, 0.0, 0.0),
    ///     &Point3::new(0.0, 1.0, 0.0),
    /// );
    /// assert!((bary.x - 0.5).abs() < 1e-12);
    /// assert!((bary.y - 0.25).abs() < 1e-12);
    /// assert!((bary.z - 0.25).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn barycentric(
        point: &Point3<f64>,
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
    ) -> Vector3<f64> {
        let n = (b - a).cross(&(c - a));
        let nn = n.norm_squared();
        let q = point - n * (n.dot(&(point - a)) / nn);

        let u = n.dot(&(b - q).cross(&(c - q))) / nn;
        let v = n.dot(&(c - q).cross(&(a - q))) / nn;
        Vector3::new(u, v, 1.0 - u - v)
    }

    /// Barycentric coordinates of `point` with respect to this triangle.
    ///
    /// See [`Triangle::barycentric`].
    #[inline]
    #[must_use]
    pub fn barycentric_of(&self, point: &Point3<f64>) -> Vector3<f64> {
        Self::barycentric(point, &self.v0, &self.v1, &self.v2)
    }

    /// Exact closest point on the triangle (interior, edges or vertices).
    ///
    /// Projects `point` onto the plane and takes its barycentric coordinates.
    /// If all are non-negative the projection is the answer. Otherwise every
    /// edge opposite a negative coordinate faces the point, and the answer is
    /// the nearest of the points clamped onto those edges.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
    /// let c = tri.closest_point(&Point3::new(2.0, 2.0, 0.0));
    /// assert!((c - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);
    /// ```
    #[must_use]
    pub fn closest_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let bary = self.barycentric_of(point);

        if bary.x >= 0.0 && bary.y >= 0.0 && bary.z >= 0.0 {
            return Point3::from(
                self.v0.coords * bary.x + self.v1.coords * bary.y + self.v2.coords * bary.z,
            );
        }

        // Edge opposite each corner: v0 -> (v1, v2), v1 -> (v2, v0), v2 -> (v0, v1).
        // A NaN coordinate (degenerate triangle) keeps its edge in the search.
        let edges = [(self.v1, self.v2), (self.v2, self.v0), (self.v0, self.v1)];
        let mut best = self.v0;
        let mut best_dist_sq = f64::INFINITY;
        for (coord, (a, b)) in bary.iter().zip(edges) {
            if *coord >= 0.0 {
                continue;
            }
            let candidate = closest_point_on_segment(point, &a, &b);
            let dist_sq = (candidate - point).norm_squared();
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = candidate;
            }
        }
        best
    }

    /// Euclidean distance from `point` to the triangle.
    ///
    /// Computed independently of [`Triangle::closest_point`]: three edge
    /// half-space tests decide whether the point projects inside, giving
    /// either the plane distance or the smallest of the three edge-segment
    /// distances.
    #[must_use]
    pub fn unsigned_distance(&self, point: &Point3<f64>) -> f64 {
        let ba = self.v1 - self.v0;
        let cb = self.v2 - self.v1;
        let ac = self.v0 - self.v2;
        let pa = point - self.v0;
        let pb = point - self.v1;
        let pc = point - self.v2;
        let nor = ba.cross(&ac);
        let nn = nor.norm_squared();
        // |nor| is twice the area
        let flat = 2.0 * DEGENERATE_AREA_RATIO * self.longest_edge_squared();

        let inside = nn > flat * flat
            && ba.cross(&nor).dot(&pa) >= 0.0
            && cb.cross(&nor).dot(&pb) >= 0.0
            && ac.cross(&nor).dot(&pc) >= 0.0;

        if inside {
            let h = nor.dot(&pa);
            return (h * h / nn).sqrt();
        }

        let edge = |e: &Vector3<f64>, p: &Vector3<f64>| {
            let t = (e.dot(p) / e.norm_squared().max(f64::MIN_POSITIVE)).clamp(0.0, 1.0);
            (e * t - p).norm_squared()
        };
        edge(&ba, &pa)
            .min(edge(&cb, &pb))
            .min(edge(&ac, &pc))
            .sqrt()
    }

    /// Signed distance from `point` to the triangle.
    ///
    /// Negative when the point lies behind the face, i.e. the vector from the
    /// closest point to `point` opposes the face normal. Points whose closest
    /// feature is an edge or vertex still use the face normal.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        let dist = self.unsigned_distance(point);
        let closest = self.closest_point(point);
        if (point - closest).dot(&self.normal) < 0.0 {
            -dist
        } else {
            dist
        }
    }

    /// Interpolate the shading normals at `point`.
    ///
    /// Returns `None` when the triangle carries no normals.
    #[must_use]
    pub fn interpolate_normal(&self, point: &Point3<f64>) -> Option<Vector3<f64>> {
        let [n0, n1, n2] = self.attributes.normals?;
        let w = self.barycentric_of(point);
        (n0 * w.x + n1 * w.y + n2 * w.z).try_normalize(f64::EPSILON)
    }

    /// Interpolate the texture coordinates at `point`.
    #[must_use]
    pub fn interpolate_texcoord(&self, point: &Point3<f64>) -> Option<Vector2<f64>> {
        let [t0, t1, t2] = self.attributes.texcoords?;
        let w = self.barycentric_of(point);
        Some(t0 * w.x + t1 * w.y + t2 * w.z)
    }

    /// Interpolate the vertex colors at `point`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // weights sum to 1, channels stay in [0, 1]
    pub fn interpolate_color(&self, point: &Point3<f64>) -> Option<VertexColor> {
        let [c0, c1, c2] = self.attributes.colors?;
        let w = self.barycentric_of(point);
        let (r0, g0, b0) = c0.to_float();
        let (r1, g1, b1) = c1.to_float();
        let (r2, g2, b2) = c2.to_float();
        let mix = |a: f32, b: f32, c: f32| {
            (f64::from(a) * w.x + f64::from(b) * w.y + f64::from(c) * w.z) as f32
        };
        Some(VertexColor::from_float(
            mix(r0, r1, r2),
            mix(g0, g1, g2),
            mix(b0, b1, b2),
        ))
    }
}

/// Closest point on segment `ab` to `point`.
fn closest_point_on_segment(point: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    let ab = b - a;
    let t = ((point - a).dot(&ab) / ab.norm_squared().max(f64::MIN_POSITIVE)).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};

    fn right_triangle() -> Triangle {
        Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])
    }

    #[test]
    fn triangle_normal() {
        let n = right_triangle().normal();
        assert!(n.x.abs() < 1e-10);
        assert!(n.y.abs() < 1e-10);
        assert!((n.z - 1.0).abs() < 1e-10);
    }

    #[test]
    fn triangle_area() {
        assert!((right_triangle().area() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn triangle_set_recomputes_derived_values() {
        let mut tri = right_triangle();
        tri.set(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!((tri.area() - 2.0).abs() < 1e-12);
        assert!((tri.normal().z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn triangle_centroid() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 3.0, 0.0]);
        let c = tri.centroid();
        assert!((c.x - 1.0).abs() < 1e-10);
        assert!((c.y - 1.0).abs() < 1e-10);
        assert!(c.z.abs() < 1e-10);
    }

    #[test]
    fn degenerate_triangle() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(tri.is_degenerate(DEGENERATE_AREA_RATIO));
        assert_eq!(tri.normal(), Vector3::zeros());
        assert!(!right_triangle().is_degenerate(DEGENERATE_AREA_RATIO));

        let point = Triangle::from_arrays([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        assert!(point.is_degenerate(DEGENERATE_AREA_RATIO));
    }

    #[test]
    fn degeneracy_does_not_depend_on_scale() {
        for scale in [1e-9, 1e-6, 1.0, 1e6] {
            let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [scale, 0.0, 0.0], [0.0, scale, 0.0]);
            assert!(!tri.is_degenerate(DEGENERATE_AREA_RATIO), "scale {scale}");
            assert_relative_eq!(tri.normal(), Vector3::z(), epsilon = 1e-12);

            // Above the face, inside the footprint
            let p = Point3::new(0.25 * scale, 0.25 * scale, scale);
            assert_relative_eq!(tri.unsigned_distance(&p), scale, max_relative = 1e-12);
            assert_relative_eq!(tri.signed_distance(&p), scale, max_relative = 1e-12);
        }
    }

    #[test]
    fn degenerate_triangle_closest_point_stays_finite() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        let c = tri.closest_point(&Point3::new(1.5, 1.0, 0.0));
        assert_relative_eq!(c.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(tri.unsigned_distance(&Point3::new(1.5, 1.0, 0.0)), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn triangle_edge_lengths() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let lengths = tri.edge_lengths();
        assert!((lengths[0] - 3.0).abs() < 1e-10);
        assert!((lengths[1] - 5.0).abs() < 1e-10);
        assert!((lengths[2] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn triangle_reversed() {
        let tri = right_triangle().with_texcoords([
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ]);
        let rev = tri.reversed();
        assert!((tri.normal().z + rev.normal().z).abs() < 1e-10);
        // Attributes follow their corners
        let uv = rev.attributes().texcoords.map(|t| t[1]);
        assert_eq!(uv, Some(Vector2::new(0.0, 1.0)));
    }

    #[test]
    fn closest_point_interior() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [5.0, 10.0, 0.0]);
        let closest = tri.closest_point(&Point3::new(5.0, 3.0, 5.0));
        assert_relative_eq!(closest.x, 5.0, epsilon = 1e-10);
        assert_relative_eq!(closest.y, 3.0, epsilon = 1e-10);
        assert_relative_eq!(closest.z, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn closest_point_hypotenuse_region() {
        let tri = right_triangle();
        let p = Point3::new(2.0, 2.0, 0.0);

        let closest = tri.closest_point(&p);
        assert_relative_eq!(closest.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(closest.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(closest.z, 0.0, epsilon = 1e-12);

        let expected = (1.5_f64 * 1.5 * 2.0).sqrt();
        assert_relative_eq!(tri.unsigned_distance(&p), expected, epsilon = 1e-12);
        assert_relative_eq!(tri.unsigned_distance(&p), 2.121_320_343_559_642, epsilon = 1e-9);
    }

    #[test]
    fn closest_point_vertex_region() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [5.0, 10.0, 0.0]);
        let closest = tri.closest_point(&Point3::new(-5.0, -5.0, 0.0));
        assert_relative_eq!(closest.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(closest.y, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn closest_point_edge_region() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [5.0, 10.0, 0.0]);
        let closest = tri.closest_point(&Point3::new(5.0, -5.0, 2.0));
        assert_relative_eq!(closest.x, 5.0, epsilon = 1e-10);
        assert_relative_eq!(closest.y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(closest.z, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn closest_point_matches_unsigned_distance_on_random_points() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut corner = || {
                Point3::new(
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                )
            };
            let tri = Triangle::new(corner(), corner(), corner());
            if tri.is_degenerate(1e-3) {
                continue;
            }
            let p = Point3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
            );

            let closest = tri.closest_point(&p);
            let direct = (p - closest).norm();
            let dist = tri.unsigned_distance(&p);
            assert_relative_eq!(direct, dist, max_relative = 1e-4, epsilon = 1e-9);

            let bary = tri.barycentric_of(&closest);
            for w in bary.iter() {
                assert!(*w >= -1e-9 && *w <= 1.0 + 1e-9, "barycentric {bary:?} out of range");
            }
            assert_relative_eq!(bary.sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn signed_distance_sign_follows_normal() {
        let tri = right_triangle();
        assert_relative_eq!(tri.signed_distance(&Point3::new(0.2, 0.2, 1.0)), 1.0, epsilon = 1e-12);
        assert_relative_eq!(tri.signed_distance(&Point3::new(0.2, 0.2, -1.0)), -1.0, epsilon = 1e-12);
        // Coplanar, outside the triangle: distance is positive
        assert!(tri.signed_distance(&Point3::new(2.0, 2.0, 0.0)) > 0.0);
    }

    #[test]
    fn barycentric_of_vertices() {
        let tri = right_triangle();
        let b = tri.barycentric_of(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(b, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn interpolate_attributes() {
        let tri = right_triangle()
            .with_normals([Vector3::z(), Vector3::z(), Vector3::x()])
            .with_colors([VertexColor::new(0, 0, 0), VertexColor::new(255, 255, 255), VertexColor::new(0, 0, 0)]);
        assert!(tri.has_normals());
        assert!(tri.has_colors());
        assert!(!tri.has_tangents());

        let n = tri.interpolate_normal(&Point3::new(0.0, 0.0, 0.0));
        assert_eq!(n.map(|n| n.z), Some(1.0));

        let c = tri.interpolate_color(&Point3::new(1.0, 0.0, 0.0));
        assert_eq!(c.map(|c| c.r), Some(255));

        assert!(tri.interpolate_texcoord(&Point3::origin()).is_none());
    }
}
