//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Triangle;

/// An axis-aligned bounding box (AABB).
///
/// Represents a 3D box aligned with the coordinate axes, defined by
/// minimum and maximum corner points. Both corners always change together;
/// there is no way to update a single component.
///
/// A box created with [`Aabb::empty`] holds the `+∞ / -∞` sentinel and must be
/// expanded at least once before it is queried. Use [`Aabb::is_empty`] to
/// check.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 10.0, 10.0),
/// );
///
/// assert_eq!(aabb.size(), Point3::new(10.0, 10.0, 10.0).coords);
/// assert!(aabb.contains(&Point3::new(5.0, 5.0, 5.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    ///
    /// The corners are automatically corrected if min > max for any axis.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(
    ///     Point3::new(1.0, 2.0, 3.0),
    ///     Point3::new(0.0, 0.0, 0.0),
    /// );
    /// assert_eq!(aabb.min, Point3::new(0.0, 0.0, 0.0));
    /// ```
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an AABB from a single point.
    ///
    /// The resulting box has zero volume.
    #[inline]
    #[must_use]
    pub const fn from_point(point: Point3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Create an empty (unallocated) AABB.
    ///
    /// An empty AABB has min > max, which is useful as a starting point
    /// for expanding to include points.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let mut aabb = Aabb::empty();
    /// assert!(aabb.is_empty());
    ///
    /// aabb.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
    /// assert!(!aabb.is_empty());
    /// ```
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB from an iterator of points.
    ///
    /// Returns an empty AABB if the iterator is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let points = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(10.0, 5.0, 3.0),
    ///     Point3::new(-2.0, 8.0, 1.0),
    /// ];
    ///
    /// let aabb = Aabb::from_points(points.iter());
    /// assert_eq!(aabb.min, Point3::new(-2.0, 0.0, 0.0));
    /// assert_eq!(aabb.max, Point3::new(10.0, 8.0, 3.0));
    /// ```
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Create the tight bounding box of a triangle.
    #[must_use]
    pub fn from_triangle(triangle: &Triangle) -> Self {
        let mut aabb = Self::empty();
        aabb.expand_to_include_triangle(triangle);
        aabb
    }

    /// Replace both corners at once.
    ///
    /// The corners are reordered per axis like [`Aabb::new`].
    pub fn set(&mut self, min: Point3<f64>, max: Point3<f64>) {
        *self = Self::new(min, max);
    }

    /// Check if the AABB is empty (has never been expanded).
    ///
    /// An AABB is empty if min > max for any axis.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the size (diagonal vector) of the AABB.
    ///
    /// Returns a vector with the width, height, and depth.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(3.0, 4.0, 5.0),
    /// );
    /// let size = aabb.size();
    /// assert_eq!(size.x, 3.0);
    /// assert_eq!(size.y, 4.0);
    /// assert_eq!(size.z, 5.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Get the center of the AABB.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Get the surface area of the AABB.
    ///
    /// Returns 0.0 for empty AABBs.
    #[inline]
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        2.0 * self.cost_area()
    }

    /// Half the surface area: `xy + yz + zx` of the size vector.
    ///
    /// Only meaningful as a relative cost signal when comparing boxes, e.g.
    /// when estimating how expensive a BVH subtree is to traverse.
    ///
    /// Returns 0.0 for empty AABBs.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
    /// assert!((aabb.cost_area() - 11.0).abs() < 1e-12);
    /// ```
    #[inline]
    #[must_use]
    pub fn cost_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let s = self.size();
        s.z.mul_add(s.x, s.x.mul_add(s.y, s.y * s.z))
    }

    /// Get the length of the longest edge.
    #[inline]
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }

    /// Get the index of the longest axis (0=X, 1=Y, 2=Z).
    ///
    /// Ties resolve to the lower axis index.
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s.x >= s.y && s.x >= s.z {
            0
        } else if s.y >= s.z {
            1
        } else {
            2
        }
    }

    /// Get the diagonal length of the AABB.
    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// Check if the AABB contains a point.
    ///
    /// Points on the boundary are considered inside.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(10.0, 10.0, 10.0),
    /// );
    ///
    /// assert!(aabb.contains(&Point3::new(5.0, 5.0, 5.0)));
    /// assert!(aabb.contains(&Point3::new(0.0, 0.0, 0.0))); // boundary
    /// assert!(!aabb.contains(&Point3::new(-1.0, 5.0, 5.0)));
    /// ```
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB.
    ///
    /// Separating-interval test on each axis. Touching AABBs are considered
    /// intersecting.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
    /// let b = Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(15.0, 15.0, 15.0));
    /// let c = Aabb::new(Point3::new(20.0, 20.0, 20.0), Point3::new(30.0, 30.0, 30.0));
    ///
    /// assert!(a.intersects(&b));
    /// assert!(!a.intersects(&c));
    /// ```
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Clamp a point into the box, componentwise.
    ///
    /// The result is the point of the box closest to `point`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    /// let p = aabb.closest_point(&Point3::new(2.0, 0.5, -1.0));
    /// assert_eq!(p, Point3::new(1.0, 0.5, 0.0));
    /// ```
    #[inline]
    #[must_use]
    pub fn closest_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Distance from a point to the box (0.0 inside).
    ///
    /// A lower bound for the distance from `point` to anything the box
    /// encloses.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, point: &Point3<f64>) -> f64 {
        (self.closest_point(point) - point).norm()
    }

    /// Slab test against a ray given by its origin and inverse direction.
    ///
    /// Returns the parametric entry and exit distances clipped to
    /// `[t_min, t_max]`, or `None` when the ray misses the box inside that
    /// interval.
    #[must_use]
    pub fn ray_intersect(
        &self,
        origin: &Point3<f64>,
        dir_inv: &Vector3<f64>,
        t_min: f64,
        t_max: f64,
    ) -> Option<(f64, f64)> {
        let mut near = t_min;
        let mut far = t_max;

        for axis in 0..3 {
            // Ray parallel to this slab: inside it everywhere or nowhere
            if dir_inv[axis].is_infinite() {
                if origin[axis] < self.min[axis] || origin[axis] > self.max[axis] {
                    return None;
                }
                continue;
            }

            let t1 = (self.min[axis] - origin[axis]) * dir_inv[axis];
            let t2 = (self.max[axis] - origin[axis]) * dir_inv[axis];
            near = near.max(t1.min(t2));
            far = far.min(t1.max(t2));
            if far < near {
                return None;
            }
        }

        Some((near, far))
    }

    /// Compute the union (enclosing AABB) of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Expand the AABB to include a point.
    ///
    /// Modifies the AABB in place.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Expand the AABB to include all three vertices of a triangle.
    pub fn expand_to_include_triangle(&mut self, triangle: &Triangle) {
        for vertex in triangle.vertices() {
            self.expand_to_include(&vertex);
        }
    }

    /// Expand the AABB to include another box.
    ///
    /// Expanding by an empty box is a no-op.
    pub fn expand_to_include_aabb(&mut self, other: &Self) {
        *self = self.union(other);
    }

    /// Expand the AABB by a uniform margin on all sides.
    ///
    /// # Arguments
    ///
    /// * `margin` - Distance to expand. Negative values shrink the AABB.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(10.0, 10.0, 10.0),
    /// );
    ///
    /// let expanded = aabb.expanded(1.0);
    /// assert_eq!(expanded.min, Point3::new(-1.0, -1.0, -1.0));
    /// assert_eq!(expanded.max, Point3::new(11.0, 11.0, 11.0));
    /// ```
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point3::new(
                self.min.x - margin,
                self.min.y - margin,
                self.min.z - margin,
            ),
            max: Point3::new(
                self.max.x + margin,
                self.max.y + margin,
                self.max.z + margin,
            ),
        }
    }

    /// Grow the box into a cube with the same center.
    ///
    /// The side of the cube is the longest extent of the box, so voxel axes
    /// laid over the result are isotropic.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(Point3::origin(), Point3::new(4.0, 2.0, 1.0));
    /// let cube = aabb.squared();
    /// let size = cube.size();
    /// assert_eq!((size.x, size.y, size.z), (4.0, 4.0, 4.0));
    /// assert_eq!(cube.center(), aabb.center());
    /// ```
    #[must_use]
    pub fn squared(&self) -> Self {
        let half = self.max_extent() * 0.5;
        let c = self.center();
        Self {
            min: Point3::new(c.x - half, c.y - half, c.z - half),
            max: Point3::new(c.x + half, c.y + half, c.z + half),
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
