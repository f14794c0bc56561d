//! Rays and ray/triangle intersection.

use mesh_types::{Point3, Triangle, Vector3};

/// Determinants below this are treated as a ray parallel to the triangle.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A ray with a parametric validity interval `[t_min, t_max]`.
///
/// The reciprocal direction is cached for the slab test.
///
/// # Example
///
/// ```
/// use mesh_bvh::Ray;
/// use mesh_types::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 2.0));
/// assert_eq!(ray.at(1.5), Point3::new(0.0, 0.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Point3<f64>,
    /// Ray direction (not required to be unit length).
    pub direction: Vector3<f64>,
    /// Component-wise reciprocal of `direction`.
    pub inv_direction: Vector3<f64>,
    /// Lower bound of the valid parameter range.
    pub t_min: f64,
    /// Upper bound of the valid parameter range.
    pub t_max: f64,
}

impl Ray {
    /// Create a ray valid for `t` in `[0, +inf)`.
    #[must_use]
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction,
            inv_direction: direction.map(|c| 1.0 / c),
            t_min: 0.0,
            t_max: f64::INFINITY,
        }
    }

    /// Restrict the parameter range.
    #[must_use]
    pub const fn with_range(mut self, t_min: f64, t_max: f64) -> Self {
        self.t_min = t_min;
        self.t_max = t_max;
        self
    }

    /// Point at parameter `t`.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Intersect a ray with a triangle (Möller–Trumbore).
///
/// Returns `(t, u, v)` where `t` is the ray parameter and `(u, v)` the
/// barycentric weights of `v1` and `v2`. Only hits with `t` inside the
/// ray's range are reported; both faces are hit.
#[must_use]
pub fn ray_triangle_intersect(ray: &Ray, triangle: &Triangle) -> Option<(f64, f64, f64)> {
    let [v0, v1, v2] = triangle.vertices();
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t >= ray.t_min && t <= ray.t_max).then_some((t, u, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Triangle {
        Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])
    }

    #[test]
    fn ray_hits_triangle() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), -Vector3::z());
        let (t, u, v) = ray_triangle_intersect(&ray, &unit_triangle()).unwrap_or_default();
        assert_relative_eq!(t, 1.0, epsilon = 1e-12);
        assert_relative_eq!(u, 0.25, epsilon = 1e-12);
        assert_relative_eq!(v, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn ray_hits_back_face() {
        let ray = Ray::new(Point3::new(0.25, 0.25, -1.0), Vector3::z());
        assert!(ray_triangle_intersect(&ray, &unit_triangle()).is_some());
    }

    #[test]
    fn ray_misses_outside_triangle() {
        let ray = Ray::new(Point3::new(0.8, 0.8, 1.0), -Vector3::z());
        assert!(ray_triangle_intersect(&ray, &unit_triangle()).is_none());
    }

    #[test]
    fn ray_parallel_misses() {
        let ray = Ray::new(Point3::new(-1.0, 0.25, 0.0), Vector3::x());
        assert!(ray_triangle_intersect(&ray, &unit_triangle()).is_none());
    }

    #[test]
    fn ray_range_is_respected() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), -Vector3::z()).with_range(0.0, 0.5);
        assert!(ray_triangle_intersect(&ray, &unit_triangle()).is_none());

        let behind = Ray::new(Point3::new(0.25, 0.25, 1.0), Vector3::z());
        assert!(ray_triangle_intersect(&behind, &unit_triangle()).is_none());
    }
}
