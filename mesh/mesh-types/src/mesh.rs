//! Indexed triangle mesh and primitive generators.

use std::f64::consts::PI;

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, TriangleAttributes, Vertex};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. This is the usual source of the triangle soup that
/// the spatial index and the voxelizer consume; see
/// [`MeshTopology::triangles`].
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside.
/// This means normals point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from raw coordinate and index data.
    ///
    /// * `positions` - Flat array `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - Flat array `[a0, b0, c0, a1, b1, c1, ...]`
    ///
    /// Returns an empty mesh if either length is not a multiple of 3.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = IndexedMesh::from_raw(&positions, &[0, 1, 2]);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self { vertices, faces }
    }

    /// Flip all faces by reversing winding order, negating vertex normals.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
        for vertex in &mut self.vertices {
            if let Some(ref mut normal) = vertex.attributes.normal {
                *normal = -*normal;
            }
        }
    }

    /// Signed volume by the divergence theorem.
    ///
    /// Positive for a closed mesh with outward-facing (CCW) faces.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|tri| {
                let [a, b, c] = tri.vertices();
                a.coords.dot(&b.coords.cross(&c.coords))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Total surface area of all faces.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    fn resolve(&self, [i0, i1, i2]: [u32; 3]) -> Option<Triangle> {
        let a = self.vertices.get(i0 as usize)?;
        let b = self.vertices.get(i1 as usize)?;
        let c = self.vertices.get(i2 as usize)?;

        let (ea, eb, ec) = (&a.attributes, &b.attributes, &c.attributes);
        let attributes = TriangleAttributes {
            colors: ea.color.zip(eb.color).zip(ec.color).map(|((x, y), z)| [x, y, z]),
            normals: ea.normal.zip(eb.normal).zip(ec.normal).map(|((x, y), z)| [x, y, z]),
            texcoords: ea.uv.zip(eb.uv).zip(ec.uv).map(|((x, y), z)| [x, y, z]),
            tangents: ea
                .tangent
                .zip(eb.tangent)
                .zip(ec.tangent)
                .map(|((x, y), z)| [x, y, z]),
        };
        let tri = Triangle::new(a.position, b.position, c.position).with_attributes(attributes);
        Some(tri)
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        self.faces.get(face_index).and_then(|&f| self.resolve(f))
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    fn faces(&self) -> impl Iterator<Item = [u32; 3]> {
        self.faces.iter().copied()
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.faces.iter().filter_map(|&f| self.resolve(f))
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Helper function to create a unit cube mesh.
///
/// Creates a cube from (0,0,0) to (1,1,1) with outward-facing normals.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let vertices = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ]
    .into_iter()
    .map(|p| Vertex::new(Point3::from(p)))
    .collect();

    // Two triangles per side, CCW from outside: -Z, +Z, -Y, +Y, -X, +X
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [3, 7, 6],
        [3, 6, 2],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ];

    IndexedMesh::from_parts(vertices, faces)
}

/// Create a closed latitude/longitude sphere centered at the origin.
///
/// Vertices carry outward unit normals. `segments` (around the Z axis) is
/// raised to at least 3 and `rings` (pole to pole) to at least 2.
///
/// # Example
///
/// ```
/// use mesh_types::{uv_sphere, MeshTopology};
///
/// let sphere = uv_sphere(1.0, 16, 8);
/// assert_eq!(sphere.vertex_count(), 2 + 16 * 7);
/// assert_eq!(sphere.face_count(), 2 * 16 * 7);
/// ```
#[must_use]
pub fn uv_sphere(radius: f64, segments: u32, rings: u32) -> IndexedMesh {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let vertex_count = 2 + segments as usize * (rings as usize - 1);
    let face_count = 2 * segments as usize * (rings as usize - 1);
    let mut mesh = IndexedMesh::with_capacity(vertex_count, face_count);

    let push = |mesh: &mut IndexedMesh, n: Vector3<f64>| {
        mesh.vertices
            .push(Vertex::new(Point3::from(n * radius)).with_normal(n));
    };

    push(&mut mesh, Vector3::z());
    for ring in 1..rings {
        let phi = PI * f64::from(ring) / f64::from(rings);
        for seg in 0..segments {
            let theta = 2.0 * PI * f64::from(seg) / f64::from(segments);
            push(
                &mut mesh,
                Vector3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()),
            );
        }
    }
    push(&mut mesh, -Vector3::z());

    let north = 0;
    let south = 1 + (rings - 1) * segments;
    let at = |ring: u32, seg: u32| 1 + ring * segments + seg % segments;

    for seg in 0..segments {
        mesh.faces.push([north, at(0, seg), at(0, seg + 1)]);
    }
    for ring in 0..rings - 2 {
        for seg in 0..segments {
            let (a0, a1) = (at(ring, seg), at(ring, seg + 1));
            let (b0, b1) = (at(ring + 1, seg), at(ring + 1, seg + 1));
            mesh.faces.push([a0, b0, b1]);
            mesh.faces.push([a0, b1, a1]);
        }
    }
    for seg in 0..segments {
        mesh.faces
            .push([south, at(rings - 2, seg + 1), at(rings - 2, seg)]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VertexColor;

    #[test]
    fn mesh_is_empty() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());

        let mut mesh2 = IndexedMesh::new();
        mesh2.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(mesh2.is_empty()); // no faces

        mesh2.faces.push([0, 0, 0]);
        assert!(!mesh2.is_empty());
    }

    #[test]
    fn mesh_from_raw_rejects_ragged_input() {
        let mesh = IndexedMesh::from_raw(&[0.0, 1.0], &[0, 1, 2]);
        assert!(mesh.is_empty());
    }

    #[test]
    fn mesh_bounds() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(10.0, 5.0, 3.0));
        mesh.vertices.push(Vertex::from_coords(-2.0, 8.0, 1.0));

        let bounds = mesh.bounds();
        assert!((bounds.min.x - (-2.0)).abs() < f64::EPSILON);
        assert!((bounds.max.x - 10.0).abs() < f64::EPSILON);
        assert!((bounds.max.y - 8.0).abs() < f64::EPSILON);
        assert!((bounds.max.z - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unit_cube_volume_and_area() {
        let cube = unit_cube();
        assert!((cube.signed_volume() - 1.0).abs() < 1e-10);
        assert!((cube.surface_area() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn flipped_cube_has_negative_volume() {
        let mut cube = unit_cube();
        cube.flip_normals();
        assert!(cube.signed_volume() < 0.0);
    }

    #[test]
    fn out_of_range_faces_are_skipped() {
        let mut cube = unit_cube();
        cube.faces.push([0, 1, 99]);
        assert_eq!(cube.triangles().count(), 12);
        assert!(cube.triangle(12).is_none());
    }

    #[test]
    fn triangles_forward_complete_attributes_only() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0).with_color(VertexColor::BLACK));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0).with_color(VertexColor::WHITE));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);

        let tri = mesh.triangle(0);
        assert!(tri.as_ref().is_some_and(|t| !t.has_colors()));

        mesh.vertices[2].attributes.color = Some(VertexColor::WHITE);
        let tri = mesh.triangle(0);
        assert!(tri.as_ref().is_some_and(Triangle::has_colors));
    }

    #[test]
    fn uv_sphere_is_closed_and_outward() {
        let sphere = uv_sphere(2.0, 24, 12);
        assert_eq!(sphere.face_count(), 2 * 24 * 11);

        // Polyhedral volume approaches 4/3 pi r^3 from below
        let vol = sphere.signed_volume();
        let exact = 4.0 / 3.0 * PI * 8.0;
        assert!(vol > 0.9 * exact && vol < exact, "volume {vol}");

        for tri in sphere.triangles() {
            let outward = tri.centroid().coords.normalize();
            assert!(tri.normal().dot(&outward) > 0.0);
            assert!(tri.has_normals());
        }
    }

    #[test]
    fn uv_sphere_clamps_arguments() {
        let sphere = uv_sphere(1.0, 0, 0);
        assert_eq!(sphere.vertex_count(), 2 + 3);
        assert_eq!(sphere.face_count(), 6);
    }
}
