//! Traits shared by mesh representations.

use crate::{Aabb, Triangle, Vertex};

/// Read access to an indexed triangle mesh.
///
/// Consumers that only need geometry (the spatial index, the voxelizer)
/// work from [`MeshTopology::triangle_soup`], so any representation that
/// can resolve its faces into [`Triangle`]s can feed them.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of faces.
    fn face_count(&self) -> usize;

    /// A mesh without vertices or without faces is empty.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex by index, `None` when out of range.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Face by index as vertex indices, `None` when out of range.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Resolve a face into a [`Triangle`].
    ///
    /// Returns `None` when the face index, or any of its vertex indices, is
    /// out of range.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all vertices.
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;

    /// Iterate over all faces as vertex index triples.
    fn faces(&self) -> impl Iterator<Item = [u32; 3]>;

    /// Iterate over all resolvable faces as triangles, in face order.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;

    /// Collect [`MeshTopology::triangles`] into an owned soup.
    fn triangle_soup(&self) -> Vec<Triangle> {
        self.triangles().collect()
    }
}

/// Types with an axis-aligned extent.
pub trait MeshBounds {
    /// Tight bounding box; empty when there is no geometry.
    fn bounds(&self) -> Aabb;
}

impl MeshBounds for [Triangle] {
    fn bounds(&self) -> Aabb {
        self.iter().fold(Aabb::empty(), |mut acc, tri| {
            acc.expand_to_include_triangle(tri);
            acc
        })
    }
}
