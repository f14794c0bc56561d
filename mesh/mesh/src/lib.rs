//! Spatial index and signed distance field toolkit for triangle meshes.
//!
//! This umbrella crate re-exports the mesh-* crates behind one dependency.
//!
//! # Quick Start
//!
//! ```
//! use mesh::prelude::*;
//!
//! let bvh = Bvh::load(unit_cube().triangle_soup())?;
//! let voxelizer = Voxelizer::new(VoxelizerConfig::default().with_resolution(3))?;
//! let volume = voxelizer.voxelize(&bvh)?;
//!
//! // Inside samples read above the surface value of 0.5
//! assert!(volume.sample(4, 4, 4).is_some_and(|s| s > 0.5));
//! let atlas = volume.atlas()?;
//! assert_eq!(atlas.width(), 24);
//! # Ok::<(), mesh::sdf::SdfError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures: `Triangle`, `Aabb`, `IndexedMesh`
//! - [`bvh`] - Bounding volume hierarchy and spatial queries
//! - [`sdf`] - Multi-threaded SDF voxelization and refinement
//!
//! # Feature Flags
//!
//! - `serde` - Serialize and deserialize the core mesh types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `Triangle`, `Aabb`, `IndexedMesh`.
pub use mesh_types as types;

/// Bounding volume hierarchy over triangle soups.
pub use mesh_bvh as bvh;

/// Signed distance field voxelization.
pub use mesh_sdf as sdf;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for BVH queries and voxelization.
///
/// # Usage
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{
        Aabb, IndexedMesh, MeshBounds, MeshTopology, Point3, Triangle, Vector3, Vertex, unit_cube,
        uv_sphere,
    };

    // Spatial index
    pub use mesh_bvh::{Bvh, BvhError, Ray};

    // Voxelization
    pub use mesh_sdf::{
        DistanceEncoding, SdfError, SdfVolume, Voxelizer, VoxelizerConfig, voxelize,
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let mesh = IndexedMesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert!(Bvh::load(mesh.triangle_soup()).is_err());
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::Aabb::empty();
        let _ = bvh::LongestAxisMedian;
        assert!(sdf::VoxelizerConfig::default().validate().is_ok());
    }
}
