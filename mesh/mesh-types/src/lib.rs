//! Core geometry types for the mesh SDF pipeline.
//!
//! This crate provides the foundational types shared by the spatial index
//! (`mesh-bvh`) and the voxelizer (`mesh-sdf`):
//!
//! - [`Triangle`] - A concrete triangle with the exact point-to-triangle kernel
//! - [`Aabb`] - Axis-aligned bounding box with slab ray test
//! - [`Vertex`] / [`IndexedMesh`] - Indexed meshes that resolve into triangle soups
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**. Face winding is
//! **counter-clockwise (CCW) when viewed from outside**; normals point
//! outward by the right-hand rule, and a negative signed distance means the
//! point lies behind a face.
//!
//! # Example
//!
//! ```
//! use mesh_types::{unit_cube, MeshTopology, Point3};
//!
//! let cube = unit_cube();
//! let soup = cube.triangle_soup();
//! assert_eq!(soup.len(), 12);
//!
//! let d = soup
//!     .iter()
//!     .map(|t| t.unsigned_distance(&Point3::new(0.5, 0.5, 2.0)))
//!     .fold(f64::INFINITY, f64::min);
//! assert!((d - 1.0).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{IndexedMesh, unit_cube, uv_sphere};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::{DEGENERATE_AREA_RATIO, Triangle, TriangleAttributes};
pub use vertex::{Vertex, VertexAttributes, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector2, Vector3, Vector4};
