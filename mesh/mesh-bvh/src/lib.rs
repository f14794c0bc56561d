//! Bounding volume hierarchy over triangle soups.
//!
//! [`Bvh`] is a binary tree built once from a list of [`mesh_types::Triangle`]s
//! by recursive median splits along the longest axis of each node's bounds.
//! Every leaf holds exactly one triangle. After construction the tree is
//! read-only and can be queried concurrently from any number of threads.
//!
//! # Queries
//!
//! - [`Bvh::hit_ray`] / [`Bvh::hit_point`] - deepest unambiguous node
//! - [`Bvh::query_aabb`], [`Bvh::query_sphere`], [`Bvh::query_point`] - triangles near a region
//! - [`Bvh::min_distance`] / [`Bvh::min_signed_distance`] / [`Bvh::nearest`] - closest surface
//! - [`Bvh::ray_cast`] - closest ray/triangle intersection
//!
//! # Example
//!
//! ```
//! use mesh_bvh::{Bvh, Ray};
//! use mesh_types::{unit_cube, MeshTopology, Point3, Vector3};
//!
//! let bvh = Bvh::load(unit_cube().triangle_soup())?;
//!
//! let hit = bvh.ray_cast(&Ray::new(Point3::new(0.3, 0.4, 5.0), -Vector3::z()));
//! assert!(hit.is_some_and(|h| (h.t - 4.0).abs() < 1e-12));
//!
//! let d = bvh.min_signed_distance(&Point3::new(0.5, 0.5, 0.25));
//! assert!((d + 0.25).abs() < 1e-12);
//! # Ok::<(), mesh_bvh::BvhError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bvh;
mod error;
mod ray;
mod split;

pub use bvh::{Bvh, BvhNode, BvhStats, Nearest, RayHit};
pub use error::{BvhError, BvhResult};
pub use ray::{Ray, ray_triangle_intersect};
pub use split::{LongestAxisMedian, Split, SplitStrategy};
