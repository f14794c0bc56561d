//! Signed distance field voxelization for triangle meshes.
//!
//! A [`Voxelizer`] samples the signed distance to a [`mesh_bvh::Bvh`] on a
//! cubic `2^N` grid that encloses the mesh. Each sample is normalized into
//! `[0, 1]` with the surface at `0.5` (see [`DistanceEncoding`]), and the
//! volume can be packed into a square atlas image of Z layers for upload as
//! a 2D texture.
//!
//! Work is split across a reusable [`WorkerPool`]: whole Z layers for a full
//! volume, rows for a single layer, triangles for [`Voxelizer::refine`].
//! Output does not depend on the number of workers.
//!
//! # Example
//!
//! ```
//! use mesh_bvh::Bvh;
//! use mesh_sdf::{Voxelizer, VoxelizerConfig};
//! use mesh_types::{uv_sphere, MeshTopology};
//!
//! let bvh = Bvh::load(uv_sphere(1.0, 16, 8).triangle_soup())?;
//! let voxelizer = Voxelizer::new(VoxelizerConfig::default().with_resolution(4).with_threads(2))?;
//!
//! let mut volume = voxelizer.voxelize(&bvh)?;
//! let stats = voxelizer.refine(&bvh, &mut volume)?;
//! assert_eq!(stats.triangles, bvh.triangle_count());
//!
//! // 16 layers of 16x16 packed into a 4x4 grid of tiles
//! let atlas = volume.atlas()?;
//! assert_eq!(atlas.width(), 64);
//! # Ok::<(), mesh_sdf::SdfError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod config;
mod error;
mod image;
mod pool;
mod refine;
mod volume;
mod voxelize;

pub use config::{DistanceEncoding, MAX_RESOLUTION_EXPONENT, VoxelizerConfig};
pub use error::{SdfError, SdfResult};
pub use image::Image;
pub use pool::WorkerPool;
pub use refine::{PALETTE_SIZE, RefineStats, refine_palette};
pub use volume::{SdfGrid, SdfVolume};
pub use voxelize::{Voxelizer, voxelize};
