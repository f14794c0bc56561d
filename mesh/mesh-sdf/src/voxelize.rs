//! Multi-threaded SDF voxelization.

use std::time::Instant;

use mesh_bvh::Bvh;
use tracing::{debug, info};

use crate::config::{DistanceEncoding, VoxelizerConfig};
use crate::error::{SdfError, SdfResult};
use crate::image::{Image, zeroed_within};
use crate::pool::WorkerPool;
use crate::volume::{SdfGrid, SdfVolume};

/// Samples a BVH's signed distance field into voxel grids.
///
/// Owns a [`WorkerPool`] that is reused by every call. The BVH is only read,
/// so one hierarchy can be voxelized repeatedly with different voxelizers.
///
/// # Example
///
/// ```
/// use mesh_bvh::Bvh;
/// use mesh_sdf::{Voxelizer, VoxelizerConfig};
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let bvh = Bvh::load(unit_cube().triangle_soup())?;
/// let voxelizer = Voxelizer::new(VoxelizerConfig::default().with_resolution(3))?;
/// let volume = voxelizer.voxelize(&bvh)?;
///
/// assert_eq!(volume.samples().len(), 8 * 8 * 8);
/// // The center of the cube is inside
/// assert!(volume.sample(4, 4, 4).is_some_and(|s| s > 0.5));
/// # Ok::<(), mesh_sdf::SdfError>(())
/// ```
#[derive(Debug)]
pub struct Voxelizer {
    config: VoxelizerConfig,
    pool: WorkerPool,
}

impl Voxelizer {
    /// Validate `config` and start the worker pool.
    ///
    /// # Errors
    ///
    /// Any [`VoxelizerConfig::validate`] error, or [`SdfError::ThreadPool`].
    pub fn new(config: VoxelizerConfig) -> SdfResult<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.threads)?;
        Ok(Self { config, pool })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VoxelizerConfig {
        &self.config
    }

    /// The worker pool.
    #[must_use]
    pub const fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Grid placement this voxelizer uses for `bvh`.
    #[must_use]
    pub fn grid(&self, bvh: &Bvh) -> SdfGrid {
        SdfGrid::new(bvh.bounds(), &self.config)
    }

    /// Voxelize the whole grid.
    ///
    /// Z layers are partitioned across the workers; each worker owns a
    /// contiguous block of whole layers, so no voxel has two writers and the
    /// result does not depend on the worker count.
    ///
    /// # Errors
    ///
    /// [`SdfError::AllocationFailed`] if the grid exceeds the memory budget
    /// (checked before any worker starts), or [`SdfError::WorkerPanicked`].
    pub fn voxelize(&self, bvh: &Bvh) -> SdfResult<SdfVolume> {
        let start = Instant::now();
        let grid = self.grid(bvh);
        let r = grid.resolution();

        let mut samples = self.allocate(grid.volume_bytes(), grid.voxel_count())?;

        info!(
            triangles = bvh.triangle_count(),
            resolution = r,
            workers = self.pool.threads(),
            "Voxelizing SDF"
        );

        let encoding = self.config.encoding;
        self.pool.for_each_partition(&mut samples, r * r, |layers, chunk| {
            debug!(first = layers.start, last = layers.end - 1, "Voxelizing layers");
            for (z, layer) in layers.zip(chunk.chunks_exact_mut(r * r)) {
                for (y, row) in layer.chunks_exact_mut(r).enumerate() {
                    fill_row(bvh, &grid, encoding, y, z, row);
                }
            }
        })?;

        info!(
            voxels = grid.voxel_count(),
            elapsed_ms = start.elapsed().as_millis(),
            "SDF voxelized"
        );
        Ok(SdfVolume::from_parts(
            grid,
            encoding,
            samples,
            self.config.memory_limit,
        ))
    }

    /// Voxelize a single Z layer into an `R × R` image.
    ///
    /// Rows are partitioned across the workers instead of layers. The
    /// samples are identical to layer `z` of [`Voxelizer::voxelize`].
    ///
    /// # Errors
    ///
    /// [`SdfError::LayerOutOfRange`] for `z >= R`, [`SdfError::AllocationFailed`]
    /// or [`SdfError::WorkerPanicked`].
    pub fn voxelize_layer(&self, bvh: &Bvh, z: usize) -> SdfResult<Image> {
        let grid = self.grid(bvh);
        let r = grid.resolution();
        if z >= r {
            return Err(SdfError::LayerOutOfRange { layer: z, layers: r });
        }

        let samples = self.allocate(
            (r * r).checked_mul(std::mem::size_of::<f32>()),
            r * r,
        )?;
        let mut image = Image::from_raw(r, r, samples).ok_or(SdfError::AllocationFailed {
            bytes: r * r * std::mem::size_of::<f32>(),
            limit: self.config.memory_limit,
        })?;

        debug!(layer = z, resolution = r, "Voxelizing layer");
        let encoding = self.config.encoding;
        self.pool.for_each_partition(image.data_mut(), r, |rows, chunk| {
            for (y, row) in rows.zip(chunk.chunks_exact_mut(r)) {
                fill_row(bvh, &grid, encoding, y, z, row);
            }
        })?;
        Ok(image)
    }

    fn allocate(&self, bytes: Option<usize>, len: usize) -> SdfResult<Vec<f32>> {
        zeroed_within(bytes, len, self.config.memory_limit)
    }
}

fn fill_row(
    bvh: &Bvh,
    grid: &SdfGrid,
    encoding: DistanceEncoding,
    y: usize,
    z: usize,
    row: &mut [f32],
) {
    let max_dist = grid.max_dist();
    for (x, sample) in row.iter_mut().enumerate() {
        let p = grid.world_position(x, y, z);
        *sample = encoding.encode(bvh.min_signed_distance(&p), max_dist);
    }
}

/// Voxelize `bvh` with a one-off [`Voxelizer`].
///
/// # Errors
///
/// See [`Voxelizer::new`] and [`Voxelizer::voxelize`].
pub fn voxelize(bvh: &Bvh, config: &VoxelizerConfig) -> SdfResult<SdfVolume> {
    Voxelizer::new(config.clone())?.voxelize(bvh)
}
