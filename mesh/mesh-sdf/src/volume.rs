//! Voxel grid geometry and the layered SDF volume.

use mesh_types::{Aabb, Point3, Vector3};

use crate::config::{DistanceEncoding, VoxelizerConfig, ceil_sqrt};
use crate::error::{SdfError, SdfResult};
use crate::image::{Image, zeroed_within};

/// Placement of a cubic voxel grid in world space.
///
/// The grid covers `bounds`, the mesh bounds squared to a cube about their
/// center and then padded. Voxel `(x, y, z)` samples the world point
/// `bounds.min + (x, y, z) / R * size`, so voxel `(0, 0, 0)` sits on the
/// minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfGrid {
    bounds: Aabb,
    resolution: usize,
    layers_per_side: usize,
    max_dist: f64,
}

impl SdfGrid {
    /// Grid for a mesh with the given bounds.
    ///
    /// The bounds are squared, then expanded on every side by
    /// `padding_pct * |diagonal|²` of the squared box.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_sdf::{SdfGrid, VoxelizerConfig};
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
    /// let grid = SdfGrid::new(&bounds, &VoxelizerConfig::default().with_padding_pct(0.0));
    ///
    /// assert_eq!(grid.resolution(), 64);
    /// assert_eq!(grid.bounds().size().y, 2.0);
    /// assert!((grid.max_dist() - 3.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn new(mesh_bounds: &Aabb, config: &VoxelizerConfig) -> Self {
        let cube = mesh_bounds.squared();
        let diag = cube.diagonal();
        let bounds = cube.expanded(config.padding_pct * diag * diag);
        let resolution = config.voxel_resolution();

        Self {
            bounds,
            resolution,
            layers_per_side: ceil_sqrt(resolution),
            max_dist: bounds.diagonal() * 0.5,
        }
    }

    /// World-space region covered by the grid.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Voxels per axis, `R`.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Atlas tiles per side, `ceil(sqrt(R))`.
    #[must_use]
    pub const fn layers_per_side(&self) -> usize {
        self.layers_per_side
    }

    /// Atlas side length in pixels.
    #[must_use]
    pub const fn atlas_side(&self) -> usize {
        self.resolution * self.layers_per_side
    }

    /// Half the padded diagonal; distances are clamped to `±max_dist`.
    #[must_use]
    pub const fn max_dist(&self) -> f64 {
        self.max_dist
    }

    /// Total number of voxels, `R³`.
    #[must_use]
    pub const fn voxel_count(&self) -> usize {
        self.resolution * self.resolution * self.resolution
    }

    /// Edge length of one voxel.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn voxel_size(&self) -> f64 {
        self.bounds.max_extent() / self.resolution as f64
    }

    /// World position sampled by voxel `(x, y, z)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_position(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        let r = self.resolution as f64;
        let t = Vector3::new(x as f64 / r, y as f64 / r, z as f64 / r);
        self.bounds.min + t.component_mul(&self.bounds.size())
    }

    /// Voxel containing `point`, `None` outside the grid bounds.
    ///
    /// Points on the maximum faces map into the last voxel.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn voxel_of(&self, point: &Point3<f64>) -> Option<(usize, usize, usize)> {
        if !self.bounds.contains(point) {
            return None;
        }
        let r = self.resolution as f64;
        let size = self.bounds.size();
        let last = self.resolution - 1;
        // Non-negative and finite: the point is inside the bounds
        let cell = |axis: usize| {
            let t = (point[axis] - self.bounds.min[axis]) / size[axis];
            ((t * r).floor() as usize).min(last)
        };
        Some((cell(0), cell(1), cell(2)))
    }

    /// Flat z-major index of voxel `(x, y, z)`.
    #[must_use]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.resolution + y) * self.resolution + x
    }

    /// Top-left atlas pixel of layer `z`'s tile, `(z % L, z / L)` in tiles.
    #[must_use]
    pub const fn tile_origin(&self, z: usize) -> (usize, usize) {
        (
            (z % self.layers_per_side) * self.resolution,
            (z / self.layers_per_side) * self.resolution,
        )
    }

    /// Bytes needed for the full grid of `f32` samples.
    #[must_use]
    pub fn volume_bytes(&self) -> Option<usize> {
        self.resolution
            .checked_pow(3)?
            .checked_mul(std::mem::size_of::<f32>())
    }

    /// Bytes needed for the packed atlas.
    #[must_use]
    pub fn atlas_bytes(&self) -> Option<usize> {
        self.atlas_side()
            .checked_pow(2)?
            .checked_mul(std::mem::size_of::<f32>())
    }
}

/// A voxelized signed distance field.
///
/// Holds `R³` normalized samples stored layer by layer: layer `z` is the
/// XY slice at depth `z`, row-major. The packed atlas is produced on demand
/// by [`SdfVolume::atlas`], under the same memory limit the volume was
/// voxelized with.
#[derive(Debug, Clone, PartialEq)]
pub struct SdfVolume {
    grid: SdfGrid,
    encoding: DistanceEncoding,
    samples: Vec<f32>,
    memory_limit: usize,
}

impl SdfVolume {
    pub(crate) const fn from_parts(
        grid: SdfGrid,
        encoding: DistanceEncoding,
        samples: Vec<f32>,
        memory_limit: usize,
    ) -> Self {
        Self {
            grid,
            encoding,
            samples,
            memory_limit,
        }
    }

    /// Grid geometry.
    #[must_use]
    pub const fn grid(&self) -> &SdfGrid {
        &self.grid
    }

    /// Encoding of the samples.
    #[must_use]
    pub const fn encoding(&self) -> DistanceEncoding {
        self.encoding
    }

    /// Byte limit for buffers derived from this volume, such as the atlas.
    #[must_use]
    pub const fn memory_limit(&self) -> usize {
        self.memory_limit
    }

    /// All samples, z-major.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Normalized sample of voxel `(x, y, z)`.
    #[must_use]
    pub fn sample(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        let r = self.grid.resolution;
        if x >= r || y >= r || z >= r {
            return None;
        }
        self.samples.get(self.grid.index(x, y, z)).copied()
    }

    /// Signed world distance stored at voxel `(x, y, z)`.
    ///
    /// Exact up to `f32` rounding for unclamped samples.
    #[must_use]
    pub fn distance(&self, x: usize, y: usize, z: usize) -> Option<f64> {
        self.sample(x, y, z).map(|s| self.decode(s))
    }

    /// Map a sample of this volume back to a signed world distance.
    #[must_use]
    pub fn decode(&self, sample: f32) -> f64 {
        self.encoding.decode(sample, self.grid.max_dist)
    }

    /// Samples of layer `z`, row-major.
    #[must_use]
    pub fn layer(&self, z: usize) -> Option<&[f32]> {
        let n = self.grid.resolution * self.grid.resolution;
        self.samples.get(z.checked_mul(n)?..(z + 1).checked_mul(n)?)
    }

    /// Layer `z` as an `R × R` image.
    ///
    /// # Errors
    ///
    /// [`SdfError::LayerOutOfRange`] for `z >= R`.
    pub fn layer_image(&self, z: usize) -> SdfResult<Image> {
        let r = self.grid.resolution;
        self.layer(z)
            .and_then(|layer| Image::from_raw(r, r, layer.to_vec()))
            .ok_or(SdfError::LayerOutOfRange { layer: z, layers: r })
    }

    /// Pack all layers into one atlas image of `L × L` tiles.
    ///
    /// Layer `z` goes to tile `(z % L, z / L)`; unused tiles stay zero.
    ///
    /// # Errors
    ///
    /// [`SdfError::AllocationFailed`] if the atlas exceeds the memory limit
    /// or cannot be allocated. With an odd grid exponent the atlas is larger
    /// than the volume itself.
    pub fn atlas(&self) -> SdfResult<Image> {
        let side = self.grid.atlas_side();
        let r = self.grid.resolution;
        let pixels = side.saturating_mul(side);
        let data = zeroed_within(self.grid.atlas_bytes(), pixels, self.memory_limit)?;
        let mut atlas = Image::from_raw(side, side, data).ok_or(SdfError::AllocationFailed {
            bytes: pixels.saturating_mul(std::mem::size_of::<f32>()),
            limit: self.memory_limit,
        })?;
        for z in 0..r {
            let (x0, y0) = self.grid.tile_origin(z);
            let Some(layer) = self.layer(z) else { break };
            for (y, row) in layer.chunks_exact(r).enumerate() {
                let start = (y0 + y) * side + x0;
                atlas.data_mut()[start..start + r].copy_from_slice(row);
            }
        }
        Ok(atlas)
    }

    /// Nearest-voxel lookup of the signed distance at a world point.
    #[must_use]
    pub fn distance_at(&self, point: &Point3<f64>) -> Option<f64> {
        let (x, y, z) = self.grid.voxel_of(point)?;
        self.distance(x, y, z)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(resolution: u32) -> SdfGrid {
        let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        SdfGrid::new(
            &bounds,
            &VoxelizerConfig::default()
                .with_resolution(resolution)
                .with_padding_pct(0.0),
        )
    }

    #[test]
    fn padding_uses_squared_diagonal() {
        let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let grid = SdfGrid::new(&bounds, &VoxelizerConfig::default().with_padding_pct(0.1));
        // |diag|² = 3, so each side moves out by 0.3
        assert_relative_eq!(grid.bounds().min.x, -0.3, epsilon = 1e-12);
        assert_relative_eq!(grid.bounds().max.z, 1.3, epsilon = 1e-12);
        assert_relative_eq!(grid.max_dist(), 1.6 * 3.0_f64.sqrt() / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn world_position_and_voxel_of_agree() {
        let g = grid(3);
        assert_eq!(g.world_position(0, 0, 0), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(g.world_position(4, 2, 1), Point3::new(0.5, 0.25, 0.125));
        assert_eq!(g.voxel_of(&Point3::new(0.5, 0.25, 0.125)), Some((4, 2, 1)));
        assert_eq!(g.voxel_of(&Point3::new(1.0, 1.0, 1.0)), Some((7, 7, 7)));
        assert_eq!(g.voxel_of(&Point3::new(1.01, 0.5, 0.5)), None);
        assert_relative_eq!(g.voxel_size(), 0.125);
    }

    #[test]
    fn tile_layout() {
        let g = grid(3);
        assert_eq!(g.layers_per_side(), 3);
        assert_eq!(g.tile_origin(0), (0, 0));
        assert_eq!(g.tile_origin(4), (8, 8));
        assert_eq!(g.tile_origin(7), (8, 16));
        assert_eq!(g.atlas_bytes(), Some(24 * 24 * 4));
        assert_eq!(g.volume_bytes(), Some(512 * 4));
    }

    #[test]
    fn atlas_places_layers_in_tiles() {
        let g = grid(2);
        let r = g.resolution();
        // Each sample encodes its own layer index
        let samples: Vec<f32> = (0..g.voxel_count())
            .map(|i| f32::from(u8::try_from(i / (r * r)).unwrap()))
            .collect();
        let volume = SdfVolume::from_parts(g, DistanceEncoding::InsideHigh, samples, usize::MAX);

        let atlas = volume.atlas().unwrap();
        assert_eq!(atlas.width(), 8);
        for z in 0..r {
            let (x0, y0) = g.tile_origin(z);
            assert_eq!(atlas.get(x0 + 3, y0 + 3), Some(f32::from(u8::try_from(z).unwrap())));
        }

        let layer = volume.layer_image(2).unwrap();
        assert_eq!(layer.data(), volume.layer(2).unwrap());
        assert!(matches!(
            volume.layer_image(4),
            Err(SdfError::LayerOutOfRange { layer: 4, layers: 4 })
        ));
    }

    #[test]
    fn atlas_larger_than_volume_is_refused() {
        let g = grid(3);
        let samples = vec![0.5; g.voxel_count()];
        let volume = SdfVolume::from_parts(g, DistanceEncoding::InsideHigh, samples, 2048);
        assert!(matches!(
            volume.atlas(),
            Err(SdfError::AllocationFailed { bytes: 2304, limit: 2048 })
        ));
    }

    #[test]
    fn decode_inverts_encoding() {
        let g = grid(1);
        let encoding = DistanceEncoding::InsideLow;
        let s = encoding.encode(-0.2, g.max_dist());
        let volume = SdfVolume::from_parts(g, encoding, vec![s; 8], usize::MAX);
        assert_relative_eq!(volume.distance(1, 1, 1).unwrap(), -0.2, epsilon = 1e-6);
        assert_relative_eq!(
            volume.distance_at(&Point3::new(0.9, 0.1, 0.5)).unwrap(),
            -0.2,
            epsilon = 1e-6
        );
        assert!(volume.sample(2, 0, 0).is_none());
    }
}
