//! Voxelizer configuration.

use crate::error::{SdfError, SdfResult};

/// Largest supported grid exponent (`R = 2^10 = 1024` voxels per axis).
pub const MAX_RESOLUTION_EXPONENT: u32 = 10;

/// How a signed distance is stored as a sample in `[0, 1]`.
///
/// Both encodings put the surface at `0.5` and clamp at `±max_dist`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceEncoding {
    /// Inside reads above `0.5`: `clamp(-d / max_dist, -1, 1) * 0.5 + 0.5`.
    #[default]
    InsideHigh,
    /// Inside reads below `0.5`: `clamp(d / max_dist, -1, 1) * 0.5 + 0.5`.
    InsideLow,
}

impl DistanceEncoding {
    /// Map a signed distance to a normalized sample.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_sdf::DistanceEncoding;
    ///
    /// assert_eq!(DistanceEncoding::InsideHigh.encode(-2.0, 1.0), 1.0);
    /// assert_eq!(DistanceEncoding::InsideLow.encode(-2.0, 1.0), 0.0);
    /// assert_eq!(DistanceEncoding::InsideLow.encode(0.5, 1.0), 0.75);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(self, distance: f64, max_dist: f64) -> f32 {
        let d = match self {
            Self::InsideHigh => -distance,
            Self::InsideLow => distance,
        };
        ((d / max_dist).clamp(-1.0, 1.0) * 0.5 + 0.5) as f32
    }

    /// Map a normalized sample back to a signed distance.
    ///
    /// Exact only for samples that were not clamped.
    #[must_use]
    pub fn decode(self, sample: f32, max_dist: f64) -> f64 {
        let d = (f64::from(sample) - 0.5) * 2.0 * max_dist;
        match self {
            Self::InsideHigh => -d,
            Self::InsideLow => d,
        }
    }
}

/// Configuration for SDF voxelization and refinement.
///
/// # Example
///
/// ```
/// use mesh_sdf::VoxelizerConfig;
///
/// let config = VoxelizerConfig::preview().with_threads(2);
/// assert_eq!(config.voxel_resolution(), 32);
/// assert_eq!(config.layers_per_side(), 6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelizerConfig {
    /// Grid exponent `N`; the grid has `2^N` voxels per axis.
    pub resolution: u32,
    /// Padding added around the cubed bounds, as a fraction of the squared
    /// diagonal length.
    pub padding_pct: f64,
    /// Refinement offset along face normals, as a fraction of the maximum
    /// encoded distance.
    pub refinement_distance: f64,
    /// Samples taken per triangle by the refiner.
    pub refinement_samples: usize,
    /// Seed of the refiner's jitter palette.
    pub refinement_seed: u64,
    /// Sample encoding.
    pub encoding: DistanceEncoding,
    /// Worker threads (0 = available parallelism).
    pub threads: usize,
    /// Byte budget for voxel buffers.
    pub memory_limit: usize,
}

impl Default for VoxelizerConfig {
    fn default() -> Self {
        Self {
            resolution: 6,
            padding_pct: 0.01,
            refinement_distance: 0.01,
            refinement_samples: 1,
            refinement_seed: 0x5DF0_5EED,
            encoding: DistanceEncoding::InsideHigh,
            threads: 0,
            memory_limit: 1 << 30,
        }
    }
}

impl VoxelizerConfig {
    /// Coarse 32³ grid for quick previews.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            resolution: 5,
            ..Self::default()
        }
    }

    /// Fine 256³ grid with more refinement samples.
    #[must_use]
    pub fn high_quality() -> Self {
        Self {
            resolution: 8,
            refinement_samples: 4,
            ..Self::default()
        }
    }

    /// Set the grid exponent.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the padding fraction.
    #[must_use]
    pub const fn with_padding_pct(mut self, padding_pct: f64) -> Self {
        self.padding_pct = padding_pct;
        self
    }

    /// Set the refinement offset fraction.
    #[must_use]
    pub const fn with_refinement_distance(mut self, refinement_distance: f64) -> Self {
        self.refinement_distance = refinement_distance;
        self
    }

    /// Set the number of refinement samples per triangle.
    #[must_use]
    pub const fn with_refinement_samples(mut self, samples: usize) -> Self {
        self.refinement_samples = samples;
        self
    }

    /// Set the jitter palette seed.
    #[must_use]
    pub const fn with_refinement_seed(mut self, seed: u64) -> Self {
        self.refinement_seed = seed;
        self
    }

    /// Set the sample encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: DistanceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the worker count (0 = available parallelism).
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the byte budget for voxel buffers.
    #[must_use]
    pub const fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Voxels per axis, `2^resolution`.
    #[must_use]
    pub const fn voxel_resolution(&self) -> usize {
        1 << self.resolution
    }

    /// Tiles per atlas side, `ceil(sqrt(voxel_resolution))`.
    #[must_use]
    pub const fn layers_per_side(&self) -> usize {
        ceil_sqrt(self.voxel_resolution())
    }

    /// Atlas side length in pixels.
    #[must_use]
    pub const fn atlas_side(&self) -> usize {
        self.voxel_resolution() * self.layers_per_side()
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// [`SdfError::InvalidResolution`] for an exponent outside
    /// `1..=MAX_RESOLUTION_EXPONENT`, [`SdfError::InvalidConfig`] for
    /// negative or non-finite fractions and zero refinement samples.
    pub fn validate(&self) -> SdfResult<()> {
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION_EXPONENT {
            return Err(SdfError::InvalidResolution {
                exponent: self.resolution,
                max: MAX_RESOLUTION_EXPONENT,
            });
        }
        if !self.padding_pct.is_finite() || self.padding_pct < 0.0 {
            return Err(SdfError::InvalidConfig(format!(
                "padding_pct must be finite and non-negative, got {}",
                self.padding_pct
            )));
        }
        if !self.refinement_distance.is_finite() || self.refinement_distance < 0.0 {
            return Err(SdfError::InvalidConfig(format!(
                "refinement_distance must be finite and non-negative, got {}",
                self.refinement_distance
            )));
        }
        if self.refinement_samples == 0 {
            return Err(SdfError::InvalidConfig(
                "refinement_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Smallest `s` with `s * s >= n`.
pub(crate) const fn ceil_sqrt(n: usize) -> usize {
    let mut s = 0;
    while s * s < n {
        s += 1;
    }
    s
}
