//! Single-channel float pixel buffer.

use std::slice::ChunksExactMut;

use crate::error::{SdfError, SdfResult};

/// A row-major single-channel `f32` image.
///
/// Pixel `(x, y)` lives at `data[y * width + x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Image {
    /// Create a zero-filled image.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::AllocationFailed`] when the pixel count overflows
    /// or the allocator refuses the buffer.
    pub fn new(width: usize, height: usize) -> SdfResult<Self> {
        let pixels = width
            .checked_mul(height)
            .ok_or(SdfError::AllocationFailed {
                bytes: usize::MAX,
                limit: usize::MAX,
            })?;
        let data = zeroed(pixels)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing pixels; `None` if `data.len() != width * height`.
    #[must_use]
    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Option<Self> {
        (width.checked_mul(height) == Some(data.len())).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// All pixels, row-major, mutable.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the image, returning its pixels.
    #[must_use]
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Pixel at `(x, y)`, `None` outside the image.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Write pixel `(x, y)`. Returns `false` (and writes nothing) outside the image.
    pub fn set(&mut self, x: usize, y: usize, value: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        match self.data.get_mut(y * self.width + x) {
            Some(px) => {
                *px = value;
                true
            }
            None => false,
        }
    }

    /// Row `y`, `None` outside the image.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        self.data.get(y * self.width..(y + 1) * self.width)
    }

    /// Mutable rows, top to bottom.
    pub fn rows_mut(&mut self) -> ChunksExactMut<'_, f32> {
        self.data.chunks_exact_mut(self.width.max(1))
    }

    /// Copy `src` into this image with its top-left corner at `(x0, y0)`.
    ///
    /// Pixels falling outside this image are clipped.
    pub fn blit(&mut self, src: &Self, x0: usize, y0: usize) {
        if x0 >= self.width || y0 >= self.height {
            return;
        }
        let w = src.width.min(self.width - x0);
        let h = src.height.min(self.height - y0);
        for y in 0..h {
            let dst_start = (y0 + y) * self.width + x0;
            let src_start = y * src.width;
            self.data[dst_start..dst_start + w].copy_from_slice(&src.data[src_start..src_start + w]);
        }
    }

    /// Replicate every sample into four channels, `[v, v, v, v]` per pixel.
    #[must_use]
    pub fn to_rgba(&self) -> Vec<[f32; 4]> {
        self.data.iter().map(|&v| [v; 4]).collect()
    }
}

/// Allocate `len` zeroed samples occupying `bytes`, refusing anything over
/// `limit` before touching the allocator.
pub(crate) fn zeroed_within(bytes: Option<usize>, len: usize, limit: usize) -> SdfResult<Vec<f32>> {
    match bytes {
        Some(bytes) if bytes <= limit => zeroed(len),
        bytes => Err(SdfError::AllocationFailed {
            bytes: bytes.unwrap_or(usize::MAX),
            limit,
        }),
    }
}

/// Allocate `len` zeroed samples without aborting on allocation failure.
pub(crate) fn zeroed(len: usize) -> SdfResult<Vec<f32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| SdfError::AllocationFailed {
        bytes: len.saturating_mul(std::mem::size_of::<f32>()),
        limit: len.saturating_mul(std::mem::size_of::<f32>()),
    })?;
    data.resize(len, 0.0);
    Ok(data)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn get_set() {
        let mut img = Image::new(3, 2).unwrap();
        assert!(img.set(2, 1, 0.5));
        assert!(!img.set(3, 0, 1.0));
        assert_eq!(img.get(2, 1), Some(0.5));
        assert_eq!(img.data()[5], 0.5);
        assert_eq!(img.get(0, 2), None);
        assert_eq!(img.row(1), Some(&[0.0, 0.0, 0.5][..]));
    }

    #[test]
    fn from_raw_checks_size() {
        assert!(Image::from_raw(2, 2, vec![0.0; 4]).is_some());
        assert!(Image::from_raw(2, 2, vec![0.0; 3]).is_none());
    }

    #[test]
    fn rows_mut_iterates_rows() {
        let mut img = Image::new(4, 3).unwrap();
        for (y, row) in img.rows_mut().enumerate() {
            row.fill(f32::from(u8::try_from(y).unwrap()));
        }
        assert_eq!(img.get(3, 2), Some(2.0));
    }

    #[test]
    fn blit_clips() {
        let tile = Image::from_raw(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut atlas = Image::new(3, 3).unwrap();
        atlas.blit(&tile, 0, 0);
        atlas.blit(&tile, 2, 2);
        assert_eq!(atlas.get(1, 1), Some(4.0));
        assert_eq!(atlas.get(2, 2), Some(1.0));
        assert_eq!(atlas.get(2, 1), Some(0.0));
    }

    #[test]
    fn zeroed_within_checks_limit_first() {
        assert_eq!(zeroed_within(Some(16), 4, 16).unwrap(), vec![0.0; 4]);
        assert!(matches!(
            zeroed_within(Some(20), 5, 16),
            Err(SdfError::AllocationFailed { bytes: 20, limit: 16 })
        ));
        assert!(matches!(
            zeroed_within(None, usize::MAX, 16),
            Err(SdfError::AllocationFailed { bytes: usize::MAX, limit: 16 })
        ));
    }

    #[test]
    fn rgba_replicates() {
        let img = Image::from_raw(1, 1, vec![0.25]).unwrap();
        assert_eq!(img.to_rgba(), vec![[0.25; 4]]);
    }
}
