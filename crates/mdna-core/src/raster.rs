use std::fmt;

use ndarray::{s, Array3, ArrayView3};
use num_traits::{Bounded, NumCast, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// Pixel sample type of a raster.
pub trait Sample:
    Copy + Send + Sync + Default + PartialOrd + Zero + Bounded + NumCast + ToPrimitive + fmt::Debug + 'static
{
    const BIT_DEPTH: u8;
}

impl Sample for u8 {
    const BIT_DEPTH: u8 = 8;
}

impl Sample for u16 {
    const BIT_DEPTH: u8 = 16;
}

/// Width and height of a raster, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An owned image of `T` samples.
///
/// Pixel data is row-major with shape `(height, width, channels)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<T> {
    data: Array3<T>,
}

/// 16-bit source raster (1 or 3 channels).
pub type Raster16 = Raster<u16>;

/// 8-bit display raster.
pub type Raster8 = Raster<u8>;

impl<T: Sample> Raster<T> {
    pub fn new(data: Array3<T>) -> Self {
        Self { data }
    }

    pub fn zeros(width: usize, height: usize, channels: usize) -> Self {
        Self {
            data: Array3::from_elem((height, width, channels), T::zero()),
        }
    }

    /// Build a raster from interleaved samples (`[c0, c1, .., c0, c1, ..]` row by row).
    pub fn from_vec(width: usize, height: usize, channels: usize, samples: Vec<T>) -> Result<Self> {
        let expected = width * height * channels;
        if samples.len() != expected {
            return Err(ViewerError::InvalidRaster(format!(
                "{width}x{height}x{channels} needs {expected} samples, got {}",
                samples.len()
            )));
        }
        let data = Array3::from_shape_vec((height, width, channels), samples)
            .map_err(|e| ViewerError::InvalidRaster(e.to_string()))?;
        Ok(Self { data })
    }

    /// Build a raster by evaluating `f(row, col, channel)` for every sample.
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, f: F) -> Self
    where
        F: FnMut((usize, usize, usize)) -> T,
    {
        Self {
            data: Array3::from_shape_fn((height, width, channels), f),
        }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn bit_depth(&self) -> u8 {
        T::BIT_DEPTH
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.width() as u32, self.height() as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    pub fn sample(&self, x: usize, y: usize, channel: usize) -> T {
        self.data[[y, x, channel]]
    }

    /// Interleaved samples in row-major order.
    pub fn to_interleaved(&self) -> Vec<T> {
        self.data.iter().copied().collect()
    }

    /// Copy out the rectangle `[x, x+w) x [y, y+h)`, intersected with the raster bounds.
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> Self {
        let x0 = x.min(self.width());
        let y0 = y.min(self.height());
        let x1 = x.saturating_add(w).min(self.width());
        let y1 = y.saturating_add(h).min(self.height());
        Self {
            data: self.data.slice(s![y0..y1, x0..x1, ..]).to_owned(),
        }
    }

    /// Smallest and largest sample over all channels; `None` for an empty raster.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }

    /// Check that `other` has the same width and height.
    pub fn ensure_same_size<U: Sample>(&self, other: &Raster<U>) -> Result<()> {
        if self.width() != other.width() || self.height() != other.height() {
            return Err(ViewerError::DimensionMismatch {
                expected_w: self.width(),
                expected_h: self.height(),
                found_w: other.width(),
                found_h: other.height(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_is_clamped_to_bounds() {
        let raster = Raster16::from_fn(10, 8, 1, |(r, c, _)| (r * 10 + c) as u16);
        let cropped = raster.crop(7, 6, 10, 10);
        assert_eq!(cropped.dims(), Dims::new(3, 2));
        assert_eq!(cropped.sample(0, 0, 0), 67);
    }

    #[test]
    fn min_max_covers_all_samples() {
        let raster = Raster16::from_vec(2, 2, 1, vec![5, 900, 3, 42]).unwrap();
        assert_eq!(raster.min_max(), Some((3, 900)));
        assert_eq!(Raster16::zeros(0, 0, 1).min_max(), None);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Raster8::from_vec(2, 2, 3, vec![0; 11]).is_err());
    }
}
