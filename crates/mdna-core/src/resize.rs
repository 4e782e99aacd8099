//! Aspect-preserving bilinear resize.
//!
//! All pyramid levels go through this one interpolation policy so that pixel
//! coordinates map consistently between levels.

use ndarray::Array3;
use num_traits::{NumCast, ToPrimitive};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, ViewerError};
use crate::raster::{Dims, Raster, Sample};

/// Which dimension a resize is driven by. The other follows the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeTarget {
    /// Keep the source dimensions.
    Original,
    Width(u32),
    Height(u32),
}

impl ResizeTarget {
    /// At most one of `width` / `height` may be given.
    pub fn from_options(width: Option<u32>, height: Option<u32>) -> Result<Self> {
        match (width, height) {
            (None, None) => Ok(Self::Original),
            (Some(w), None) => Ok(Self::Width(w)),
            (None, Some(h)) => Ok(Self::Height(h)),
            (Some(_), Some(_)) => Err(ViewerError::InvalidRaster(
                "resize takes a target width or a target height, not both".into(),
            )),
        }
    }

    /// Output dimensions for a source of size `src`. Never below 1x1 for a non-empty source.
    pub fn output_dims(self, src: Dims) -> Dims {
        if src.width == 0 || src.height == 0 {
            return src;
        }
        let ratio = src.height as f64 / src.width as f64;
        match self {
            Self::Original => src,
            Self::Width(w) => {
                let w = w.max(1);
                let h = (w as f64 * ratio).round().max(1.0) as u32;
                Dims::new(w, h)
            }
            Self::Height(h) => {
                let h = h.max(1);
                let w = (h as f64 / ratio).round().max(1.0) as u32;
                Dims::new(w, h)
            }
        }
    }
}

/// Source coordinate lookup for one output axis.
struct AxisMap {
    lo: Vec<usize>,
    hi: Vec<usize>,
    frac: Vec<f32>,
}

impl AxisMap {
    /// Half-pixel-centre mapping from `dst` output samples onto `src` input samples.
    fn new(src: usize, dst: usize) -> Self {
        let scale = src as f32 / dst as f32;
        let mut lo = Vec::with_capacity(dst);
        let mut hi = Vec::with_capacity(dst);
        let mut frac = Vec::with_capacity(dst);
        let last = src - 1;

        for d in 0..dst {
            let pos = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let i0 = (pos.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let f = if i0 == last { 0.0 } else { pos - i0 as f32 };
            lo.push(i0);
            hi.push(i1);
            frac.push(f);
        }

        Self { lo, hi, frac }
    }
}

/// Resize `raster` to `target` with bilinear interpolation.
pub fn resize<T: Sample>(raster: &Raster<T>, target: ResizeTarget) -> Raster<T> {
    let src_dims = raster.dims();
    let out_dims = target.output_dims(src_dims);
    if out_dims == src_dims {
        return raster.clone();
    }

    let (dw, dh) = (out_dims.width as usize, out_dims.height as usize);
    let channels = raster.channels();
    let xs = AxisMap::new(raster.width(), dw);
    let ys = AxisMap::new(raster.height(), dh);
    let src = raster.data();
    let max = T::max_value().to_f32().unwrap_or(f32::MAX);

    let resample_row = |dy: usize| -> Vec<T> {
        let (y0, y1, wy) = (ys.lo[dy], ys.hi[dy], ys.frac[dy]);
        let mut row = Vec::with_capacity(dw * channels);
        for dx in 0..dw {
            let (x0, x1, wx) = (xs.lo[dx], xs.hi[dx], xs.frac[dx]);
            for c in 0..channels {
                let p00 = src[[y0, x0, c]].to_f32().unwrap_or(0.0);
                let p01 = src[[y0, x1, c]].to_f32().unwrap_or(0.0);
                let p10 = src[[y1, x0, c]].to_f32().unwrap_or(0.0);
                let p11 = src[[y1, x1, c]].to_f32().unwrap_or(0.0);
                let top = p00 + (p01 - p00) * wx;
                let bottom = p10 + (p11 - p10) * wx;
                let v = (top + (bottom - top) * wy).round().clamp(0.0, max);
                row.push(<T as NumCast>::from(v).unwrap_or_default());
            }
        }
        row
    };

    let rows: Vec<Vec<T>> = if dw * dh >= PARALLEL_PIXEL_THRESHOLD {
        (0..dh).into_par_iter().map(resample_row).collect()
    } else {
        (0..dh).map(resample_row).collect()
    };

    let samples: Vec<T> = rows.into_iter().flatten().collect();
    let data = Array3::from_shape_vec((dh, dw, channels), samples)
        .expect("row lengths match output dimensions");

    debug!(from = %src_dims, to = %out_dims, "Raster resized");
    Raster::new(data)
}
