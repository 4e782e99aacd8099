//! Linear contrast windowing of 16-bit rasters into 8-bit display rasters.
//!
//! Every sample is clipped to `[lower, upper]` and rescaled to `[0, 255]`
//! with round-to-nearest. A zero-width window produces an all-black raster.

use ndarray::{Array3, Zip};
use tracing::debug;

use crate::consts::{DISPLAY_MAX, PARALLEL_PIXEL_THRESHOLD};
use crate::contrast::ContrastWindow;
use crate::raster::{Raster16, Raster8};

/// Lookup table mapping every 16-bit sample to its windowed 8-bit value.
pub struct WindowLut {
    table: Vec<u8>,
}

impl WindowLut {
    pub fn new(window: ContrastWindow) -> Self {
        let lower = window.lower() as u32;
        let upper = window.upper() as u32;
        let table = if window.is_degenerate() {
            vec![0u8; 1 << 16]
        } else {
            let range = (upper - lower) as f64;
            (0..=u16::MAX as u32)
                .map(|s| {
                    let clipped = s.clamp(lower, upper);
                    ((clipped - lower) as f64 / range * DISPLAY_MAX as f64).round() as u8
                })
                .collect()
        };
        Self { table }
    }

    #[inline]
    pub fn apply(&self, sample: u16) -> u8 {
        self.table[sample as usize]
    }
}

/// Window a 16-bit raster with explicit bounds. Channel count is preserved.
pub fn window(raster: &Raster16, window: ContrastWindow) -> Raster8 {
    let lut = WindowLut::new(window);
    let src = raster.data();

    let data = if raster.width() * raster.height() >= PARALLEL_PIXEL_THRESHOLD {
        let mut out = Array3::<u8>::zeros(src.dim());
        Zip::from(&mut out)
            .and(src)
            .par_for_each(|o, &s| *o = lut.apply(s));
        out
    } else {
        src.mapv(|s| lut.apply(s))
    };

    debug!(
        lower = window.lower(),
        upper = window.upper(),
        width = raster.width(),
        height = raster.height(),
        "Windowing applied"
    );
    Raster8::new(data)
}

/// Window with bounds derived from the raster's own minimum and maximum.
pub fn window_auto(raster: &Raster16) -> (Raster8, ContrastWindow) {
    let contrast = default_window(raster);
    (window(raster, contrast), contrast)
}

/// `(min, max)` window of the raster; degenerate `(0, 0)` for an empty raster.
pub fn default_window(raster: &Raster16) -> ContrastWindow {
    match raster.min_max() {
        Some((lo, hi)) => ContrastWindow::from_bounds(lo as i64, hi as i64),
        None => ContrastWindow::from_bounds(0, 0),
    }
}
