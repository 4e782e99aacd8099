#![allow(dead_code)]

use mdna_core::config::ViewerConfig;
use mdna_core::pyramid::WindowedImage;
use mdna_core::raster::{Dims, Raster16, Raster8};
use mdna_core::session::ViewerSession;
use mdna_core::windowing::window_auto;

/// Single-channel 16-bit ramp: each sample is `(x + y * width) * step`, saturating.
pub fn ramp16(width: usize, height: usize, step: u32) -> Raster16 {
    Raster16::from_fn(width, height, 1, |(y, x, _)| {
        ((x + y * width) as u32 * step).min(u16::MAX as u32) as u16
    })
}

/// Single-channel 16-bit raster filled with `value`.
pub fn flat16(width: usize, height: usize, value: u16) -> Raster16 {
    Raster16::from_fn(width, height, 1, |_| value)
}

/// Single-channel raster rising linearly from `lo` (first pixel) to `hi` (last pixel).
pub fn banded16(width: usize, height: usize, lo: u16, hi: u16) -> Raster16 {
    let last = (width * height).saturating_sub(1).max(1) as u64;
    Raster16::from_fn(width, height, 1, |(y, x, _)| {
        let idx = (x + y * width) as u64;
        lo + (idx * (hi - lo) as u64 / last) as u16
    })
}

/// RGB 8-bit display raster with a gradient in every channel.
pub fn windowed_rgb(width: usize, height: usize) -> WindowedImage {
    let (raster, contrast) = window_auto(&ramp16(width, height, 1));
    let rgb = Raster8::from_fn(width, height, 3, |(y, x, _)| raster.sample(x, y, 0));
    WindowedImage::new(rgb, contrast)
}

/// Viewer configuration without contrast debounce, for deterministic sessions.
pub fn test_config(canvas: Dims) -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.canvas = canvas;
    config.contrast.debounce_ms = 0;
    config
}

pub fn session_with(green: Raster16, red: Option<Raster16>, canvas: Dims) -> ViewerSession {
    let mut session = ViewerSession::new(test_config(canvas)).unwrap();
    session.load_rasters(green, red);
    session
}
