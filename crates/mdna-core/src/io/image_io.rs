use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};
use tracing::debug;

use crate::consts::TIFF_EXTENSIONS;
use crate::error::{Result, ViewerError};
use crate::raster::{Raster16, Raster8};

/// Reject anything but `.tif`/`.tiff` before touching the file.
pub fn ensure_tiff(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(ext) if TIFF_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ViewerError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn open_tiff(path: &Path) -> Result<DynamicImage> {
    ensure_tiff(path)?;
    image::open(path).map_err(|e| ViewerError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load a TIFF as a single-channel 16-bit raster. Colour images are reduced to luma.
pub fn load_channel(path: &Path) -> Result<Raster16> {
    let gray = open_tiff(path)?.to_luma16();
    let (w, h) = gray.dimensions();
    debug!(path = %path.display(), width = w, height = h, "Channel decoded");
    Raster16::from_vec(w as usize, h as usize, 1, gray.into_raw())
}

/// Load a TIFF keeping its layout: one channel for greyscale, three otherwise.
pub fn load_raster(path: &Path) -> Result<Raster16> {
    let img = open_tiff(path)?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    if img.color().has_color() {
        Raster16::from_vec(w, h, 3, img.to_rgb16().into_raw())
    } else {
        Raster16::from_vec(w, h, 1, img.to_luma16().into_raw())
    }
}

/// Save an 8-bit raster as PNG (greyscale for one channel, RGB for three).
pub fn save_png(raster: &Raster8, path: &Path) -> Result<()> {
    let (w, h) = (raster.width() as u32, raster.height() as u32);
    let pixels = raster.to_interleaved();
    match raster.channels() {
        1 => ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w, h, pixels)
            .ok_or_else(|| buffer_error(raster.channels()))?
            .save_with_format(path, ImageFormat::Png)?,
        3 => ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(w, h, pixels)
            .ok_or_else(|| buffer_error(raster.channels()))?
            .save_with_format(path, ImageFormat::Png)?,
        n => return Err(buffer_error(n)),
    }
    Ok(())
}

/// Save a single-channel 16-bit raster as greyscale TIFF.
pub fn save_tiff(raster: &Raster16, path: &Path) -> Result<()> {
    if raster.channels() != 1 {
        return Err(buffer_error(raster.channels()));
    }
    let (w, h) = (raster.width() as u32, raster.height() as u32);
    ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w, h, raster.to_interleaved())
        .ok_or_else(|| buffer_error(1))?
        .save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

fn buffer_error(channels: usize) -> ViewerError {
    ViewerError::InvalidRaster(format!("cannot encode a {channels}-channel raster"))
}
