//! Zoom-level cache of resized, contrast-windowed display rasters.
//!
//! Entries are tagged with the contrast window that produced them. A contrast
//! change does not clear the cache: `get_or_build` compares the stored window
//! with the requested one and rebuilds stale entries on access. Stale entries
//! therefore linger until their level is visited again.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::contrast::ContrastWindow;
use crate::raster::{Dims, Raster8};
use crate::resize::{resize, ResizeTarget};

/// Key of a pyramid level.
///
/// `Fit` orders below every step: it is the outermost zoom state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PyramidLevel {
    /// Resized to exactly the canvas height.
    Fit,
    /// Geometric zoom step; 0 is the level built on load.
    Step(i32),
}

impl fmt::Display for PyramidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fit => write!(f, "fit"),
            Self::Step(n) => write!(f, "{n}"),
        }
    }
}

/// Full-resolution display raster together with the window that produced it.
#[derive(Clone, Debug)]
pub struct WindowedImage {
    pub raster: Arc<Raster8>,
    pub contrast: ContrastWindow,
}

impl WindowedImage {
    pub fn new(raster: Raster8, contrast: ContrastWindow) -> Self {
        Self {
            raster: Arc::new(raster),
            contrast,
        }
    }

    pub fn dims(&self) -> Dims {
        self.raster.dims()
    }
}

/// One cached level.
#[derive(Clone, Debug)]
pub struct PyramidEntry {
    raster: Raster8,
    contrast: ContrastWindow,
    target: ResizeTarget,
}

impl PyramidEntry {
    pub fn raster(&self) -> &Raster8 {
        &self.raster
    }

    pub fn dims(&self) -> Dims {
        self.raster.dims()
    }

    pub fn contrast(&self) -> ContrastWindow {
        self.contrast
    }

    /// Resize target the entry was built with; a contrast refresh reuses it.
    pub fn target(&self) -> ResizeTarget {
        self.target
    }

    pub fn is_fresh(&self, contrast: ContrastWindow) -> bool {
        self.contrast == contrast
    }
}

/// Keyed store of pyramid levels.
#[derive(Debug, Default)]
pub struct PyramidCache {
    entries: BTreeMap<PyramidLevel, PyramidEntry>,
    builds: usize,
}

impl PyramidCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level: PyramidLevel) -> Option<&PyramidEntry> {
        self.entries.get(&level)
    }

    /// True if `level` is cached and was built with `contrast`.
    pub fn is_fresh(&self, level: PyramidLevel, contrast: ContrastWindow) -> bool {
        self.entries
            .get(&level)
            .is_some_and(|e| e.is_fresh(contrast))
    }

    /// Cached entry for `level` if it matches the windowed image's contrast,
    /// otherwise resize `windowed` to `target` and store the result.
    pub fn get_or_build(
        &mut self,
        level: PyramidLevel,
        windowed: &WindowedImage,
        target: ResizeTarget,
    ) -> &PyramidEntry {
        if !self.is_fresh(level, windowed.contrast) {
            self.build(level, windowed, target);
        }
        &self.entries[&level]
    }

    /// Unconditionally rebuild `level`.
    pub fn rebuild(
        &mut self,
        level: PyramidLevel,
        windowed: &WindowedImage,
        target: ResizeTarget,
    ) -> &PyramidEntry {
        self.build(level, windowed, target);
        &self.entries[&level]
    }

    /// Rebuild the `Fit` entry at exactly `canvas_height`. The fit level depends
    /// on the canvas as well as the contrast, so it is never reused blindly.
    pub fn insert_fit(&mut self, windowed: &WindowedImage, canvas_height: u32) -> &PyramidEntry {
        let entry = self.rebuild(PyramidLevel::Fit, windowed, ResizeTarget::Height(canvas_height));
        info!(
            level = %PyramidLevel::Fit,
            dims = %entry.dims(),
            window = %entry.contrast,
            "Final pyramid level"
        );
        entry
    }

    /// Bring an existing entry up to the windowed image's contrast, keeping its
    /// dimensions. Returns `None` if `level` was never built.
    pub fn refresh(&mut self, level: PyramidLevel, windowed: &WindowedImage) -> Option<&PyramidEntry> {
        let target = self.entries.get(&level)?.target;
        Some(self.get_or_build(level, windowed, target))
    }

    /// Eagerly build steps `1..=depth`, each `zoom_factor` wider than the last,
    /// starting from `base_width` at level 0. Steps above `max_level` are skipped.
    pub fn precompute(
        &mut self,
        windowed: &WindowedImage,
        base_width: u32,
        depth: u32,
        zoom_factor: f32,
        max_level: i32,
    ) {
        let mut width = base_width as f32;
        for step in 1..=depth as i32 {
            if step > max_level {
                break;
            }
            width *= zoom_factor;
            self.get_or_build(
                PyramidLevel::Step(step),
                windowed,
                ResizeTarget::Width(width.round() as u32),
            );
        }
        debug!(depth, "Pyramid precomputed");
    }

    /// Levels whose entries were built with a window other than `contrast`.
    pub fn stale_levels(&self, contrast: ContrastWindow) -> Vec<PyramidLevel> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.is_fresh(contrast))
            .map(|(level, _)| *level)
            .collect()
    }

    pub fn levels(&self) -> impl Iterator<Item = PyramidLevel> + '_ {
        self.entries.keys().copied()
    }

    /// Number of resizes performed since creation.
    pub fn build_count(&self) -> usize {
        self.builds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn build(&mut self, level: PyramidLevel, windowed: &WindowedImage, target: ResizeTarget) {
        let raster = resize(&windowed.raster, target);
        debug!(
            level = %level,
            dims = %raster.dims(),
            window = %windowed.contrast,
            "New pyramid level"
        );
        self.builds += 1;
        self.entries.insert(
            level,
            PyramidEntry {
                raster,
                contrast: windowed.contrast,
                target,
            },
        );
    }
}
