//! Zoom/pan state machine over a pyramid of display rasters.
//!
//! The current level is either an integer step or `Fit`. Zooming in walks up
//! the steps to the configured maximum; zooming out walks down until the next
//! step would be shorter than the canvas, at which point the image is resized
//! to exactly the canvas height (`Fit`). The step that was left when entering
//! `Fit` is remembered; zooming in again resumes at the first step taller than
//! the fit raster. A zoom never moves the image size against its direction.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::ZoomConfig;
use crate::pyramid::{PyramidCache, PyramidEntry, PyramidLevel, WindowedImage};
use crate::raster::{Dims, Raster8};
use crate::resize::ResizeTarget;

/// Cursor position relative to the canvas origin. May lie outside the canvas while dragging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CanvasPos {
    pub x: i32,
    pub y: i32,
}

impl CanvasPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Top-left corner of the visible region, in pixels of the current level's raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
}

/// Rectangle in pixels of the current level's raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where a cropped view lands on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Visible part of the current level, ready for presentation.
#[derive(Clone, Debug)]
pub struct ViewFrame {
    pub raster: Raster8,
    pub placement: PlacementRect,
    pub level: PyramidLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// True if going from `old` to `new` dimensions matches this direction.
    fn follows(self, old: Dims, new: Dims) -> bool {
        match self {
            Self::In => new.height > old.height,
            Self::Out => new.height < old.height,
        }
    }

    /// Positive scroll zooms in, negative zooms out; zero is ignored.
    pub fn from_scroll_delta(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::In)
        } else if delta < 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewportState {
    pub level: PyramidLevel,
    /// Last integer step left, the starting point when zooming in from `Fit`.
    pub previous: i32,
    pub offset: Offset,
    pub canvas: Dims,
}

/// Viewport controller owning the pyramid of one displayed image.
#[derive(Debug)]
pub struct Viewport {
    state: ViewportState,
    cache: PyramidCache,
    zoom: ZoomConfig,
    drag_anchor: Option<CanvasPos>,
}

impl Viewport {
    pub fn new(canvas: Dims, zoom: ZoomConfig) -> Self {
        Self {
            state: ViewportState {
                level: PyramidLevel::Step(0),
                previous: 0,
                offset: Offset::default(),
                canvas,
            },
            cache: PyramidCache::new(),
            zoom,
            drag_anchor: None,
        }
    }

    /// Discard the pyramid and build level 0 at `base_width`.
    pub fn reset(&mut self, windowed: &WindowedImage, base_width: u32) {
        self.cache.clear();
        self.state.level = PyramidLevel::Step(0);
        self.state.previous = 0;
        self.state.offset = Offset::default();
        self.drag_anchor = None;

        let dims = self
            .cache
            .get_or_build(PyramidLevel::Step(0), windowed, ResizeTarget::Width(base_width))
            .dims();
        info!(dims = %dims, window = %windowed.contrast, "Pyramid initialized");

        if self.zoom.precompute_depth > 0 {
            self.cache.precompute(
                windowed,
                dims.width,
                self.zoom.precompute_depth,
                self.zoom.factor,
                self.zoom.max_level,
            );
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn cache(&self) -> &PyramidCache {
        &self.cache
    }

    pub fn level(&self) -> PyramidLevel {
        self.state.level
    }

    pub fn offset(&self) -> Offset {
        self.state.offset
    }

    pub fn canvas(&self) -> Dims {
        self.state.canvas
    }

    pub fn current_entry(&self) -> Option<&PyramidEntry> {
        self.cache.get(self.state.level)
    }

    /// Dimensions of the current level's raster (0x0 before the first reset).
    pub fn level_dims(&self) -> Dims {
        self.current_entry().map(|e| e.dims()).unwrap_or_default()
    }

    /// Handle a scroll event. Returns `true` if the level changed.
    pub fn scroll(&mut self, windowed: &WindowedImage, delta: f32, cursor: CanvasPos) -> bool {
        match ZoomDirection::from_scroll_delta(delta) {
            Some(direction) => self.zoom(windowed, direction, cursor),
            None => false,
        }
    }

    /// One zoom step anchored at `cursor`. Returns `true` if the level changed.
    pub fn zoom(&mut self, windowed: &WindowedImage, direction: ZoomDirection, cursor: CanvasPos) -> bool {
        let old = self.level_dims();
        let changed = match direction {
            ZoomDirection::In => self.step_in(windowed, old),
            ZoomDirection::Out => self.step_out(windowed, old),
        };
        if !changed {
            return false;
        }

        self.anchor_zoom(old, cursor);
        info!(
            level = %self.state.level,
            dims = %self.level_dims(),
            offset_x = self.state.offset.x,
            offset_y = self.state.offset.y,
            "Zoomed"
        );
        true
    }

    /// Zoom step by step until `target` is reached. Returns `false` if it is unreachable.
    pub fn zoom_to(&mut self, windowed: &WindowedImage, target: PyramidLevel, cursor: CanvasPos) -> bool {
        let mut seen = HashSet::new();
        while self.state.level != target {
            if !seen.insert((self.state.level, self.state.previous)) {
                return false;
            }
            let direction = match (self.state.level, target) {
                (_, PyramidLevel::Fit) => ZoomDirection::Out,
                (PyramidLevel::Fit, _) => ZoomDirection::In,
                (PyramidLevel::Step(c), PyramidLevel::Step(t)) if t < c => ZoomDirection::Out,
                _ => ZoomDirection::In,
            };
            if !self.zoom(windowed, direction, cursor) {
                return false;
            }
        }
        true
    }

    fn step_in(&mut self, windowed: &WindowedImage, old: Dims) -> bool {
        let next = match self.state.level {
            PyramidLevel::Fit => match self.resume_level(old) {
                Some(level) => level,
                None => return false,
            },
            PyramidLevel::Step(c) if c < self.zoom.max_level => {
                self.state.previous = c;
                c + 1
            }
            PyramidLevel::Step(_) => return false,
        };

        let width = (old.width as f32 * self.zoom.factor).round() as u32;
        self.enter_step(next, windowed, ZoomDirection::In, old, width);
        true
    }

    fn step_out(&mut self, windowed: &WindowedImage, old: Dims) -> bool {
        let canvas_h = self.state.canvas.height;
        let candidate_w = (old.width as f32 / self.zoom.factor) as u32;
        let candidate_h = (old.height as f32 / self.zoom.factor) as u32;

        if candidate_h <= canvas_h {
            if self.state.level == PyramidLevel::Fit && old.height == canvas_h.max(1) {
                return false;
            }
            if let PyramidLevel::Step(c) = self.state.level {
                self.state.previous = c;
            }
            self.cache.insert_fit(windowed, canvas_h);
            self.state.level = PyramidLevel::Fit;
            return true;
        }

        let next = match self.state.level {
            PyramidLevel::Step(c) => {
                self.state.previous = c;
                c - 1
            }
            // The canvas shrank since Fit was built: descend to the first step
            // that is not cached or is shorter than the stale fit raster.
            PyramidLevel::Fit => {
                let mut level = self.state.previous;
                while self
                    .cache
                    .get(PyramidLevel::Step(level))
                    .is_some_and(|e| e.dims().height >= old.height)
                {
                    level -= 1;
                }
                level
            }
        };
        self.enter_step(next, windowed, ZoomDirection::Out, old, candidate_w);
        true
    }

    /// First step at or above the remembered one that is taller than the fit
    /// raster `fit`. `None` if no such step is within the zoom range.
    fn resume_level(&self, fit: Dims) -> Option<i32> {
        let mut level = self.state.previous;
        loop {
            match self.cache.get(PyramidLevel::Step(level)) {
                Some(e) if e.dims().height <= fit.height => {}
                _ => return Some(level),
            }
            if level >= self.zoom.max_level {
                return None;
            }
            level += 1;
        }
    }

    /// Make `step` the current level. A cached entry is reused with its own
    /// resize target; one that would move the size against `direction` is
    /// rebuilt at `width`.
    fn enter_step(
        &mut self,
        step: i32,
        windowed: &WindowedImage,
        direction: ZoomDirection,
        old: Dims,
        width: u32,
    ) {
        let level = PyramidLevel::Step(step);
        let cached = self
            .cache
            .get(level)
            .map(|e| (e.target(), direction.follows(old, e.dims())));
        match cached {
            Some((target, true)) => {
                self.cache.get_or_build(level, windowed, target);
            }
            Some((_, false)) => {
                debug!(level = %level, "Cached level out of order, rebuilding");
                self.cache.rebuild(level, windowed, ResizeTarget::Width(width));
            }
            None => {
                self.cache.get_or_build(level, windowed, ResizeTarget::Width(width));
            }
        }
        self.state.level = level;
    }

    /// Keep the image point under `cursor` in place across a zoom step.
    ///
    /// The point is scaled by the constant zoom factor rather than the exact
    /// dimension ratio of the two levels.
    fn anchor_zoom(&mut self, old: Dims, cursor: CanvasPos) {
        let new = self.level_dims();
        let factor = self.zoom.factor;
        let scale_x = if new.width > old.width { factor } else { 1.0 / factor };
        let scale_y = if new.height > old.height { factor } else { 1.0 / factor };

        let mouse_x = self.state.offset.x as i64 + cursor.x as i64;
        let mouse_y = self.state.offset.y as i64 + cursor.y as i64;
        let new_x = (mouse_x as f32 * scale_x) as i64 - cursor.x as i64;
        let new_y = (mouse_y as f32 * scale_y) as i64 - cursor.y as i64;
        self.set_offset_clamped(new_x, new_y);
    }

    /// React to a new canvas size. Switches to `Fit` when the current level no
    /// longer fills the canvas height. Returns `true` if it did.
    pub fn resize_canvas(&mut self, windowed: &WindowedImage, canvas: Dims) -> bool {
        self.state.canvas = canvas;
        self.clamp_offset();
        self.fit_to_canvas(windowed)
    }

    /// Switch to `Fit` if the current level is shorter than the canvas.
    /// Returns `true` if it did.
    pub fn fit_to_canvas(&mut self, windowed: &WindowedImage) -> bool {
        let canvas_h = self.state.canvas.height;
        if self.current_entry().is_none() || self.level_dims().height >= canvas_h {
            return false;
        }

        if let PyramidLevel::Step(c) = self.state.level {
            self.state.previous = c;
        }
        self.cache.insert_fit(windowed, canvas_h);
        self.state.level = PyramidLevel::Fit;
        self.state.offset = Offset::default();
        true
    }

    /// Bring the current level up to the windowed image's contrast without
    /// touching other levels. Returns `true` if the level was rebuilt.
    pub fn refresh_contrast(&mut self, windowed: &WindowedImage) -> bool {
        let level = self.state.level;
        if self.cache.is_fresh(level, windowed.contrast) {
            return false;
        }
        if self.cache.refresh(level, windowed).is_none() {
            return false;
        }
        self.clamp_offset();
        true
    }

    /// Move the view by a mouse delta: dragging right reveals content to the left.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let x = self.state.offset.x as i64 - dx as i64;
        let y = self.state.offset.y as i64 - dy as i64;
        self.set_offset_clamped(x, y);
        debug!(offset_x = self.state.offset.x, offset_y = self.state.offset.y, "Panned");
    }

    pub fn begin_drag(&mut self, at: CanvasPos) {
        self.drag_anchor = Some(at);
    }

    /// Pan by the movement since the last drag position. Without a prior
    /// `begin_drag` this only records the position.
    pub fn drag_to(&mut self, at: CanvasPos) {
        if let Some(last) = self.drag_anchor {
            self.pan(at.x - last.x, at.y - last.y);
        }
        self.drag_anchor = Some(at);
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Visible rectangle: `[offset, offset + canvas)` intersected with the level raster.
    pub fn visible_crop(&self) -> CropRect {
        let dims = self.level_dims();
        let Offset { x, y } = self.state.offset;
        let x2 = x.saturating_add(self.state.canvas.width).min(dims.width);
        let y2 = y.saturating_add(self.state.canvas.height).min(dims.height);
        CropRect {
            x,
            y,
            width: x2.saturating_sub(x),
            height: y2.saturating_sub(y),
        }
    }

    /// Crop of the current level plus its canvas placement: horizontally
    /// centred when narrower than the canvas, top-aligned.
    pub fn view(&self) -> Option<ViewFrame> {
        let entry = self.current_entry()?;
        let crop = self.visible_crop();
        let raster = entry.raster().crop(
            crop.x as usize,
            crop.y as usize,
            crop.width as usize,
            crop.height as usize,
        );
        debug!(
            offset_x = crop.x,
            offset_y = crop.y,
            x2 = crop.x + crop.width,
            y2 = crop.y + crop.height,
            "View cropped"
        );
        Some(ViewFrame {
            raster,
            placement: PlacementRect {
                x: self.centring_pad(),
                y: 0,
                width: crop.width,
                height: crop.height,
            },
            level: self.state.level,
        })
    }

    /// Map a canvas position to source pixel coordinates, clamped to the source bounds.
    pub fn probe(&self, cursor: CanvasPos, source: Dims) -> Option<(u32, u32)> {
        let level = self.level_dims();
        if level.width == 0 || level.height == 0 || source.width == 0 || source.height == 0 {
            return None;
        }

        let rel_x = self.state.offset.x as f64 + cursor.x as f64 - self.centring_pad() as f64;
        let rel_y = self.state.offset.y as f64 + cursor.y as f64;
        let scale_x = source.width as f64 / level.width as f64;
        let scale_y = source.height as f64 / level.height as f64;

        let x = (rel_x * scale_x).trunc().clamp(0.0, (source.width - 1) as f64) as u32;
        let y = (rel_y * scale_y).trunc().clamp(0.0, (source.height - 1) as f64) as u32;
        Some((x, y))
    }

    fn centring_pad(&self) -> u32 {
        self.state.canvas.width.saturating_sub(self.level_dims().width) / 2
    }

    fn clamp_offset(&mut self) {
        let Offset { x, y } = self.state.offset;
        self.set_offset_clamped(x as i64, y as i64);
    }

    fn set_offset_clamped(&mut self, x: i64, y: i64) {
        let dims = self.level_dims();
        let max_x = dims.width.saturating_sub(self.state.canvas.width) as i64;
        let max_y = dims.height.saturating_sub(self.state.canvas.height) as i64;
        self.state.offset = Offset {
            x: x.clamp(0, max_x) as u32,
            y: y.clamp(0, max_y) as u32,
        };
    }
}
