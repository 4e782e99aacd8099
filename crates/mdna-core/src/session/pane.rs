use std::fmt;

use crate::config::ZoomConfig;
use crate::pyramid::{PyramidLevel, WindowedImage};
use crate::raster::Dims;
use crate::viewport::{CanvasPos, ViewFrame, Viewport};

use super::target::PaneId;
use super::worker::PaneSource;

/// Source pixel under the cursor, formatted for the status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelReadout {
    pub label: PaneId,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for PixelReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} image: x: {}/{}, y: {}/{}",
            self.label,
            self.x,
            self.width.saturating_sub(1),
            self.y,
            self.height.saturating_sub(1)
        )
    }
}

/// One displayed image with its own viewport and pyramid.
#[derive(Debug)]
pub struct Pane {
    id: PaneId,
    source: PaneSource,
    source_dims: Dims,
    windowed: WindowedImage,
    viewport: Viewport,
}

impl Pane {
    /// Build level 0 of `windowed` at the canvas width, or `Fit` when level 0
    /// does not fill the canvas height.
    pub(crate) fn new(
        id: PaneId,
        source: PaneSource,
        source_dims: Dims,
        windowed: WindowedImage,
        canvas: Dims,
        zoom: ZoomConfig,
    ) -> Self {
        let mut viewport = Viewport::new(canvas, zoom);
        viewport.reset(&windowed, canvas.width.max(1));
        viewport.fit_to_canvas(&windowed);
        Self {
            id,
            source,
            source_dims,
            windowed,
            viewport,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn source(&self) -> &PaneSource {
        &self.source
    }

    pub fn source_dims(&self) -> Dims {
        self.source_dims
    }

    pub fn windowed(&self) -> &WindowedImage {
        &self.windowed
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Swap in a freshly windowed image and rebuild the current level only.
    pub(crate) fn apply_windowed(&mut self, windowed: WindowedImage) -> bool {
        self.windowed = windowed;
        self.viewport.refresh_contrast(&self.windowed)
    }

    pub(crate) fn scroll(&mut self, delta: f32, cursor: CanvasPos) -> bool {
        self.viewport.scroll(&self.windowed, delta, cursor)
    }

    pub(crate) fn zoom_to(&mut self, level: PyramidLevel, cursor: CanvasPos) -> bool {
        self.viewport.zoom_to(&self.windowed, level, cursor)
    }

    pub(crate) fn resize_canvas(&mut self, canvas: Dims) -> bool {
        self.viewport.resize_canvas(&self.windowed, canvas)
    }

    pub(crate) fn begin_drag(&mut self, at: CanvasPos) {
        self.viewport.begin_drag(at);
    }

    pub(crate) fn drag_to(&mut self, at: CanvasPos) {
        self.viewport.drag_to(at);
    }

    pub(crate) fn end_drag(&mut self) {
        self.viewport.end_drag();
    }

    pub fn view(&self) -> Option<ViewFrame> {
        self.viewport.view()
    }

    pub fn probe(&self, cursor: CanvasPos) -> Option<PixelReadout> {
        let (x, y) = self.viewport.probe(cursor, self.source_dims)?;
        Some(PixelReadout {
            label: self.id,
            x,
            y,
            width: self.source_dims.width,
            height: self.source_dims.height,
        })
    }
}
