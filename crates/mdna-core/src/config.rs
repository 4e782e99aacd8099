use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_CONTRAST_DEBOUNCE_MS,
    DEFAULT_PRECOMPUTE_DEPTH, MAX_ZOOM_LEVEL, ZOOM_FACTOR,
};
use crate::raster::Dims;

/// Tunables of the viewer engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub contrast: ContrastConfig,
    /// Canvas used when no display surface reports its size (headless rendering).
    #[serde(default = "default_canvas")]
    pub canvas: Dims,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomConfig::default(),
            contrast: ContrastConfig::default(),
            canvas: default_canvas(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Size ratio between consecutive pyramid levels.
    #[serde(default = "default_zoom_factor")]
    pub factor: f32,
    /// Highest zoom-in level.
    #[serde(default = "default_max_level")]
    pub max_level: i32,
    /// Levels built eagerly after load (0 = build on demand only).
    #[serde(default = "default_precompute_depth")]
    pub precompute_depth: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            factor: ZOOM_FACTOR,
            max_level: MAX_ZOOM_LEVEL,
            precompute_depth: DEFAULT_PRECOMPUTE_DEPTH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContrastConfig {
    /// Quiet period after the last contrast request before recomputing, in ms.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl ContrastConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_CONTRAST_DEBOUNCE_MS,
        }
    }
}

fn default_zoom_factor() -> f32 {
    ZOOM_FACTOR
}
fn default_max_level() -> i32 {
    MAX_ZOOM_LEVEL
}
fn default_precompute_depth() -> u32 {
    DEFAULT_PRECOMPUTE_DEPTH
}
fn default_debounce_ms() -> u64 {
    DEFAULT_CONTRAST_DEBOUNCE_MS
}
fn default_canvas() -> Dims {
    Dims::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
}
