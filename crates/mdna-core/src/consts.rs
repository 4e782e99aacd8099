/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Largest 16-bit sample value.
pub const SAMPLE_MAX: u16 = u16::MAX;

/// Largest 8-bit display value.
pub const DISPLAY_MAX: f32 = 255.0;

/// Geometric step between consecutive pyramid levels.
pub const ZOOM_FACTOR: f32 = 1.15;

/// Highest zoom-in level. Zooming in beyond it is a no-op.
pub const MAX_ZOOM_LEVEL: i32 = 13;

/// Number of levels built eagerly after load. 0 disables precompute.
pub const DEFAULT_PRECOMPUTE_DEPTH: u32 = 0;

/// Quiet period after the last contrast request before recomputation starts.
pub const DEFAULT_CONTRAST_DEBOUNCE_MS: u64 = 100;

/// Window center of the neutral contrast window.
pub const DEFAULT_WINDOW_CENTER: u16 = 32_767;

/// Window width of the neutral contrast window.
pub const DEFAULT_WINDOW_WIDTH: u16 = 65_535;

/// Default canvas size for headless rendering.
pub const DEFAULT_CANVAS_WIDTH: u32 = 1000;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 800;

/// Number of channels in a display raster (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// File extensions accepted by the image source, compared case-insensitively.
pub const TIFF_EXTENSIONS: [&str; 2] = ["tif", "tiff"];
