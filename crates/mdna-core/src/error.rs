use std::path::PathBuf;

use thiserror::Error;

use crate::session::{ContrastTarget, PaneId};

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Unsupported file format (expected .tif): {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Dimension mismatch: expected {expected_w}x{expected_h}, found {found_w}x{found_h}")]
    DimensionMismatch {
        expected_w: usize,
        expected_h: usize,
        found_w: usize,
        found_h: usize,
    },

    #[error("Invalid contrast window: {0}")]
    InvalidContrastWindow(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Pane {0} is not displayed")]
    NoSuchPane(PaneId),

    #[error("{0} does not select split-view panes")]
    NotSplitTarget(ContrastTarget),

    #[error("Composite view needs both a green and a red image")]
    CompositeUnavailable,

    #[error("Contrast worker is not running")]
    WorkerGone,
}

impl ViewerError {
    /// True for failures caused by the source file rather than by the caller.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Decode { .. } | Self::UnsupportedFormat(_) | Self::ImageError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
