use std::path::PathBuf;

use mdna_core::config::ViewerConfig;
use mdna_core::raster::Raster16;

/// Results sent from dialog threads back to the UI thread.
pub enum AppMessage {
    Decoded {
        green_path: PathBuf,
        red_path: Option<PathBuf>,
        green: Raster16,
        red: Option<Raster16>,
    },
    LoadCancelled,
    LoadFailed {
        message: String,
    },
    ConfigImported {
        path: PathBuf,
        config: ViewerConfig,
    },
}
