use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use mdna_core::contrast::ContrastWindow;
use mdna_core::pyramid::PyramidLevel;
use mdna_core::session::PaneId;
use mdna_core::viewport::PlacementRect;

/// Uploaded view of one pane.
pub struct PaneTexture {
    pub texture: egui::TextureHandle,
    pub placement: PlacementRect,
    pub level: PyramidLevel,
}

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    pub green_path: Option<PathBuf>,
    pub red_path: Option<PathBuf>,
    pub loading: bool,

    /// Slider values; pushed to the session when they change.
    pub center: u16,
    pub width: u16,

    /// Status-line readout of the pixel under the cursor.
    pub readout: Option<String>,

    pub log_messages: Vec<String>,
    pub error: Option<String>,
    pub show_about: bool,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn sync_sliders(&mut self, window: Option<ContrastWindow>) {
        let window = window.unwrap_or_default();
        self.center = window.center();
        self.width = window.width();
    }
}

/// Textures of the displayed panes and which of them need a re-upload.
#[derive(Default)]
pub struct ViewState {
    pub textures: BTreeMap<PaneId, PaneTexture>,
    pub dirty: BTreeSet<PaneId>,
}

impl ViewState {
    pub fn mark_all(&mut self, panes: impl IntoIterator<Item = PaneId>) {
        self.textures.clear();
        self.dirty.extend(panes);
    }
}
