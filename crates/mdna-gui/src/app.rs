use std::sync::{mpsc, Arc};

use anyhow::Result;
use mdna_core::config::ViewerConfig;
use mdna_core::session::{PaneId, ViewerSession};

use crate::convert::raster_to_color_image;
use crate::messages::AppMessage;
use crate::panels;
use crate::state::{PaneTexture, UIState, ViewState};

pub struct ViewerApp {
    pub session: ViewerSession,
    pub msg_tx: mpsc::Sender<AppMessage>,
    pub msg_rx: mpsc::Receiver<AppMessage>,
    pub ui_state: UIState,
    pub view: ViewState,
    ctx: egui::Context,
}

impl ViewerApp {
    pub fn new(ctx: &egui::Context) -> Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let session = new_session(ctx, ViewerConfig::default())?;
        let mut ui_state = UIState::default();
        ui_state.sync_sliders(None);

        Ok(Self {
            session,
            msg_tx,
            msg_rx,
            ui_state,
            view: ViewState::default(),
            ctx: ctx.clone(),
        })
    }

    /// Drain messages from dialog threads.
    fn poll_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::Decoded {
                    green_path,
                    red_path,
                    green,
                    red,
                } => {
                    self.ui_state.loading = false;
                    self.ui_state.add_log(format!(
                        "Opened: {} ({})",
                        green_path.display(),
                        green.dims()
                    ));
                    if let (Some(path), Some(raster)) = (&red_path, &red) {
                        self.ui_state
                            .add_log(format!("Opened: {} ({})", path.display(), raster.dims()));
                    }
                    self.session.load_rasters(green, red);
                    self.ui_state.green_path = Some(green_path);
                    self.ui_state.red_path = red_path;
                    self.on_panes_rebuilt();
                }
                AppMessage::LoadCancelled => self.ui_state.loading = false,
                AppMessage::LoadFailed { message } => {
                    self.ui_state.loading = false;
                    self.ui_state.add_log(format!("ERROR: {message}"));
                    self.ui_state.error = Some(message);
                }
                AppMessage::ConfigImported { path, config } => match new_session(&self.ctx, config) {
                    Ok(session) => {
                        self.session = session;
                        self.ui_state.green_path = None;
                        self.ui_state.red_path = None;
                        self.on_panes_rebuilt();
                        self.ui_state.add_log(format!(
                            "Config imported from {}; reopen images to apply",
                            path.display()
                        ));
                    }
                    Err(e) => self.ui_state.error = Some(e.to_string()),
                },
            }
        }
    }

    fn poll_session(&mut self, ctx: &egui::Context) {
        match self.session.poll() {
            Ok(true) => {
                let ids: Vec<PaneId> = self.session.panes().iter().map(|p| p.id()).collect();
                self.view.dirty.extend(ids);
            }
            Ok(false) => {}
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
        if let Some(wait) = self.session.next_poll_in() {
            ctx.request_repaint_after(wait);
        }
    }

    /// Panes were replaced by a load or a mode toggle.
    pub fn on_panes_rebuilt(&mut self) {
        let ids: Vec<PaneId> = self.session.panes().iter().map(|p| p.id()).collect();
        self.view.mark_all(ids);
        self.ui_state.readout = None;
        self.ui_state.sync_sliders(self.session.requested_contrast());
    }

    pub fn mark_dirty(&mut self, pane: PaneId) {
        self.view.dirty.insert(pane);
    }

    /// Re-upload the views of dirty panes. Returns `true` if anything changed.
    fn upload_textures(&mut self, ctx: &egui::Context) -> bool {
        let dirty = std::mem::take(&mut self.view.dirty);
        let changed = !dirty.is_empty();
        for id in dirty {
            let Ok(Some(frame)) = self.session.view(id) else {
                self.view.textures.remove(&id);
                continue;
            };
            let image = raster_to_color_image(&frame.raster);
            let texture = ctx.load_texture(
                format!("pane-{id}"),
                image,
                egui::TextureOptions::NEAREST,
            );
            self.view.textures.insert(
                id,
                PaneTexture {
                    texture,
                    placement: frame.placement,
                    level: frame.level,
                },
            );
        }
        changed
    }

    pub fn toggle_composite(&mut self) {
        match self.session.toggle_composite_mode() {
            Ok(()) => self.on_panes_rebuilt(),
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {e}"));
                self.ui_state.error = Some(e.to_string());
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();
        self.poll_session(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::viewport::show(ctx, self);
        if self.upload_textures(ctx) {
            ctx.request_repaint();
        }

        if let Some(message) = self.ui_state.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.ui_state.error = None;
                    }
                });
        }

        if self.ui_state.show_about {
            egui::Window::new("About MDNA Viewer")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("MDNA Viewer");
                        ui.label("Dual-channel 16-bit microscopy viewer");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.ui_state.show_about = false;
                        }
                    });
                });
        }
    }
}

fn new_session(ctx: &egui::Context, config: ViewerConfig) -> Result<ViewerSession> {
    let repaint = ctx.clone();
    Ok(ViewerSession::with_waker(
        config,
        Arc::new(move || repaint.request_repaint()),
    )?)
}
