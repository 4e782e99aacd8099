use std::path::PathBuf;

use mdna_core::io::image_io::load_channel;

use crate::app::ViewerApp;
use crate::messages::AppMessage;

pub fn show(ctx: &egui::Context, app: &mut ViewerApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open Green and Red...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    open_files(app, true);
                }
                if ui.button("Open Single Channel...").clicked() {
                    ui.close();
                    open_files(app, false);
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(app);
                }
                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let enabled = app.session.has_composite();
                let label = if app.session.target().is_composite() {
                    "Split Channels"
                } else {
                    "Combine Channels"
                };
                if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                    ui.close();
                    app.toggle_composite();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.ui_state.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            open_files(app, true);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn pick_tiff(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("TIFF", &["tif", "tiff", "TIF", "TIFF"])
        .pick_file()
}

/// Pick and decode the channel files off the UI thread.
pub fn open_files(app: &mut ViewerApp, with_red: bool) {
    if app.ui_state.loading {
        return;
    }
    app.ui_state.loading = true;
    let msg_tx = app.msg_tx.clone();
    std::thread::spawn(move || {
        let Some(green_path) = pick_tiff("Open green channel") else {
            let _ = msg_tx.send(AppMessage::LoadCancelled);
            return;
        };
        let red_path = if with_red {
            match pick_tiff("Open red channel") {
                Some(path) => Some(path),
                None => {
                    let _ = msg_tx.send(AppMessage::LoadCancelled);
                    return;
                }
            }
        } else {
            None
        };

        let decoded = load_channel(&green_path).and_then(|green| {
            let red = red_path.as_deref().map(load_channel).transpose()?;
            Ok((green, red))
        });
        let msg = match decoded {
            Ok((green, red)) => AppMessage::Decoded {
                green_path,
                red_path,
                green,
                red,
            },
            Err(e) => AppMessage::LoadFailed {
                message: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg);
    });
}

fn import_config(app: &mut ViewerApp) {
    let msg_tx = app.msg_tx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new().add_filter("TOML", &["toml"]).pick_file() else {
            return;
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()));
        let msg = match parsed {
            Ok(config) => AppMessage::ConfigImported { path, config },
            Err(e) => AppMessage::LoadFailed {
                message: format!("Invalid config {}: {e}", path.display()),
            },
        };
        let _ = msg_tx.send(msg);
    });
}

fn export_config(app: &mut ViewerApp) {
    let config = app.session.config().clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("mdna_config.toml")
            .save_file()
        {
            if let Ok(content) = toml::to_string_pretty(&config) {
                let _ = std::fs::write(path, content);
            }
        }
    });
}
