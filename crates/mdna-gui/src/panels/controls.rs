use mdna_core::session::ContrastTarget;

use crate::app::ViewerApp;

pub fn show(ctx: &egui::Context, app: &mut ViewerApp) {
    egui::SidePanel::left("controls")
        .default_width(240.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            files_section(ui, app);
            ui.separator();
            display_section(ui, app);
            ui.separator();
            contrast_section(ui, app);
        });
}

fn files_section(ui: &mut egui::Ui, app: &mut ViewerApp) {
    super::section_header(ui, "Files", app.ui_state.loading.then_some("loading..."));
    ui.add_space(4.0);

    if ui
        .add_enabled(!app.ui_state.loading, egui::Button::new("Open..."))
        .clicked()
    {
        super::menu_bar::open_files(app, true);
    }

    for (label, path) in [
        ("Green", &app.ui_state.green_path),
        ("Red", &app.ui_state.red_path),
    ] {
        if let Some(name) = path.as_ref().and_then(|p| p.file_name()) {
            ui.small(format!("{label}: {}", name.to_string_lossy()));
        }
    }
}

fn display_section(ui: &mut egui::Ui, app: &mut ViewerApp) {
    super::section_header(ui, "Display", None);
    ui.add_space(4.0);

    let mut combined = app.session.target().is_composite();
    let response = ui.add_enabled(
        app.session.has_composite(),
        egui::Checkbox::new(&mut combined, "Combine channels"),
    );
    if response.changed() {
        app.toggle_composite();
    }

    for pane in app.session.panes() {
        let viewport = pane.viewport();
        ui.small(format!(
            "{}: level {}, {}",
            pane.id(),
            viewport.level(),
            viewport.level_dims()
        ));
    }
}

fn contrast_section(ui: &mut egui::Ui, app: &mut ViewerApp) {
    let status = app.session.is_busy().then_some("updating...");
    super::section_header(ui, "Contrast", status);
    ui.add_space(4.0);

    let split = app.session.target().is_split();
    let has_red = app.session.has_composite();
    ui.add_enabled_ui(split, |ui| {
        ui.horizontal(|ui| {
            let mut target = app.session.target();
            let mut changed = false;
            for &choice in ContrastTarget::SPLIT {
                let enabled = has_red || choice == ContrastTarget::Green;
                ui.add_enabled_ui(enabled, |ui| {
                    changed |= ui
                        .radio_value(&mut target, choice, choice.to_string())
                        .changed();
                });
            }
            if changed {
                if let Err(e) = app.session.select_target(target) {
                    app.ui_state.add_log(format!("ERROR: {e}"));
                }
                app.ui_state.sync_sliders(app.session.requested_contrast());
            }
        });
    });

    let loaded = app.session.is_loaded();
    let mut center = app.ui_state.center;
    let mut width = app.ui_state.width;
    let center_changed = ui
        .add_enabled(
            loaded,
            egui::Slider::new(&mut center, 0..=u16::MAX).text("Center"),
        )
        .changed();
    let width_changed = ui
        .add_enabled(
            loaded,
            egui::Slider::new(&mut width, 0..=u16::MAX).text("Width"),
        )
        .changed();

    if center_changed || width_changed {
        app.ui_state.center = center;
        app.ui_state.width = width;
        if let Err(e) = app.session.set_contrast_center_width(center, width) {
            app.ui_state.add_log(format!("ERROR: {e}"));
        }
        ui.ctx().request_repaint();
    }

    if let Some(window) = app.session.requested_contrast() {
        ui.small(format!("Window: {window}"));
    }
}
