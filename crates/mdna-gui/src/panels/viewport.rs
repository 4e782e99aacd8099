use mdna_core::raster::Dims;
use mdna_core::session::PaneId;
use mdna_core::viewport::CanvasPos;

use crate::app::ViewerApp;

const PANE_GAP: f32 = 4.0;

pub fn show(ctx: &egui::Context, app: &mut ViewerApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        let ids: Vec<PaneId> = app.session.panes().iter().map(|p| p.id()).collect();
        if ids.is_empty() {
            show_placeholder(ui);
            return;
        }

        let n = ids.len() as f32;
        let pane_width = (rect.width() - PANE_GAP * (n - 1.0)) / n;
        for (i, id) in ids.into_iter().enumerate() {
            let min = rect.left_top() + egui::vec2(i as f32 * (pane_width + PANE_GAP), 0.0);
            let pane_rect = egui::Rect::from_min_size(min, egui::vec2(pane_width, rect.height()));
            show_pane(ui, app, id, pane_rect);
        }
    });
}

fn show_pane(ui: &mut egui::Ui, app: &mut ViewerApp, id: PaneId, rect: egui::Rect) {
    sync_canvas(app, id, rect);

    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
    handle_zoom(ui, &response, app, id, rect);
    handle_pan(&response, app, id, rect);
    handle_probe(&response, app, id, rect);

    if let Some(pane) = app.view.textures.get(&id) {
        let p = pane.placement;
        let img_rect = egui::Rect::from_min_size(
            rect.left_top() + egui::vec2(p.x as f32, p.y as f32),
            egui::vec2(p.width as f32, p.height as f32),
        );
        ui.painter().with_clip_rect(rect).image(
            pane.texture.id(),
            img_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
        draw_pane_label(ui, rect, &format!("{id} (level {})", pane.level));
    }
}

fn canvas_pos(rect: egui::Rect, pos: egui::Pos2) -> CanvasPos {
    let rel = pos - rect.left_top();
    CanvasPos::new(rel.x.floor() as i32, rel.y.floor() as i32)
}

/// Report the pane's size to the session when the window layout changes.
fn sync_canvas(app: &mut ViewerApp, id: PaneId, rect: egui::Rect) {
    let canvas = Dims::new(rect.width().max(1.0) as u32, rect.height().max(1.0) as u32);
    let current = app.session.pane(id).map(|p| p.viewport().canvas()).ok();
    if current == Some(canvas) {
        return;
    }
    if app.session.resize_canvas(id, canvas).is_ok() {
        app.mark_dirty(id);
    }
}

fn handle_zoom(
    ui: &egui::Ui,
    response: &egui::Response,
    app: &mut ViewerApp,
    id: PaneId,
    rect: egui::Rect,
) {
    let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }
    let Some(mouse_pos) = response.hover_pos() else {
        return;
    };
    if let Ok(true) = app.session.scroll(id, scroll_delta, canvas_pos(rect, mouse_pos)) {
        app.mark_dirty(id);
    }
}

fn handle_pan(response: &egui::Response, app: &mut ViewerApp, id: PaneId, rect: egui::Rect) {
    let Some(pos) = response.interact_pointer_pos() else {
        if response.drag_stopped() {
            let _ = app.session.end_drag(id);
        }
        return;
    };
    let at = canvas_pos(rect, pos);
    if response.drag_started_by(egui::PointerButton::Primary) {
        let _ = app.session.begin_drag(id, at);
    } else if response.dragged_by(egui::PointerButton::Primary)
        && app.session.drag_to(id, at).is_ok()
    {
        app.mark_dirty(id);
    }
    if response.drag_stopped() {
        let _ = app.session.end_drag(id);
    }
}

fn handle_probe(response: &egui::Response, app: &mut ViewerApp, id: PaneId, rect: egui::Rect) {
    let Some(pos) = response.hover_pos() else {
        return;
    };
    if let Ok(Some(readout)) = app.session.probe_pixel(id, canvas_pos(rect, pos)) {
        app.ui_state.readout = Some(readout.to_string());
    }
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn draw_pane_label(ui: &egui::Ui, rect: egui::Rect, label: &str) {
    let label_pos = rect.left_top() + egui::vec2(8.0, 8.0);
    ui.painter().text(
        label_pos,
        egui::Align2::LEFT_TOP,
        label,
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(200),
    );
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open a green and a red TIFF to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
