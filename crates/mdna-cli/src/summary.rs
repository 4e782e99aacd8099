use std::path::Path;

use console::Style;
use mdna_core::contrast::ContrastWindow;
use mdna_core::raster::Raster16;
use mdna_core::session::{PaneId, PixelReadout, ViewerSession};
use mdna_core::viewport::ViewFrame;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_raster_info(path: &Path, raster: &Raster16, window: ContrastWindow) {
    let s = Styles::new();

    println!();
    println!("  {}", s.path.apply_to(path.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(raster.dims())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Channels"),
        s.value.apply_to(raster.channels())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Bit depth"),
        s.value.apply_to(raster.bit_depth())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Sample range"),
        s.value.apply_to(window)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Center/width"),
        s.value
            .apply_to(format!("{} / {}", window.center(), window.width()))
    );
}

pub fn print_render_summary(
    session: &ViewerSession,
    pane: PaneId,
    frame: &ViewFrame,
    output: &Path,
    readout: Option<&PixelReadout>,
) {
    let s = Styles::new();
    let viewport = session.pane(pane).ok().map(|p| p.viewport());

    println!();
    println!("  {}", s.title.apply_to(format!("{pane} view")));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Level"),
        s.value.apply_to(frame.level)
    );
    if let Some(viewport) = viewport {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Level size"),
            s.value.apply_to(viewport.level_dims())
        );
        let offset = viewport.offset();
        println!(
            "  {:<14}{}",
            s.label.apply_to("Offset"),
            s.value.apply_to(format!("{}, {}", offset.x, offset.y))
        );
    }
    if let Some(window) = session.contrast_for(pane) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Window"),
            s.value.apply_to(window)
        );
    }
    let p = frame.placement;
    println!(
        "  {:<14}{}",
        s.label.apply_to("Placement"),
        s.value
            .apply_to(format!("{}x{} at {}, {}", p.width, p.height, p.x, p.y))
    );
    if let Some(readout) = readout {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Probe"),
            s.value.apply_to(readout)
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Saved"),
        s.path.apply_to(output.display())
    );
    println!();
}
