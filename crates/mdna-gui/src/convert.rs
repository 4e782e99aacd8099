use mdna_core::raster::Raster8;

/// Convert an 8-bit display raster (1 or 3 channels) to an egui ColorImage.
pub fn raster_to_color_image(raster: &Raster8) -> egui::ColorImage {
    let (w, h) = (raster.width(), raster.height());
    let data = raster.data();
    let mut pixels = Vec::with_capacity(w * h);

    for row in 0..h {
        for col in 0..w {
            let px = if raster.channels() >= 3 {
                egui::Color32::from_rgb(data[[row, col, 0]], data[[row, col, 1]], data[[row, col, 2]])
            } else {
                egui::Color32::from_gray(data[[row, col, 0]])
            };
            pixels.push(px);
        }
    }

    egui::ColorImage {
        size: [w, h],
        pixels,
        source_size: Default::default(),
    }
}
