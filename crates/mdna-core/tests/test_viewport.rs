mod common;

use mdna_core::config::ZoomConfig;
use mdna_core::contrast::ContrastWindow;
use mdna_core::pyramid::{PyramidLevel, WindowedImage};
use mdna_core::raster::Dims;
use mdna_core::resize::ResizeTarget;
use mdna_core::viewport::{CanvasPos, Offset, Viewport, ZoomDirection};

use common::windowed_rgb;

const SOURCE: Dims = Dims {
    width: 400,
    height: 300,
};

/// 400x300 image on a 100x50 canvas: level 0 is 100x75.
fn setup() -> (Viewport, WindowedImage) {
    setup_with(Dims::new(100, 50), ZoomConfig::default())
}

fn setup_with(canvas: Dims, zoom: ZoomConfig) -> (Viewport, WindowedImage) {
    let windowed = windowed_rgb(SOURCE.width as usize, SOURCE.height as usize);
    let mut viewport = Viewport::new(canvas, zoom);
    viewport.reset(&windowed, canvas.width);
    (viewport, windowed)
}

fn origin() -> CanvasPos {
    CanvasPos::new(0, 0)
}

// ---------------------------------------------------------------------------
// Zoom steps
// ---------------------------------------------------------------------------

#[test]
fn test_reset_builds_level_zero_at_canvas_width() {
    let (viewport, _) = setup();
    assert_eq!(viewport.level(), PyramidLevel::Step(0));
    assert_eq!(viewport.level_dims(), Dims::new(100, 75));
    assert_eq!(viewport.cache().build_count(), 1);
}

#[test]
fn test_reset_precomputes_when_configured() {
    let zoom = ZoomConfig {
        precompute_depth: 2,
        ..ZoomConfig::default()
    };
    let (viewport, _) = setup_with(Dims::new(100, 50), zoom);
    assert_eq!(viewport.cache().len(), 3);
    assert_eq!(
        viewport.cache().get(PyramidLevel::Step(1)).unwrap().dims().width,
        115
    );
}

#[test]
fn test_zoom_in_grows_by_factor() {
    let (mut viewport, windowed) = setup();
    assert!(viewport.zoom(&windowed, ZoomDirection::In, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(1));
    assert_eq!(viewport.level_dims(), Dims::new(115, 86));
    assert_eq!(viewport.state().previous, 0);
}

#[test]
fn test_zoom_in_then_out_restores_dims() {
    let (mut viewport, windowed) = setup();
    let before = viewport.level_dims();
    viewport.zoom(&windowed, ZoomDirection::In, origin());
    viewport.zoom(&windowed, ZoomDirection::Out, origin());

    assert_eq!(viewport.level(), PyramidLevel::Step(0));
    assert_eq!(viewport.level_dims(), before);
    // Level 0 came from the cache.
    assert_eq!(viewport.cache().build_count(), 2);
}

#[test]
fn test_zoom_in_stops_at_max_level() {
    let zoom = ZoomConfig {
        max_level: 2,
        ..ZoomConfig::default()
    };
    let (mut viewport, windowed) = setup_with(Dims::new(100, 50), zoom);
    assert!(viewport.zoom(&windowed, ZoomDirection::In, origin()));
    assert!(viewport.zoom(&windowed, ZoomDirection::In, origin()));
    let dims = viewport.level_dims();
    let builds = viewport.cache().build_count();

    assert!(!viewport.zoom(&windowed, ZoomDirection::In, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(2));
    assert_eq!(viewport.level_dims(), dims);
    assert_eq!(viewport.cache().build_count(), builds);
}

#[test]
fn test_zero_scroll_is_ignored() {
    let (mut viewport, windowed) = setup();
    let state = viewport.state().clone();
    assert!(!viewport.scroll(&windowed, 0.0, CanvasPos::new(30, 30)));
    assert_eq!(viewport.state(), &state);
    assert_eq!(ZoomDirection::from_scroll_delta(0.0), None);
    assert_eq!(ZoomDirection::from_scroll_delta(2.0), Some(ZoomDirection::In));
    assert_eq!(ZoomDirection::from_scroll_delta(-0.5), Some(ZoomDirection::Out));
}

#[test]
fn test_zoom_out_reaches_fit() {
    let (mut viewport, windowed) = setup();

    assert!(viewport.zoom(&windowed, ZoomDirection::Out, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(-1));
    assert_eq!(viewport.level_dims(), Dims::new(86, 65));

    assert!(viewport.zoom(&windowed, ZoomDirection::Out, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(-2));
    assert_eq!(viewport.level_dims(), Dims::new(74, 56));

    assert!(viewport.zoom(&windowed, ZoomDirection::Out, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Fit);
    assert_eq!(viewport.level_dims(), Dims::new(67, 50));
    assert_eq!(viewport.state().previous, -2);
}

#[test]
fn test_zoom_out_at_fit_is_noop() {
    let (mut viewport, windowed) = setup();
    assert!(viewport.zoom_to(&windowed, PyramidLevel::Fit, origin()));
    let builds = viewport.cache().build_count();

    assert!(!viewport.zoom(&windowed, ZoomDirection::Out, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Fit);
    assert_eq!(viewport.cache().build_count(), builds);
}

#[test]
fn test_zoom_in_from_fit_resumes_previous_step() {
    let (mut viewport, windowed) = setup();
    viewport.zoom_to(&windowed, PyramidLevel::Fit, origin());
    let builds = viewport.cache().build_count();

    assert!(viewport.zoom(&windowed, ZoomDirection::In, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(-2));
    assert_eq!(viewport.level_dims(), Dims::new(74, 56));
    assert_eq!(viewport.cache().build_count(), builds);
}

#[test]
fn test_zoom_in_from_fit_skips_steps_shorter_than_fit() {
    // Level 0 (100x75) is shorter than the 80 px canvas.
    let (mut viewport, windowed) = setup_with(Dims::new(100, 80), ZoomConfig::default());
    assert!(viewport.zoom(&windowed, ZoomDirection::Out, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Fit);
    assert_eq!(viewport.level_dims().height, 80);
    assert_eq!(viewport.state().previous, 0);

    assert!(viewport.zoom(&windowed, ZoomDirection::In, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(1));
    assert!(viewport.level_dims().height > 80);
}

#[test]
fn test_zoom_out_from_fit_after_canvas_shrink_keeps_shrinking() {
    let (mut viewport, windowed) = setup_with(Dims::new(100, 80), ZoomConfig::default());
    assert!(viewport.zoom(&windowed, ZoomDirection::Out, origin()));
    assert_eq!(viewport.level_dims(), Dims::new(107, 80));

    assert!(!viewport.resize_canvas(&windowed, Dims::new(100, 50)));
    assert_eq!(viewport.level(), PyramidLevel::Fit);

    // The stale fit raster is taller than the canvas, so zooming out walks the
    // cached steps down again instead of building a new one.
    assert!(viewport.zoom(&windowed, ZoomDirection::Out, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(0));
    assert_eq!(viewport.level_dims(), Dims::new(100, 75));

    let mut last = viewport.level_dims();
    while viewport.zoom(&windowed, ZoomDirection::Out, origin()) {
        let dims = viewport.level_dims();
        assert!(
            dims.height < last.height,
            "zoom out grew the image: {last} -> {dims}"
        );
        last = dims;
    }
    assert_eq!(viewport.level(), PyramidLevel::Fit);
    assert_eq!(viewport.level_dims().height, 50);
}

#[test]
fn test_zoom_to_walks_levels() {
    let (mut viewport, windowed) = setup();
    assert!(viewport.zoom_to(&windowed, PyramidLevel::Step(3), origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(3));
    assert!(viewport.zoom_to(&windowed, PyramidLevel::Step(1), origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(1));
    assert!(viewport.zoom_to(&windowed, PyramidLevel::Fit, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Fit);
}

#[test]
fn test_zoom_to_unreachable_level_fails() {
    let (mut viewport, windowed) = setup();
    assert!(!viewport.zoom_to(&windowed, PyramidLevel::Step(-10), origin()));
    assert_eq!(viewport.level(), PyramidLevel::Fit);
    assert!(!viewport.zoom_to(&windowed, PyramidLevel::Step(99), origin()));
}

// ---------------------------------------------------------------------------
// Offsets
// ---------------------------------------------------------------------------

#[test]
fn test_zoom_keeps_point_under_cursor() {
    let (mut viewport, windowed) = setup();
    viewport.zoom(&windowed, ZoomDirection::In, CanvasPos::new(50, 25));
    assert_eq!(viewport.offset(), Offset { x: 7, y: 3 });
}

#[test]
fn test_pan_is_clamped() {
    let (mut viewport, windowed) = setup();
    viewport.zoom(&windowed, ZoomDirection::In, origin());

    viewport.pan(-1000, -1000);
    assert_eq!(viewport.offset(), Offset { x: 15, y: 36 });

    viewport.pan(1000, 1000);
    assert_eq!(viewport.offset(), Offset { x: 0, y: 0 });

    for (dx, dy) in [(-3, 4), (7, -20), (-50, -50), (2, 100)] {
        viewport.pan(dx, dy);
        let Offset { x, y } = viewport.offset();
        assert!(x <= 15 && y <= 36);
    }
}

#[test]
fn test_drag_pans_by_movement() {
    let (mut viewport, windowed) = setup();
    viewport.zoom(&windowed, ZoomDirection::In, origin());

    viewport.begin_drag(CanvasPos::new(50, 25));
    viewport.drag_to(CanvasPos::new(40, 20));
    assert_eq!(viewport.offset(), Offset { x: 10, y: 5 });
    viewport.drag_to(CanvasPos::new(38, 20));
    assert_eq!(viewport.offset(), Offset { x: 12, y: 5 });
    viewport.end_drag();

    // First move after end only records the position.
    viewport.drag_to(CanvasPos::new(0, 0));
    assert_eq!(viewport.offset(), Offset { x: 12, y: 5 });
}

#[test]
fn test_visible_crop_intersects_level() {
    let (mut viewport, windowed) = setup();
    viewport.zoom(&windowed, ZoomDirection::In, origin());
    viewport.pan(-1000, -1000);

    let crop = viewport.visible_crop();
    assert_eq!((crop.x, crop.y, crop.width, crop.height), (15, 36, 100, 50));

    let frame = viewport.view().unwrap();
    assert_eq!(frame.raster.dims(), Dims::new(100, 50));
    assert_eq!(frame.level, PyramidLevel::Step(1));
}

// ---------------------------------------------------------------------------
// Canvas resize
// ---------------------------------------------------------------------------

#[test]
fn test_canvas_growth_switches_to_fit() {
    let (mut viewport, windowed) = setup();
    assert!(viewport.resize_canvas(&windowed, Dims::new(100, 90)));
    assert_eq!(viewport.level(), PyramidLevel::Fit);
    assert_eq!(viewport.level_dims(), Dims::new(120, 90));
    assert_eq!(viewport.offset(), Offset::default());
    assert_eq!(viewport.state().previous, 0);

    assert!(viewport.zoom(&windowed, ZoomDirection::In, origin()));
    assert_eq!(viewport.level(), PyramidLevel::Step(1));
    assert!(viewport.level_dims().height > 90);
}

#[test]
fn test_fit_to_canvas_only_when_level_is_short() {
    let (mut viewport, windowed) = setup();
    assert!(!viewport.fit_to_canvas(&windowed));
    assert_eq!(viewport.level(), PyramidLevel::Step(0));

    let (mut viewport, windowed) = setup_with(Dims::new(100, 80), ZoomConfig::default());
    assert!(viewport.fit_to_canvas(&windowed));
    assert_eq!(viewport.level(), PyramidLevel::Fit);
    assert_eq!(viewport.level_dims().height, 80);
}

#[test]
fn test_canvas_shrink_keeps_level() {
    let (mut viewport, windowed) = setup();
    viewport.zoom(&windowed, ZoomDirection::In, origin());
    viewport.pan(-1000, -1000);

    assert!(!viewport.resize_canvas(&windowed, Dims::new(110, 80)));
    assert_eq!(viewport.level(), PyramidLevel::Step(1));
    assert_eq!(viewport.offset(), Offset { x: 5, y: 6 });
}

// ---------------------------------------------------------------------------
// Contrast refresh
// ---------------------------------------------------------------------------

#[test]
fn test_refresh_contrast_rebuilds_current_level_only() {
    let (mut viewport, windowed) = setup();
    viewport.zoom(&windowed, ZoomDirection::In, origin());
    let builds = viewport.cache().build_count();

    let other = WindowedImage::new((*windowed.raster).clone(), ContrastWindow::from_bounds(1, 2));
    assert!(viewport.refresh_contrast(&other));
    assert_eq!(viewport.cache().build_count(), builds + 1);
    assert_eq!(
        viewport.cache().stale_levels(other.contrast),
        vec![PyramidLevel::Step(0)]
    );
    assert!(!viewport.refresh_contrast(&other));

    // The stale level is rebuilt when visited again.
    viewport.zoom(&other, ZoomDirection::Out, origin());
    assert!(viewport.cache().stale_levels(other.contrast).is_empty());
}

#[test]
fn test_stale_level_keeps_its_resize_target() {
    let (mut viewport, windowed) = setup_with(Dims::new(1001, 50), ZoomConfig::default());
    assert!(viewport.zoom(&windowed, ZoomDirection::In, origin()));

    let other = WindowedImage::new((*windowed.raster).clone(), ContrastWindow::from_bounds(1, 2));
    assert!(viewport.refresh_contrast(&other));
    assert!(viewport.zoom(&other, ZoomDirection::Out, origin()));

    let entry = viewport.current_entry().unwrap();
    assert_eq!(entry.target(), ResizeTarget::Width(1001));
    assert_eq!(entry.dims().width, 1001);
    assert_eq!(entry.contrast(), other.contrast);
}

// ---------------------------------------------------------------------------
// Pixel probe
// ---------------------------------------------------------------------------

#[test]
fn test_probe_scales_to_source() {
    let (viewport, _) = setup();
    assert_eq!(viewport.probe(CanvasPos::new(10, 20), SOURCE), Some((40, 80)));
}

#[test]
fn test_probe_clamps_to_source_bounds() {
    let (viewport, _) = setup();
    assert_eq!(viewport.probe(CanvasPos::new(500, 500), SOURCE), Some((399, 299)));
    assert_eq!(viewport.probe(CanvasPos::new(-5, -5), SOURCE), Some((0, 0)));
}

#[test]
fn test_probe_accounts_for_offset() {
    let (mut viewport, windowed) = setup();
    viewport.zoom(&windowed, ZoomDirection::In, origin());
    viewport.pan(-1000, -1000);
    // (15 + 0) * 400 / 115 = 52.17, (36 + 0) * 300 / 86 = 125.58
    assert_eq!(viewport.probe(origin(), SOURCE), Some((52, 125)));
}

#[test]
fn test_probe_at_fit_removes_centring_pad() {
    let (mut viewport, windowed) = setup();
    viewport.zoom_to(&windowed, PyramidLevel::Fit, origin());
    // 67 px wide level on a 100 px canvas: 16 px pad.
    assert_eq!(viewport.probe(CanvasPos::new(16, 0), SOURCE), Some((0, 0)));
    assert_eq!(viewport.probe(CanvasPos::new(49, 25), SOURCE), Some((197, 150)));

    let frame = viewport.view().unwrap();
    assert_eq!(frame.placement.x, 16);
    assert_eq!(frame.placement.y, 0);
    assert_eq!((frame.placement.width, frame.placement.height), (67, 50));
}

#[test]
fn test_probe_without_level_is_none() {
    let viewport = Viewport::new(Dims::new(10, 10), ZoomConfig::default());
    assert_eq!(viewport.probe(origin(), SOURCE), None);
    assert!(viewport.view().is_none());
}
