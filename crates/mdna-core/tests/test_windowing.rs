mod common;

use mdna_core::contrast::ContrastWindow;
use mdna_core::error::ViewerError;
use mdna_core::raster::Raster16;
use mdna_core::windowing::{default_window, window, window_auto, WindowLut};

use common::{banded16, flat16, ramp16};

// ---------------------------------------------------------------------------
// Lookup table
// ---------------------------------------------------------------------------

#[test]
fn test_lut_is_monotone() {
    let lut = WindowLut::new(ContrastWindow::from_bounds(1000, 5000));
    let mut last = 0u8;
    for s in 0..=u16::MAX {
        let v = lut.apply(s);
        assert!(v >= last, "output dropped at sample {s}");
        last = v;
    }
}

#[test]
fn test_lut_clips_outside_window() {
    let lut = WindowLut::new(ContrastWindow::from_bounds(1000, 5000));
    assert_eq!(lut.apply(0), 0);
    assert_eq!(lut.apply(1000), 0);
    assert_eq!(lut.apply(5000), 255);
    assert_eq!(lut.apply(u16::MAX), 255);
}

#[test]
fn test_lut_rounds_to_nearest() {
    let lut = WindowLut::new(ContrastWindow::from_bounds(0, 510));
    assert_eq!(lut.apply(1), 1); // 0.5 rounds up
    assert_eq!(lut.apply(255), 128); // 127.5
    assert_eq!(lut.apply(254), 127);
}

#[test]
fn test_degenerate_window_is_all_black() {
    let raster = ramp16(32, 32, 100);
    let out = window(&raster, ContrastWindow::from_bounds(2000, 2000));
    assert!(out.data().iter().all(|&v| v == 0));
}

// ---------------------------------------------------------------------------
// Rasters
// ---------------------------------------------------------------------------

#[test]
fn test_window_preserves_shape() {
    let raster = Raster16::zeros(17, 9, 3);
    let out = window(&raster, ContrastWindow::FULL);
    assert_eq!(out.width(), 17);
    assert_eq!(out.height(), 9);
    assert_eq!(out.channels(), 3);
    assert_eq!(out.bit_depth(), 8);
}

#[test]
fn test_window_monotone_along_ramp() {
    let raster = ramp16(64, 64, 13);
    let out = window(&raster, ContrastWindow::from_bounds(5000, 40000));
    let values: Vec<u8> = out.to_interleaved();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_window_parallel_path_matches_lut() {
    // Above the parallel threshold.
    let raster = ramp16(400, 200, 1);
    let contrast = ContrastWindow::from_bounds(100, 60000);
    let lut = WindowLut::new(contrast);
    let out = window(&raster, contrast);
    for (src, dst) in raster.data().iter().zip(out.data().iter()) {
        assert_eq!(lut.apply(*src), *dst);
    }
}

#[test]
fn test_window_narrow_band_inside_window() {
    let levels = [15000u16, 16000, 17000, 18000];
    let raster = Raster16::from_fn(50, 40, 1, |(y, x, _)| levels[(x + y) % levels.len()]);
    let out = window(&raster, ContrastWindow::from_bounds(10000, 20000));

    let max_out = *out.data().iter().max().unwrap();
    let min_out = *out.data().iter().min().unwrap();
    assert!(max_out > min_out, "window must not collapse the band");

    for (src, dst) in raster.data().iter().zip(out.data().iter()) {
        assert_eq!(*src == 18000, *dst == max_out, "sample {src} -> {dst}");
    }
    assert_eq!(max_out, 204);
    assert_eq!(min_out, 128);
}

// ---------------------------------------------------------------------------
// Default window
// ---------------------------------------------------------------------------

#[test]
fn test_default_window_is_min_max() {
    let raster = banded16(30, 30, 1200, 3400);
    let contrast = default_window(&raster);
    assert_eq!(contrast.lower(), 1200);
    assert_eq!(contrast.upper(), 3400);
}

#[test]
fn test_window_auto_spans_full_display_range() {
    let raster = banded16(30, 30, 1200, 3400);
    let (out, contrast) = window_auto(&raster);
    assert_eq!(contrast, ContrastWindow::from_bounds(1200, 3400));
    assert_eq!(*out.data().iter().min().unwrap(), 0);
    assert_eq!(*out.data().iter().max().unwrap(), 255);
}

#[test]
fn test_default_window_flat_image_is_degenerate() {
    let contrast = default_window(&flat16(8, 8, 700));
    assert!(contrast.is_degenerate());
    let out = window(&flat16(8, 8, 700), contrast);
    assert!(out.data().iter().all(|&v| v == 0));
}

// ---------------------------------------------------------------------------
// ContrastWindow
// ---------------------------------------------------------------------------

#[test]
fn test_center_width_truncates() {
    let contrast = ContrastWindow::from_center_width(100, 51);
    assert_eq!(contrast.lower(), 74);
    assert_eq!(contrast.upper(), 125);
}

#[test]
fn test_center_width_clamps_to_sample_range() {
    let contrast = ContrastWindow::from_center_width(60000, 30000);
    assert_eq!(contrast.lower(), 45000);
    assert_eq!(contrast.upper(), u16::MAX);
}

#[test]
fn test_default_contrast_window() {
    let contrast = ContrastWindow::default();
    assert_eq!(contrast.lower(), 0);
    assert_eq!(contrast.upper(), 65534);
}

#[test]
fn test_from_bounds_reorders() {
    let contrast = ContrastWindow::from_bounds(900, 100);
    assert_eq!((contrast.lower(), contrast.upper()), (100, 900));
    assert_eq!(contrast.to_string(), "100-900");
}

#[test]
fn test_parse_bounds_accepts_integers() {
    let contrast = ContrastWindow::parse_bounds(" 10 ", "20000").unwrap();
    assert_eq!((contrast.lower(), contrast.upper()), (10, 20000));
}

#[test]
fn test_parse_bounds_rejects_bad_input() {
    for (lo, hi) in [("abc", "10"), ("10", "70000"), ("-1", "10"), ("500", "100")] {
        let err = ContrastWindow::parse_bounds(lo, hi).unwrap_err();
        assert!(
            matches!(err, ViewerError::InvalidContrastWindow(_)),
            "{lo}/{hi} gave {err}"
        );
    }
}

#[test]
fn test_parse_center_width() {
    let contrast = ContrastWindow::parse_center_width("32767", "65535").unwrap();
    assert_eq!(contrast, ContrastWindow::default());
    assert!(ContrastWindow::parse_center_width("x", "1").is_err());
}
