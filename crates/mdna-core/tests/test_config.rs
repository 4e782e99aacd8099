use std::time::Duration;

use mdna_core::config::{ContrastConfig, ViewerConfig, ZoomConfig};
use mdna_core::raster::Dims;

#[test]
fn test_default_config() {
    let config = ViewerConfig::default();
    assert!((config.zoom.factor - 1.15).abs() < 1e-6);
    assert_eq!(config.zoom.max_level, 13);
    assert_eq!(config.zoom.precompute_depth, 0);
    assert_eq!(config.contrast.debounce(), Duration::from_millis(100));
    assert_eq!(config.canvas, Dims::new(1000, 800));
}

#[test]
fn test_config_toml_roundtrip() {
    let config = ViewerConfig {
        zoom: ZoomConfig {
            factor: 1.25,
            max_level: 8,
            precompute_depth: 3,
        },
        contrast: ContrastConfig { debounce_ms: 40 },
        canvas: Dims::new(640, 480),
    };
    let text = toml::to_string(&config).unwrap();
    let parsed: ViewerConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let parsed: ViewerConfig = toml::from_str(
        r#"
        [zoom]
        max_level = 5
        "#,
    )
    .unwrap();
    assert_eq!(parsed.zoom.max_level, 5);
    approx::assert_relative_eq!(parsed.zoom.factor, 1.15);
    assert_eq!(parsed.contrast.debounce_ms, 100);
    assert_eq!(parsed.canvas, Dims::new(1000, 800));
}

#[test]
fn test_empty_toml_is_default() {
    let parsed: ViewerConfig = toml::from_str("").unwrap();
    assert_eq!(parsed, ViewerConfig::default());
}
