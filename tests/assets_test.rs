//! Asset extraction and external config overrides.

use hexmosaic::assets::{AssetCategory, AssetLoader, AssetSource};
use hexmosaic::models::AppConfig;
use pretty_assertions::assert_eq;

#[test]
fn test_init_writes_then_skips_then_forces() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("mosaic/model.svg");
    let config = dir.path().join("config.yaml");
    let loader = AssetLoader::new(Some(model.clone()), Some(config.clone()));
    let both = [AssetCategory::Model, AssetCategory::Config];

    let report = loader.init(&both, false).unwrap();
    assert_eq!(report.written.len(), 2);
    assert!(model.exists() && config.exists());
    assert_eq!(loader.model_source(), AssetSource::File(model.clone()));

    let report = loader.init(&both, false).unwrap();
    assert_eq!((report.written.len(), report.skipped.len()), (0, 2));

    let report = loader.init(&[AssetCategory::Config], true).unwrap();
    assert_eq!(report.written.len(), 1);
}

#[test]
fn test_external_config_adds_palette() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        r##"
default_palette: mono
dither: floyd-steinberg
palettes:
  mono:
    - { name: "ink", hex: "#111111" }
    - { name: "paper", hex: "#fafafa" }
"##,
    )
    .unwrap();

    let config = AppConfig::load_from_assets(&AssetLoader::new(None, Some(path)));
    assert_eq!(config.default_palette, "mono");
    assert!(config.palette_names().contains(&"mono".to_string()));
    assert_eq!(config.palette("mono").unwrap().len(), 2);
    assert_eq!(config.dither_mode(), mosaic_dither::DitherMode::FloydSteinberg);
    assert_eq!(config.debounce_ms, 150);
}

#[test]
fn test_missing_override_falls_back_to_embedded() {
    let loader = AssetLoader::new(Some("/nonexistent/model.svg".into()), None);
    assert_eq!(loader.model_source(), AssetSource::Embedded);
    assert!(loader.read_model_string().unwrap().contains("<svg"));
}
