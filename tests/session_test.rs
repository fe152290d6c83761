//! Session behaviour on a manual clock: debouncing, status text and
//! settings handling.

mod common;

use common::{assert_fill, fixtures, FakeLayout};
use hexmosaic::models::{AppConfig, ImageTransform};
use hexmosaic::services::{ManualClock, RecolorTrigger, Session};
use mosaic_dither::DitherMode;
use pretty_assertions::assert_eq;
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Session on the strip fixture, laid out at 10 display pixels per unit.
fn session_with(config: AppConfig) -> (Session<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let mut session = Session::new(config, clock.clone());
    session.load_document(fixtures::STRIP_SVG).unwrap();
    session.set_layout(Box::new(FakeLayout::strip(10.0)));
    (session, clock)
}

fn session() -> (Session<ManualClock>, ManualClock) {
    session_with(AppConfig::default())
}

/// Red, blue, blue columns.
fn striped() -> hexmosaic::rendering::RasterImage {
    fixtures::striped_image(&[
        [250, 0, 0, 255],
        [0, 0, 250, 255],
        [0, 0, 250, 255],
    ])
}

fn red_blue_session() -> (Session<ManualClock>, ManualClock) {
    let mut config = AppConfig::default();
    config.palettes.insert(
        "rb".to_string(),
        vec![
            hexmosaic::models::PaletteColorConfig {
                name: "red".to_string(),
                hex: "#ff0000".to_string(),
            },
            hexmosaic::models::PaletteColorConfig {
                name: "blue".to_string(),
                hex: "#0000ff".to_string(),
            },
        ],
    );
    config.default_palette = "rb".to_string();
    session_with(config)
}

#[test]
fn test_image_load_runs_without_delay() {
    let (mut s, _) = red_blue_session();
    s.install_image(striped());
    assert_eq!(s.status(), "Image loaded. Applying colors...");
    let report = s.poll().expect("due immediately").unwrap();
    assert_eq!(report.updated, 3);
    assert_eq!(s.status(), "Updated 3 filled hexagons (white base applied).");
    assert_fill(s.document().unwrap(), 0, "#ff0000");
    assert_fill(s.document().unwrap(), 1, "#0000ff");
}

#[test]
fn test_rapid_changes_collapse_into_one_pass() {
    let (mut s, clock) = red_blue_session();
    s.install_image(striped());
    s.poll().unwrap().unwrap();

    for (at, tx) in [(0, 3.0), (50, 6.0), (100, 10.0)] {
        clock.set(ms(1000 + at));
        s.set_transform(ImageTransform {
            scale: 1.0,
            translate_x: tx,
            translate_y: 0.0,
        });
    }
    assert!(s.is_pending());
    assert_eq!(s.time_until_due(), Some(ms(150)));

    clock.set(ms(1249));
    assert!(s.poll().is_none());
    clock.set(ms(1250));
    assert!(s.poll().is_some());
    assert!(!s.is_pending());
    assert!(s.poll().is_none());

    // Only the last placement (shifted a full column right) took effect.
    let doc = s.document().unwrap();
    assert_fill(doc, 0, "#ffffff");
    assert_fill(doc, 1, "#ff0000");
    assert_fill(doc, 2, "#0000ff");
}

#[test]
fn test_settings_change_reschedules_pending_pass() {
    let (mut s, clock) = red_blue_session();
    s.install_image(striped());
    s.poll().unwrap().unwrap();

    s.set_dither(DitherMode::Ordered);
    clock.advance(ms(140));
    s.set_palette("blue");
    clock.advance(ms(140));
    assert!(s.poll().is_none());
    clock.advance(ms(10));
    let report = s.poll().unwrap().unwrap();
    assert_eq!(report.palette, "blue");
    assert_eq!(report.mode, "ordered");
}

#[test]
fn test_settings_without_image_only_update_state() {
    let (mut s, _) = session();
    s.set_palette("blue");
    s.set_dither(DitherMode::FloydSteinberg);
    s.zoom(-500.0);
    s.pan(40.0, 0.0);
    assert!(!s.is_pending());
    assert_eq!(s.palette_name(), "blue");
    assert_eq!(s.dither(), DitherMode::FloydSteinberg);
    assert_eq!(s.transform(), ImageTransform::default());
}

#[test]
fn test_drag_converts_display_pixels() {
    let (mut s, _) = session();
    s.install_image(striped());
    // 10 display pixels per unit.
    s.pan(40.0, -20.0);
    let t = s.transform();
    assert!((t.translate_x - 4.0).abs() < 1e-4);
    assert!((t.translate_y + 2.0).abs() < 1e-4);
    // Range is round(30 * 0.35) = 11 by round(10 * 0.35) = 4.
    s.pan(1000.0, -1000.0);
    assert_eq!(s.transform().translate_x, 11.0);
    assert_eq!(s.transform().translate_y, -4.0);
}

#[test]
fn test_wheel_zoom_is_clamped() {
    let (mut s, _) = session();
    s.install_image(striped());
    s.zoom(-100.0);
    assert!((s.transform().scale - 1.1).abs() < 1e-5);
    s.zoom(-100_000.0);
    assert_eq!(s.transform().scale, 5.0);
    s.zoom(100_000.0);
    assert_eq!(s.transform().scale, 0.1);
}

#[test]
fn test_new_image_resets_transform() {
    let (mut s, _) = session();
    s.install_image(striped());
    s.set_transform(ImageTransform {
        scale: 2.0,
        translate_x: 5.0,
        translate_y: 1.0,
    });
    s.install_image(striped());
    assert_eq!(s.transform(), ImageTransform::default());
    assert_eq!(s.time_until_due(), Some(Duration::ZERO));
}

#[test]
fn test_reset_restores_original() {
    let (mut s, _) = red_blue_session();
    s.install_image(striped());
    s.poll().unwrap().unwrap();
    assert_ne!(s.export_svg().unwrap(), fixtures::STRIP_SVG);
    s.reset().unwrap();
    assert_eq!(s.status(), "SVG reset to original colors.");
    assert_eq!(s.export_svg().unwrap(), fixtures::STRIP_SVG);
}

#[test]
fn test_decode_failure_keeps_prior_image() {
    let (mut s, _) = session();
    let png = fixtures::png_bytes(2, 1, &[255, 0, 0, 255, 0, 0, 255, 255]);
    s.load_image_bytes(&png).unwrap();
    assert_eq!(s.image().map(|i| (i.width(), i.height())), Some((2, 1)));

    assert!(s.load_image_bytes(b"\x89PNG broken").is_err());
    assert_eq!(s.status(), "Could not load that image.");
    assert_eq!(s.image().map(|i| (i.width(), i.height())), Some((2, 1)));
}

#[test]
fn test_layout_not_ready_reports_status() {
    let config = AppConfig {
        layout_retry_limit: 3,
        ..AppConfig::default()
    };
    let (mut s, _) = session_with(config);
    s.set_layout(Box::new(FakeLayout::strip(10.0).settle_after(100)));
    s.install_image(striped());
    assert!(s.poll().unwrap().is_err());
    assert_eq!(s.status(), "Preparing layout...");
    assert_eq!(s.export_svg().unwrap(), fixtures::STRIP_SVG);
}

#[test]
fn test_status_before_anything_is_loaded() {
    let mut s = Session::new(AppConfig::default(), ManualClock::new());
    assert!(s.apply_colors().is_err());
    assert_eq!(s.status(), "SVG not loaded yet.");
    assert!(s.reset().is_err());
    assert!(s.export_svg().is_err());
}

#[test]
fn test_explicit_request_is_debounced() {
    let (mut s, clock) = session();
    s.request_recolor(RecolorTrigger::Explicit);
    assert_eq!(s.time_until_due(), Some(ms(150)));
    clock.advance(ms(150));
    // Due, but no image yet.
    assert!(s.poll().unwrap().is_err());
    assert_eq!(s.status(), "Load an image before applying colors.");
}
