//! End-to-end recolor of the embedded mosaic with real layout measurement.

mod common;

use common::{assert_png_size, fixtures};
use hexmosaic::assets::AssetLoader;
use hexmosaic::models::{AppConfig, FillState};
use hexmosaic::rendering::UsvgLayout;
use hexmosaic::services::{map_region, LayoutProbe, ManualClock, Session, SvgDocument};
use mosaic_dither::DitherMode;
use pretty_assertions::assert_eq;

fn embedded_model() -> String {
    AssetLoader::new(None, None).read_model_string().unwrap()
}

/// 60x52 image in four vertical bands: red, yellow, sky blue, violet.
fn bands_png() -> Vec<u8> {
    const BANDS: [[u8; 4]; 4] = [
        [225, 20, 10, 255],
        [250, 215, 30, 255],
        [40, 140, 210, 255],
        [105, 60, 160, 255],
    ];
    let (w, h) = (60u32, 52u32);
    let data: Vec<u8> = (0..h)
        .flat_map(|_| (0..w).flat_map(|x| BANDS[(x / 15) as usize]))
        .collect();
    fixtures::png_bytes(w, h, &data)
}

fn session() -> Session<ManualClock> {
    let mut session = Session::new(AppConfig::default(), ManualClock::new());
    session.load_document(&embedded_model()).unwrap();
    session
}

#[test]
fn test_every_cell_of_the_model_is_measured() {
    let doc = SvgDocument::parse(embedded_model()).unwrap();
    let layout = UsvgLayout::measure(&doc, 800.0).unwrap();
    assert_eq!(doc.recolorable().len(), 169);
    for id in doc.recolorable() {
        assert!(layout.region_bounds(id).is_some(), "{id} has no geometry");
    }
}

#[test]
fn test_model_mapping_is_independent_of_display_size() {
    let doc = SvgDocument::parse(embedded_model()).unwrap();
    let vb = doc.view_box();
    let small = UsvgLayout::measure(&doc, 320.0).unwrap();
    let large = UsvgLayout::measure(&doc, 2400.0).unwrap();
    for id in doc.recolorable() {
        let (ax, ay) = map_region(&small, id, &vb).unwrap().unwrap();
        let (bx, by) = map_region(&large, id, &vb).unwrap().unwrap();
        assert!((ax - bx).abs() < 1e-2 && (ay - by).abs() < 1e-2, "{id}");
        assert!((0.0..=vb.width).contains(&ax) && (0.0..=vb.height).contains(&ay));
    }
}

#[test]
fn test_recolor_uses_only_palette_colors() {
    for mode in DitherMode::ALL {
        let mut s = session();
        s.set_dither(mode);
        s.load_image_bytes(&bands_png()).unwrap();
        let report = s.poll().unwrap().unwrap();
        assert_eq!(report.updated, 169, "{mode}");
        assert_eq!(report.skipped, 0);

        let allowed: Vec<String> = s
            .palette()
            .entries()
            .iter()
            .map(|e| e.hex().to_string())
            .collect();
        let doc = s.document().unwrap();
        for region in doc.regions() {
            match region.fill {
                FillState::Paint(hex) => assert!(allowed.contains(&hex), "{mode}: {hex}"),
                FillState::None => {}
                FillState::Unset => panic!("{} lost its fill", region.id),
            }
        }
    }
}

#[test]
fn test_bands_span_the_palette() {
    let mut s = session();
    s.load_image_bytes(&bands_png()).unwrap();
    s.poll().unwrap().unwrap();
    let doc = s.document().unwrap();
    let mut used: Vec<String> = doc
        .recolorable()
        .into_iter()
        .filter_map(|id| doc.fill_state(id)?.paint().map(str::to_string))
        .collect();
    used.sort();
    used.dedup();
    assert_eq!(used, vec!["#1496dc", "#6432aa", "#eb0000", "#ffe100"]);
}

#[test]
fn test_export_round_trips_through_a_file() {
    let mut s = session();
    s.load_image_bytes(&bands_png()).unwrap();
    s.poll().unwrap().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(hexmosaic::services::EXPORT_FILE_NAME);
    std::fs::write(&path, s.export_svg().unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let reloaded = SvgDocument::parse(text).unwrap();
    let doc = s.document().unwrap();
    assert_eq!(reloaded.regions(), doc.regions());
    assert_eq!(reloaded.view_box(), doc.view_box());
}

#[test]
fn test_document_palette_of_model() {
    let mut s = session();
    s.use_document_palette().unwrap();
    let hexes: Vec<&str> = s.palette().entries().iter().map(|e| e.hex()).collect();
    assert_eq!(hexes, vec!["#e6e6e6", "#d9d9d9"]);
}

#[test]
fn test_preview_has_view_box_size() {
    let mut s = session();
    assert_png_size(&s.preview_png(0.0).unwrap(), 600, 520);
    s.load_image_bytes(&bands_png()).unwrap();
    s.poll().unwrap().unwrap();
    assert_png_size(&s.preview_png(0.5).unwrap(), 600, 520);
}
