//! Assertion helpers for tests.

use hexmosaic::models::{FillState, RegionId};
use hexmosaic::services::SvgDocument;
use pretty_assertions::assert_eq;

/// Assert a region's current paint.
pub fn assert_fill(doc: &SvgDocument, id: usize, expected: &str) {
    assert_eq!(
        doc.fill_state(RegionId(id)),
        Some(FillState::Paint(expected.to_string())),
        "fill of region #{id}"
    );
}

/// Assert the bytes are a PNG of the given size.
pub fn assert_png_size(bytes: &[u8], width: u32, height: u32) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "Expected PNG, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let reader = decoder.read_info().unwrap();
    let info = reader.info();
    assert_eq!((info.width, info.height), (width, height));
}
