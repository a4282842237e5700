mod common;

use image::{GrayImage, Luma};
use pdf_stamp::*;

#[test]
fn test_resize_reports_exact_dimensions() {
    let img = common::signature_image(300, 100);
    for (w, h) in [(150, 50), (1, 1), (301, 7), (40, 400)] {
        let out = resize(&img, w, h).unwrap();
        assert_eq!(out.dimensions(), (w, h));
    }
}

#[test]
fn test_resize_is_idempotent() {
    let img = common::signature_image(300, 100);
    let once = resize(&img, 150, 50).unwrap();
    let twice = resize(&once, 150, 50).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_resize_rejects_zero() {
    let img = common::signature_image(10, 10);
    assert!(matches!(
        resize(&img, 0, 10),
        Err(StampError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        resize(&img, 10, 0),
        Err(StampError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_resize_keeps_transparency() {
    let img = common::signature_image(200, 40);
    let out = resize(&img, 100, 20).unwrap();
    // Far right column was fully transparent in the source
    assert_eq!(out.get_pixel(99, 10).0[3], 0);
    assert_eq!(out.get_pixel(0, 10).0[3], 255);
}

#[test]
fn test_load_signature_converts_to_rgba() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");
    GrayImage::from_pixel(8, 4, Luma([90])).save(&path).unwrap();

    let img = load_signature(&path).unwrap();
    assert_eq!(img.dimensions(), (8, 4));
    assert_eq!(img.get_pixel(3, 2).0, [90, 90, 90, 255]);
}

#[test]
fn test_load_signature_missing_file() {
    let err = load_signature("/nonexistent/signature.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_load_signature_undecodable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let err = load_signature(&path).unwrap_err();
    assert!(matches!(err, StampError::UnreadableImage { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_encode_png_decodes_back() {
    let img = common::signature_image(12, 6);
    let bytes = encode_png(&img).unwrap();
    let decoded = signature::decode_signature(&bytes).unwrap();
    assert_eq!(decoded, img);
}
