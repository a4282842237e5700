mod common;

use image::{Rgba, RgbaImage};
use pdf_stamp::*;

fn overlay_image_dict(layer: &OverlayLayer) -> lopdf::Dictionary {
    let doc = layer.document();
    let page = doc.get_dictionary(layer.page_id()).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_id = xobjects.get(b"Sig").unwrap().as_reference().unwrap();
    doc.get_object(image_id).unwrap().as_stream().unwrap().dict.clone()
}

#[test]
fn test_overlay_is_single_page_of_page_size() {
    let img = common::signature_image(150, 50);
    let layer = build_overlay(&img, 100.0, 692.0, 150.0, 50.0, 612.0, 792.0).unwrap();

    assert_eq!(layer.document().get_pages().len(), 1);
    assert_eq!(layer.page_size(), (612.0, 792.0));
    assert_eq!(
        layer.placement(),
        DocumentBox {
            x: 100.0,
            y: 692.0,
            width: 150.0,
            height: 50.0
        }
    );

    let page = layer.document().get_dictionary(layer.page_id()).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box[2].as_float().unwrap(), 612.0);
    assert_eq!(media_box[3].as_float().unwrap(), 792.0);
}

#[test]
fn test_overlay_content_places_image_only() {
    let img = common::signature_image(150, 50);
    let layer = build_overlay(&img, 100.0, 692.0, 150.0, 50.0, 612.0, 792.0).unwrap();

    let content = layer.document().get_page_content(layer.page_id()).unwrap();
    let content = String::from_utf8(content).unwrap();
    assert_eq!(content.trim(), "q 150 0 0 50 100 692 cm /Sig Do Q");
}

#[test]
fn test_overlay_transparent_image_has_soft_mask() {
    let img = common::signature_image(20, 10);
    let layer = build_overlay(&img, 0.0, 0.0, 20.0, 10.0, 100.0, 100.0).unwrap();

    let dict = overlay_image_dict(&layer);
    assert_eq!(dict.get(b"Width").unwrap().as_i64().unwrap(), 20);
    assert_eq!(dict.get(b"Height").unwrap().as_i64().unwrap(), 10);
    let smask_id = dict.get(b"SMask").unwrap().as_reference().unwrap();

    let smask = layer.document().get_object(smask_id).unwrap().as_stream().unwrap();
    let alpha = smask.decompressed_content().unwrap();
    assert_eq!(alpha.len(), 200);
    // Right half of every row is transparent
    assert_eq!(alpha[0], 255);
    assert_eq!(alpha[19], 0);
}

#[test]
fn test_overlay_image_streams_are_deflated() {
    let img = common::signature_image(400, 200);
    let layer = build_overlay(&img, 0.0, 0.0, 400.0, 200.0, 612.0, 792.0).unwrap();

    let doc = layer.document();
    let page = doc.get_dictionary(layer.page_id()).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_id = xobjects.get(b"Sig").unwrap().as_reference().unwrap();
    let image = doc.get_object(image_id).unwrap().as_stream().unwrap();

    assert_eq!(
        image.dict.get(b"Filter").unwrap().as_name().unwrap(),
        b"FlateDecode"
    );
    assert!(image.content.len() < 400 * 200 * 3);
    assert_eq!(image.decompressed_content().unwrap().len(), 400 * 200 * 3);

    let smask_id = image.dict.get(b"SMask").unwrap().as_reference().unwrap();
    let smask = doc.get_object(smask_id).unwrap().as_stream().unwrap();
    assert_eq!(smask.decompressed_content().unwrap().len(), 400 * 200);
}

#[test]
fn test_overlay_opaque_image_has_no_mask() {
    let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    let layer = build_overlay(&img, 0.0, 0.0, 4.0, 4.0, 100.0, 100.0).unwrap();

    let dict = overlay_image_dict(&layer);
    assert!(!dict.has(b"SMask"));
}

#[test]
fn test_overlay_rejects_empty_box() {
    let img = common::signature_image(4, 4);
    assert!(matches!(
        build_overlay(&img, 0.0, 0.0, 0.0, 4.0, 100.0, 100.0),
        Err(StampError::InvalidDimensions { .. })
    ));
}
