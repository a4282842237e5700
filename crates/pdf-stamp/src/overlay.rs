//! Single-page transparent overlay holding the placed signature
//!
//! The overlay is a complete one-page PDF of the target page's size. Its
//! only content is the signature image; the rest of the page is left
//! unpainted so merging it changes nothing outside the signature box.

use crate::constants::OVERLAY_IMAGE_NAME;
use crate::types::*;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

/// A standalone one-page PDF containing exactly one placed image.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    document: Document,
    page_id: ObjectId,
    placement: DocumentBox,
    page_size: (f32, f32),
}

impl OverlayLayer {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_id(&self) -> ObjectId {
        self.page_id
    }

    /// Where the image sits, in document space
    pub fn placement(&self) -> DocumentBox {
        self.placement
    }

    pub fn page_size(&self) -> (f32, f32) {
        self.page_size
    }
}

/// Build the overlay page for a resized signature.
///
/// `doc_x`/`doc_y` is the lower-left corner of the signature box in document
/// space; `width`/`height` its size in document units. The image is scaled
/// into that box regardless of its pixel size.
pub fn build_overlay(
    image: &RgbaImage,
    doc_x: f32,
    doc_y: f32,
    width: f32,
    height: f32,
    page_width: f32,
    page_height: f32,
) -> Result<OverlayLayer> {
    if width <= 0.0 || height <= 0.0 || image.width() == 0 || image.height() == 0 {
        return Err(StampError::InvalidDimensions { width, height });
    }
    if page_width <= 0.0 || page_height <= 0.0 {
        return Err(StampError::InvalidDimensions {
            width: page_width,
            height: page_height,
        });
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = add_image_xobject(&mut doc, image)?;

    let mut xobjects = Dictionary::new();
    xobjects.set(OVERLAY_IMAGE_NAME, Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = placement_command(OVERLAY_IMAGE_NAME, doc_x, doc_y, width, height);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_width),
            Object::Real(page_height),
        ]),
    );
    page_dict.set("Resources", Object::Dictionary(resources));
    page_dict.set("Contents", Object::Reference(content_id));
    let page_id = doc.add_object(page_dict);

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages_dict.set("Count", Object::Integer(1));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(OverlayLayer {
        document: doc,
        page_id,
        placement: DocumentBox {
            x: doc_x,
            y: doc_y,
            width,
            height,
        },
        page_size: (page_width, page_height),
    })
}

/// Add the image as an RGB XObject with its alpha channel as a soft mask.
///
/// Fully opaque images get no mask. Both streams are Flate-compressed.
fn add_image_xobject(doc: &mut Document, image: &RgbaImage) -> Result<ObjectId> {
    let (w, h) = image.dimensions();
    let pixel_count = (w as usize) * (h as usize);
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in image.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut image_dict = image_dictionary(w, h, b"DeviceRGB");
    if alpha.iter().any(|&a| a < u8::MAX) {
        let smask_id = doc.add_object(Stream::new(
            image_dictionary(w, h, b"DeviceGray"),
            deflate(&alpha)?,
        ));
        image_dict.set("SMask", Object::Reference(smask_id));
    }

    Ok(doc.add_object(Stream::new(image_dict, deflate(&rgb)?)))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn image_dictionary(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    dict
}

/// Content stream command that paints an image XObject into a box.
fn placement_command(name: &str, x: f32, y: f32, width: f32, height: f32) -> String {
    format!("q {} 0 0 {} {} {} cm /{} Do Q\n", width, height, x, y, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_command() {
        assert_eq!(
            placement_command("Sig", 100.0, 692.0, 150.0, 50.0),
            "q 150 0 0 50 100 692 cm /Sig Do Q\n"
        );
    }
}
