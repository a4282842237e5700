#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use lopdf::{Dictionary, Document, Object, Stream};
use pdf_stamp::DocumentTemplate;
use std::path::{Path, PathBuf};

/// Build a document whose pages have the given (width, height) sizes.
///
/// Each page gets its own content stream so pages can be told apart.
pub fn create_test_pdf(page_sizes: &[(i64, i64)]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for (i, &(w, h)) in page_sizes.iter().enumerate() {
        let content = format!("BT /F1 12 Tf 72 72 Td (page {}) Tj ET", i);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(w),
                    Object::Integer(h),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(page_sizes.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn letter_pages(count: usize) -> Document {
    create_test_pdf(&vec![(612, 792); count])
}

pub fn template(page_sizes: &[(i64, i64)]) -> DocumentTemplate {
    DocumentTemplate::from_document(create_test_pdf(page_sizes), "template").unwrap()
}

/// Write a document to `dir/name` and return the path.
pub fn write_pdf(mut doc: Document, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(&path, writer).unwrap();
    path
}

/// Half-transparent test signature: opaque left half, transparent right half.
pub fn signature_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([10, 20, 200, 255])
        } else {
            Rgba([255, 255, 255, 0])
        }
    })
}

pub fn write_signature(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    signature_image(60, 20).save(&path).unwrap();
    path
}

/// Debug rendering of an object, used to compare objects across documents.
pub fn object_repr(doc: &Document, id: lopdf::ObjectId) -> String {
    format!("{:?}", doc.get_object(id).unwrap())
}
