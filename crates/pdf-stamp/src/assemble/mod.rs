//! Merging an overlay onto one page of a template
//!
//! The template document is cloned and only the target page dictionary is
//! rewritten; all other objects keep their ids and content, so every other
//! page comes out exactly as it went in.

mod xobject;

pub use xobject::{copy_object_deep, create_page_xobject};

use crate::constants::STAMP_XOBJECT_PREFIX;
use crate::overlay::OverlayLayer;
use crate::template::{inherited_attribute, resolve, DocumentTemplate};
use crate::types::*;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use xobject::content_stream_ids;

/// Produce a new document with `overlay` merged onto page `target_page_index`.
///
/// The result always has the template's page count. Nothing is written to disk.
pub fn apply(
    template: &DocumentTemplate,
    overlay: &OverlayLayer,
    target_page_index: usize,
) -> Result<Document> {
    let page = *template.page(target_page_index)?;
    let mut output = template.document().clone();

    let mut cache: HashMap<ObjectId, ObjectId> = HashMap::new();
    let form_id = create_page_xobject(
        &mut output,
        overlay.document(),
        overlay.page_id(),
        &mut cache,
    )?;

    let name = add_xobject_resource(&mut output, page.id, form_id)?;
    wrap_page_content(&mut output, page.id, &name, page.origin)?;

    let placement = overlay.placement();
    log::debug!(
        "Merged overlay onto page {} of {} as /{} at ({}, {}) size {}x{}",
        target_page_index,
        template.page_count(),
        name,
        placement.x,
        placement.y,
        placement.width,
        placement.height
    );
    Ok(output)
}

/// Register `form_id` in the page's XObject resources and return its name.
///
/// Inherited or shared resource dictionaries are copied onto the page so
/// no other page sees the new entry.
fn add_xobject_resource(doc: &mut Document, page_id: ObjectId, form_id: ObjectId) -> Result<String> {
    let mut resources = match inherited_attribute(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    let mut xobjects = match resources.get(b"XObject").ok().and_then(|o| resolve(doc, o)) {
        Some(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };

    let name = unique_resource_name(&xobjects);
    xobjects.set(name.as_bytes(), Object::Reference(form_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(resources));
    Ok(name)
}

/// Number of `q` operators left open at the end of a content stream.
///
/// Unparseable content is assumed balanced.
fn unclosed_save_depth(content: &[u8]) -> usize {
    match Content::decode(content) {
        Ok(content) => content
            .operations
            .iter()
            .fold(0usize, |depth, op| match op.operator.as_str() {
                "q" => depth + 1,
                "Q" => depth.saturating_sub(1),
                _ => depth,
            }),
        Err(e) => {
            log::warn!("Could not parse page content, assuming balanced q/Q: {}", e);
            0
        }
    }
}

fn unique_resource_name(xobjects: &Dictionary) -> String {
    let mut index = 0usize;
    loop {
        let name = format!("{}{}", STAMP_XOBJECT_PREFIX, index);
        if !xobjects.has(name.as_bytes()) {
            return name;
        }
        index += 1;
    }
}

/// Isolate the existing content in a saved graphics state, then draw the stamp.
///
/// Any `q` the template leaves open is closed before the stamp is drawn, so
/// the stamp always starts from the page's default graphics state.
fn wrap_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    xobject_name: &str,
    origin: (f32, f32),
) -> Result<()> {
    let existing = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(contents) => content_stream_ids(doc, contents),
        Err(_) => Vec::new(),
    };
    let unclosed = if existing.is_empty() {
        0
    } else {
        unclosed_save_depth(&doc.get_page_content(page_id)?)
    };

    let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let stamp = format!(
        "\n{}Q\nq 1 0 0 1 {} {} cm /{} Do Q\n",
        "Q\n".repeat(unclosed),
        origin.0,
        origin.1,
        xobject_name
    );
    let close_id = doc.add_object(Stream::new(Dictionary::new(), stamp.into_bytes()));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open_id));
    contents.extend(existing.into_iter().map(Object::Reference));
    contents.push(Object::Reference(close_id));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", Object::Array(contents));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_resource_name_skips_taken() {
        let mut dict = Dictionary::new();
        assert_eq!(unique_resource_name(&dict), "Stamp0");
        dict.set("Stamp0", Object::Null);
        dict.set("Stamp1", Object::Null);
        assert_eq!(unique_resource_name(&dict), "Stamp2");
    }

    #[test]
    fn test_unclosed_save_depth() {
        assert_eq!(unclosed_save_depth(b"q 1 0 0 1 5 5 cm Q"), 0);
        assert_eq!(unclosed_save_depth(b"2 0 0 2 0 0 cm q"), 1);
        assert_eq!(unclosed_save_depth(b"q q BT ET Q q"), 2);
        // Stray Q never goes below zero
        assert_eq!(unclosed_save_depth(b"Q Q q"), 1);
    }
}
