//! Viewer-space to document-space conversion

use crate::types::{DocumentBox, Position};

/// Map the top-left corner convention of `position` onto PDF's bottom-left origin.
///
/// No clamping is done; out-of-range boxes are rejected by validation before this is called.
pub fn to_document_space(position: &Position, page_height: f32) -> (f32, f32) {
    let doc_x = position.x;
    let doc_y = page_height - position.y - position.height;
    (doc_x, doc_y)
}

/// Same as [`to_document_space`] but keeps the box size alongside the origin.
pub fn document_box(position: &Position, page_height: f32) -> DocumentBox {
    let (x, y) = to_document_space(position, page_height);
    DocumentBox {
        x,
        y,
        width: position.width,
        height: position.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: f32, y: f32, width: f32, height: f32) -> Position {
        Position {
            x,
            y,
            width,
            height,
            page: 0,
        }
    }

    #[test]
    fn test_flush_with_top() {
        for h in [1.0, 20.0, 50.0, 792.0] {
            let (_, doc_y) = to_document_space(&pos(10.0, 0.0, 30.0, h), 792.0);
            assert_eq!(doc_y, 792.0 - h);
        }
    }

    #[test]
    fn test_flush_with_bottom() {
        for (y, h) in [(742.0, 50.0), (0.0, 792.0), (791.0, 1.0)] {
            let (_, doc_y) = to_document_space(&pos(0.0, y, 30.0, h), 792.0);
            assert_eq!(doc_y, 0.0);
        }
    }

    #[test]
    fn test_x_passes_through() {
        let (doc_x, doc_y) = to_document_space(&pos(100.0, 50.0, 150.0, 50.0), 792.0);
        assert_eq!((doc_x, doc_y), (100.0, 692.0));
    }

    #[test]
    fn test_document_box_keeps_size() {
        let b = document_box(&pos(5.0, 10.0, 20.0, 30.0), 100.0);
        assert_eq!(
            b,
            DocumentBox {
                x: 5.0,
                y: 60.0,
                width: 20.0,
                height: 30.0
            }
        );
    }
}
