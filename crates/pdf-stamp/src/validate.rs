//! Input validation for positions, recipients and input files

use crate::constants::{
    MAX_RECIPIENT_NAME_LEN, SUPPORTED_DOCUMENT_EXTENSIONS, SUPPORTED_IMAGE_EXTENSIONS,
};
use crate::signature::load_signature;
use crate::template::DocumentTemplate;
use crate::types::*;
use image::RgbaImage;
use std::path::Path;

/// Check that `position` describes a non-empty box lying fully on a page of the given size.
pub fn validate_position(position: &Position, page_width: f32, page_height: f32) -> Result<()> {
    let Position {
        x,
        y,
        width,
        height,
        ..
    } = *position;

    if ![x, y, width, height].iter().all(|v| v.is_finite()) {
        return Err(StampError::InvalidInput(
            "position values must be finite numbers".to_string(),
        ));
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(StampError::InvalidDimensions { width, height });
    }
    if x < 0.0 || y < 0.0 {
        return Err(StampError::PositionOutOfBounds(format!(
            "coordinates ({}, {}) must not be negative",
            x, y
        )));
    }
    if x + width > page_width {
        return Err(StampError::PositionOutOfBounds(format!(
            "box right edge {} exceeds page width {}",
            x + width,
            page_width
        )));
    }
    if y + height > page_height {
        return Err(StampError::PositionOutOfBounds(format!(
            "box bottom edge {} exceeds page height {}",
            y + height,
            page_height
        )));
    }
    Ok(())
}

/// Validate one batch item against an already-opened template.
///
/// Returns the decoded signature so the caller does not decode it twice.
pub fn validate_item(
    template: &DocumentTemplate,
    recipient: &Recipient,
    position: &Position,
) -> Result<RgbaImage> {
    let page = template.page(position.page)?;
    validate_position(position, page.width, page.height)?;
    load_signature(&recipient.signature_path)
}

pub fn validate_recipient_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StampError::InvalidInput(
            "recipient name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_RECIPIENT_NAME_LEN {
        return Err(StampError::InvalidInput(format!(
            "recipient name is longer than {} characters",
            MAX_RECIPIENT_NAME_LEN
        )));
    }
    Ok(())
}

/// Existence and extension check for a signature image.
pub fn validate_signature_file(path: impl AsRef<Path>) -> Result<()> {
    validate_file(path.as_ref(), SUPPORTED_IMAGE_EXTENSIONS)
}

/// Existence and extension check for a template document.
pub fn validate_document_file(path: impl AsRef<Path>) -> Result<()> {
    validate_file(path.as_ref(), SUPPORTED_DOCUMENT_EXTENSIONS)
}

fn validate_file(path: &Path, extensions: &[&str]) -> Result<()> {
    if !path.is_file() {
        return Err(StampError::NotFound(path.to_owned()));
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if !extensions.contains(&ext.as_str()) {
        return Err(StampError::InvalidInput(format!(
            "unsupported file type for {}; expected one of: {}",
            path.display(),
            extensions.join(", ")
        )));
    }
    Ok(())
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
    fn test_position_fits() {
        assert!(validate_position(&pos(0.0, 0.0, 612.0, 792.0), 612.0, 792.0).is_ok());
        assert!(validate_position(&pos(100.0, 50.0, 150.0, 50.0), 612.0, 792.0).is_ok());
    }

    #[test]
    fn test_position_overflow() {
        let err = validate_position(&pos(500.0, 0.0, 150.0, 50.0), 612.0, 792.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        let err = validate_position(&pos(0.0, 750.0, 150.0, 50.0), 612.0, 792.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn test_position_negative_and_empty() {
        let err = validate_position(&pos(-1.0, 0.0, 10.0, 10.0), 612.0, 792.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        assert!(matches!(
            validate_position(&pos(0.0, 0.0, 0.0, 10.0), 612.0, 792.0),
            Err(StampError::InvalidDimensions { .. })
        ));
        assert!(validate_position(&pos(f32::NAN, 0.0, 10.0, 10.0), 612.0, 792.0).is_err());
    }

    #[test]
    fn test_recipient_name() {
        assert!(validate_recipient_name("Ada Lovelace").is_ok());
        assert!(validate_recipient_name("   ").is_err());
        assert!(validate_recipient_name(&"x".repeat(101)).is_err());
        assert!(validate_recipient_name(&"x".repeat(100)).is_ok());
    }
}
