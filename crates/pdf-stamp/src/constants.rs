//! Shared constants for signature stamping

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Signature Defaults
// =============================================================================

/// Default signature box width (points)
pub const DEFAULT_SIGNATURE_WIDTH: f32 = 150.0;

/// Default signature box height (points)
pub const DEFAULT_SIGNATURE_HEIGHT: f32 = 50.0;

/// Raster pixels per document unit. 1.0 matches a 72 DPI raster.
pub const DEFAULT_PIXELS_PER_UNIT: f32 = 1.0;

/// Upper bound on the rasterized signature along either axis
pub const MAX_RASTER_DIMENSION: u32 = 8192;

// =============================================================================
// Input Validation
// =============================================================================

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

pub const SUPPORTED_DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

pub const MAX_RECIPIENT_NAME_LEN: usize = 100;

// =============================================================================
// PDF Resource Names
// =============================================================================

/// Resource name of the image inside the overlay page
pub const OVERLAY_IMAGE_NAME: &str = "Sig";

/// Prefix for the overlay form placed on the target page
pub const STAMP_XOBJECT_PREFIX: &str = "Stamp";

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";
