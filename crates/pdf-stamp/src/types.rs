use crate::constants::{DEFAULT_SIGNATURE_HEIGHT, DEFAULT_SIGNATURE_WIDTH};
use lopdf::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unreadable image {}: {source}", .path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Document has no pages")]
    EmptyDocument,
    #[error("Invalid dimensions {width}x{height}: width and height must be positive")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("Page index {index} is out of range (document has {page_count} pages)")]
    PageIndexOutOfRange { index: usize, page_count: usize },
    #[error("Position out of bounds: {0}")]
    PositionOutOfBounds(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Batch cancelled before this item started")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, StampError>;

/// Coarse error categories used when reporting outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing template or signature file
    NotFound,
    /// Undecodable image or unparseable document
    InvalidFormat,
    /// Page index or box outside the document
    OutOfBounds,
    /// Caller-supplied values that can never be valid
    InvalidInput,
    /// Failure reading or writing storage
    Io,
    /// Skipped because the batch was cancelled
    Cancelled,
}

impl StampError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StampError::NotFound(_) => ErrorKind::NotFound,
            StampError::UnreadableImage { .. }
            | StampError::Image(_)
            | StampError::Pdf(_)
            | StampError::EmptyDocument => ErrorKind::InvalidFormat,
            StampError::PageIndexOutOfRange { .. } | StampError::PositionOutOfBounds(_) => {
                ErrorKind::OutOfBounds
            }
            StampError::InvalidDimensions { .. }
            | StampError::InvalidInput(_)
            | StampError::Config(_) => ErrorKind::InvalidInput,
            StampError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            StampError::Io(_) | StampError::TaskJoin(_) => ErrorKind::Io,
            StampError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Signature placement in viewer space (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Zero-based page index
    pub page: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: DEFAULT_SIGNATURE_WIDTH,
            height: DEFAULT_SIGNATURE_HEIGHT,
            page: 0,
        }
    }
}

/// A box in document space (origin bottom-left, y grows upward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Someone whose signature gets stamped onto the template.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipient {
    pub name: String,
    /// Job title, carried for display only
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: String,
    pub signature_path: PathBuf,
}

impl Recipient {
    pub fn new(name: impl Into<String>, signature_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            signature_path: signature_path.into(),
        }
    }
}

/// Geometry of a single template page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    pub id: ObjectId,
    pub width: f32,
    pub height: f32,
    /// Lower-left corner of the MediaBox
    pub origin: (f32, f32),
}
