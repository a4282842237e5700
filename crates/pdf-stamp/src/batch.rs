//! Single-document stamping and the per-recipient batch pipeline
//!
//! Every item runs the same chain:
//! 1. Validate the recipient and position against the opened template
//! 2. Resize the signature to the position's pixel box
//! 3. Transform the position using the target page's own height
//! 4. Build the overlay and merge it onto the target page
//! 5. Persist the new document

use crate::assemble;
use crate::io::save_document;
use crate::naming::output_file_name;
use crate::options::StampOptions;
use crate::overlay::build_overlay;
use crate::signature::{pixel_box, resize};
use crate::template::DocumentTemplate;
use crate::transform::document_box;
use crate::types::*;
use crate::validate::validate_item;
use image::RgbaImage;
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

// =============================================================================
// Composition
// =============================================================================

/// Stamp an already-decoded signature onto the template. Pure with respect to the filesystem.
pub fn compose(
    template: &DocumentTemplate,
    signature: &RgbaImage,
    position: &Position,
    options: &StampOptions,
) -> Result<Document> {
    let page = template.page(position.page)?;

    let (px_w, px_h) = pixel_box(position.width, position.height, options.pixels_per_unit)?;
    let resized = resize(signature, px_w, px_h)?;

    let placement = document_box(position, page.height);
    let overlay = build_overlay(
        &resized,
        placement.x,
        placement.y,
        placement.width,
        placement.height,
        page.width,
        page.height,
    )?;

    assemble::apply(template, &overlay, position.page)
}

/// Validate and stamp one recipient's signature, failing on the first error.
pub fn stamp_document(
    template: &DocumentTemplate,
    recipient: &Recipient,
    position: &Position,
    options: &StampOptions,
) -> Result<Document> {
    let signature = validate_item(template, recipient, position)?;
    compose(template, &signature, position, options)
}

/// Stamp one recipient and write the result into the output directory.
pub fn stamp_to_file(
    template: &DocumentTemplate,
    recipient: &Recipient,
    position: &Position,
    options: &StampOptions,
) -> Result<PathBuf> {
    let doc = stamp_document(template, recipient, position, options)?;
    let file_name = output_file_name(template.base_name(), &recipient.name);
    save_document(doc, &options.output_dir, &file_name, options.overwrite)
}

/// Open `template_path` and stamp a single recipient on the blocking pool.
pub async fn stamp_file(
    template_path: impl AsRef<Path>,
    recipient: Recipient,
    position: Position,
    options: StampOptions,
) -> Result<PathBuf> {
    options.validate()?;
    let template = DocumentTemplate::load(template_path).await?;
    tokio::task::spawn_blocking(move || stamp_to_file(&template, &recipient, &position, &options))
        .await?
}

// =============================================================================
// Batch Types
// =============================================================================

/// Result of one batch item
#[derive(Debug)]
pub enum Outcome {
    Success(PathBuf),
    Failed(StampError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn output_path(&self) -> Option<&Path> {
        match self {
            Outcome::Success(path) => Some(path),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&StampError> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failed(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub struct BatchItem {
    pub recipient: String,
    pub outcome: Outcome,
}

/// Outcomes of a batch, one per recipient, in input order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub items: Vec<BatchItem>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Failed items with their errors, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &StampError)> {
        self.items
            .iter()
            .filter_map(|i| i.outcome.error().map(|e| (i.recipient.as_str(), e)))
    }
}

/// Reported once per finished item, after it finished.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    /// Items finished so far, including this one
    pub completed: usize,
    pub total: usize,
    pub recipient: String,
    /// `None` on success
    pub error: Option<String>,
}

/// Receives progress from a running batch.
///
/// Called synchronously from the thread running the batch.
pub trait ProgressObserver: Send {
    fn on_item_complete(&mut self, progress: &BatchProgress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&BatchProgress) + Send,
{
    fn on_item_complete(&mut self, progress: &BatchProgress) {
        self(progress)
    }
}

/// Forwards progress into a bounded channel, waiting for room.
///
/// Must be driven from a blocking context (e.g. `spawn_blocking`), never
/// from inside an async task. A closed receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelObserver(pub mpsc::Sender<BatchProgress>);

impl ProgressObserver for ChannelObserver {
    fn on_item_complete(&mut self, progress: &BatchProgress) {
        if self.0.blocking_send(progress.clone()).is_err() {
            log::debug!("Progress receiver dropped; continuing batch without reporting");
        }
    }
}

/// Cooperative cancellation, checked between batch items only.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation so the token can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Batch Pipeline
// =============================================================================

/// Run every recipient through the pipeline, sequentially and in order.
///
/// A failing item never stops the batch; the result always holds one entry
/// per recipient. After cancellation, remaining items are recorded as
/// [`StampError::Cancelled`] without being attempted.
pub fn run_batch_blocking(
    template: &DocumentTemplate,
    recipients: &[Recipient],
    position: &Position,
    options: &StampOptions,
    cancel: &CancellationToken,
    observer: &mut dyn ProgressObserver,
) -> BatchResult {
    let total = recipients.len();
    let mut result = BatchResult {
        items: Vec::with_capacity(total),
    };

    log::info!(
        "Starting batch of {} recipient(s) on '{}' page {}",
        total,
        template.base_name(),
        position.page
    );

    for (index, recipient) in recipients.iter().enumerate() {
        let outcome = if cancel.is_cancelled() {
            Outcome::Failed(StampError::Cancelled)
        } else {
            match stamp_to_file(template, recipient, position, options) {
                Ok(path) => {
                    log::info!("[{}/{}] {} -> {}", index + 1, total, recipient.name, path.display());
                    Outcome::Success(path)
                }
                Err(e) => {
                    log::warn!("[{}/{}] {} failed: {}", index + 1, total, recipient.name, e);
                    Outcome::Failed(e)
                }
            }
        };

        let progress = BatchProgress {
            completed: index + 1,
            total,
            recipient: recipient.name.clone(),
            error: outcome.error().map(|e| e.to_string()),
        };
        result.items.push(BatchItem {
            recipient: recipient.name.clone(),
            outcome,
        });
        observer.on_item_complete(&progress);
    }

    log::info!(
        "Batch finished: {} succeeded, {} failed",
        result.succeeded(),
        result.failed()
    );
    result
}

/// Open the template and run the batch on the blocking pool.
///
/// Fails as a whole only when the options are invalid or the template
/// cannot be opened; per-recipient failures land in the result.
pub async fn run_batch(
    template_path: impl AsRef<Path>,
    recipients: Vec<Recipient>,
    position: Position,
    options: StampOptions,
    cancel: CancellationToken,
    mut observer: Box<dyn ProgressObserver>,
) -> Result<BatchResult> {
    options.validate()?;
    let template = DocumentTemplate::load(template_path).await?;

    let result = tokio::task::spawn_blocking(move || {
        run_batch_blocking(
            &template,
            &recipients,
            &position,
            &options,
            &cancel,
            observer.as_mut(),
        )
    })
    .await?;
    Ok(result)
}
