use std::path::PathBuf;

mod handlers;
mod worker;

// Re-export types from the library crate
pub use pdf_stamp::{
    BatchProgress, BatchResult, CancellationToken, Position, Recipient, StampOptions,
};
pub use worker::{StampWorker, worker_task};

/// Commands sent from a front end to the worker
#[derive(Debug)]
pub enum StampCommand {
    Inspect {
        template_path: PathBuf,
    },
    LoadRecipients {
        path: PathBuf,
    },
    Stamp {
        template_path: PathBuf,
        recipient: Recipient,
        position: Position,
        options: StampOptions,
    },
    Batch {
        template_path: PathBuf,
        recipients: Vec<Recipient>,
        position: Position,
        options: StampOptions,
    },
}

/// Updates sent from the worker back to the front end
#[derive(Debug, Clone, PartialEq)]
pub enum StampUpdate {
    Progress(BatchProgress),
    Inspected {
        template_path: PathBuf,
        base_name: String,
        pages: Vec<PageSize>,
    },
    RecipientsLoaded {
        recipients: Vec<Recipient>,
    },
    Stamped {
        recipient: String,
        path: PathBuf,
    },
    BatchComplete {
        summary: BatchSummary,
    },
    Error {
        message: String,
    },
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

/// Cloneable digest of a [`BatchResult`], in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: Vec<(String, PathBuf)>,
    /// Recipient name and failure reason
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

impl From<&BatchResult> for BatchSummary {
    fn from(result: &BatchResult) -> Self {
        let mut summary = BatchSummary {
            total: result.len(),
            ..Default::default()
        };
        for item in &result.items {
            if let Some(path) = item.outcome.output_path() {
                summary
                    .succeeded
                    .push((item.recipient.clone(), path.to_path_buf()));
            } else if let Some(err) = item.outcome.error() {
                summary
                    .failed
                    .push((item.recipient.clone(), err.to_string()));
            }
        }
        summary
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("Worker has shut down")]
    WorkerClosed,
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
