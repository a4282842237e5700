use crate::{BatchSummary, PageSize, StampUpdate};
use pdf_stamp::{
    BatchProgress, CancellationToken, DocumentTemplate, Position, Recipient, StampOptions,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

pub async fn handle_inspect(template_path: PathBuf, update_tx: &mpsc::UnboundedSender<StampUpdate>) {
    match DocumentTemplate::load(&template_path).await {
        Ok(template) => {
            let pages = template
                .pages()
                .iter()
                .map(|p| PageSize {
                    width: p.width,
                    height: p.height,
                })
                .collect();
            let _ = update_tx.send(StampUpdate::Inspected {
                base_name: template.base_name().to_string(),
                template_path,
                pages,
            });
        }
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to open template: {e}"),
            });
        }
    }
}

pub async fn handle_load_recipients(path: PathBuf, update_tx: &mpsc::UnboundedSender<StampUpdate>) {
    match pdf_stamp::load_recipients(&path).await {
        Ok(recipients) => {
            let _ = update_tx.send(StampUpdate::RecipientsLoaded { recipients });
        }
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to load recipients: {e}"),
            });
        }
    }
}

pub async fn handle_stamp(
    template_path: PathBuf,
    recipient: Recipient,
    position: Position,
    options: StampOptions,
    update_tx: &mpsc::UnboundedSender<StampUpdate>,
) {
    let name = recipient.name.clone();
    match pdf_stamp::stamp_file(&template_path, recipient, position, options).await {
        Ok(path) => {
            let _ = update_tx.send(StampUpdate::Stamped {
                recipient: name,
                path,
            });
        }
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to stamp document for {name}: {e}"),
            });
        }
    }
}

pub async fn handle_batch(
    template_path: PathBuf,
    recipients: Vec<Recipient>,
    position: Position,
    options: StampOptions,
    cancel: CancellationToken,
    update_tx: &mpsc::UnboundedSender<StampUpdate>,
) {
    let progress_tx = update_tx.clone();
    let observer = Box::new(move |progress: &BatchProgress| {
        let _ = progress_tx.send(StampUpdate::Progress(progress.clone()));
    });

    match pdf_stamp::run_batch(template_path, recipients, position, options, cancel, observer).await
    {
        Ok(result) => {
            let _ = update_tx.send(StampUpdate::BatchComplete {
                summary: BatchSummary::from(&result),
            });
        }
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Batch aborted: {e}"),
            });
        }
    }
}
