use crate::{RuntimeError, StampCommand, StampUpdate, handlers};
use pdf_stamp::CancellationToken;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Async worker task that processes stamp commands and sends updates
///
/// Commands run one at a time in arrival order. `cancel` applies to the
/// batch that is running or, if none is, the next one to start; it is
/// cleared once that batch finishes.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<StampCommand>,
    update_tx: mpsc::UnboundedSender<StampUpdate>,
    cancel: CancellationToken,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &cancel, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: StampCommand,
    cancel: &CancellationToken,
    update_tx: &mpsc::UnboundedSender<StampUpdate>,
) {
    match cmd {
        StampCommand::Inspect { template_path } => {
            handlers::handle_inspect(template_path, update_tx).await;
        }
        StampCommand::LoadRecipients { path } => {
            handlers::handle_load_recipients(path, update_tx).await;
        }
        StampCommand::Stamp {
            template_path,
            recipient,
            position,
            options,
        } => {
            handlers::handle_stamp(template_path, recipient, position, options, update_tx).await;
        }
        StampCommand::Batch {
            template_path,
            recipients,
            position,
            options,
        } => {
            handlers::handle_batch(
                template_path,
                recipients,
                position,
                options,
                cancel.clone(),
                update_tx,
            )
            .await;
            cancel.reset();
        }
    }
}

/// Handle to a spawned [`worker_task`].
pub struct StampWorker {
    command_tx: mpsc::UnboundedSender<StampCommand>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StampWorker {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// Returns the handle and the receiving end of the update channel.
    pub fn spawn() -> (Self, mpsc::UnboundedReceiver<StampUpdate>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(worker_task(command_rx, update_tx, cancel.clone()));

        (
            Self {
                command_tx,
                cancel,
                task,
            },
            update_rx,
        )
    }

    pub fn send(&self, command: StampCommand) -> Result<(), RuntimeError> {
        self.command_tx
            .send(command)
            .map_err(|_| RuntimeError::WorkerClosed)
    }

    /// Stop the current batch after the item in progress.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Close the command channel and wait for queued commands to drain.
    pub async fn shutdown(self) -> Result<(), RuntimeError> {
        drop(self.command_tx);
        self.task.await?;
        Ok(())
    }
}
