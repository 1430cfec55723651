//! Background batch worker.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::glpi::{SessionContext, TicketingApi};
use crate::loader::TicketRequestRow;

use super::{submit, BatchError, BatchProgress, BatchRunResult, CancelSignal};

/// Handle to a batch running on a background task.
///
/// The observer can only cancel and read progress snapshots; the run state
/// itself stays inside the task.
pub struct BatchHandle {
    cancel: CancelSignal,
    progress: mpsc::UnboundedReceiver<BatchProgress>,
    task: JoinHandle<Result<BatchRunResult, BatchError>>,
}

/// Start `submit` on a tokio task.
///
/// Progress snapshots are forwarded over an unbounded channel so the worker
/// never waits on the observer.
pub fn spawn_batch(
    api: Arc<dyn TicketingApi>,
    session: SessionContext,
    rows: Vec<TicketRequestRow>,
) -> BatchHandle {
    let cancel = CancelSignal::new();
    let (tx, progress) = mpsc::unbounded_channel();

    let worker_cancel = cancel.clone();
    let task = tokio::spawn(async move {
        submit(api.as_ref(), &session, &rows, &worker_cancel, |p| {
            // Observer may have gone away; the run continues regardless
            let _ = tx.send(p);
        })
        .await
    });

    BatchHandle {
        cancel,
        progress,
        task,
    }
}

impl BatchHandle {
    /// Request cancellation at the next row boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// Next progress snapshot, or `None` once the worker has stopped.
    pub async fn next_progress(&mut self) -> Option<BatchProgress> {
        self.progress.recv().await
    }

    /// Wait for the worker and return its result.
    pub async fn join(self) -> Result<BatchRunResult, BatchError> {
        self.task
            .await
            .map_err(|e| BatchError::WorkerFailed(e.to_string()))?
    }
}
