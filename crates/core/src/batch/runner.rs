//! Sequential ticket submission.

use tracing::{info, warn};

use crate::glpi::{CreateTicketOutcome, SessionContext, TicketPayload, TicketingApi};
use crate::loader::TicketRequestRow;

use super::{
    BatchError, BatchProgress, BatchRun, BatchRunResult, CancelSignal, FailureDetail, FailureKind,
};

/// Submit `rows` in order, one request at a time.
///
/// `cancel` is checked before each row; an in-flight request always completes.
/// `on_progress` is called once after every processed row with strictly
/// increasing cursors. No row outcome aborts the run.
pub async fn submit<A, F>(
    api: &A,
    session: &SessionContext,
    rows: &[TicketRequestRow],
    cancel: &CancelSignal,
    mut on_progress: F,
) -> Result<BatchRunResult, BatchError>
where
    A: TicketingApi + ?Sized,
    F: FnMut(BatchProgress),
{
    if !session.is_authenticated() {
        return Err(BatchError::NotAuthenticated);
    }
    if rows.is_empty() {
        return Err(BatchError::NoRows);
    }

    let total = rows.len();
    let mut run = BatchRun::new(total);
    let mut cancelled = false;

    for (idx, row) in rows.iter().enumerate() {
        if cancel.is_cancelled() {
            info!(
                "Processing interrupted by user after {} of {} tickets",
                run.cursor(),
                total
            );
            cancelled = true;
            break;
        }

        let position = idx + 1;
        info!("Creating ticket {}/{}: {}", position, total, row.title);

        let payload = TicketPayload::from(row);
        match api.create_ticket(session, &payload).await {
            Ok(CreateTicketOutcome::Created { id }) => run.record_success(id),
            Ok(CreateTicketOutcome::Rejected { status, body }) => {
                warn!("Ticket '{}' rejected with status {}", row.title, status);
                run.record_failure(FailureDetail {
                    position,
                    title: row.title.clone(),
                    kind: FailureKind::Rejected { status, body },
                });
            }
            Err(e) => {
                let kind = if e.is_transport() {
                    warn!("Connection error: {}", e);
                    FailureKind::Transport(e.to_string())
                } else {
                    warn!("Failed to process row {}: {}", position, e);
                    FailureKind::Local(e.to_string())
                };
                run.record_failure(FailureDetail {
                    position,
                    title: row.title.clone(),
                    kind,
                });
            }
        }

        on_progress(run.snapshot());
    }

    let result = run.finish(cancelled);
    info!(
        "Batch finished - Success: {}, Errors: {}",
        result.success_count, result.failure_count
    );
    Ok(result)
}
