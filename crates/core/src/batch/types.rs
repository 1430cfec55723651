//! Types for batch runs.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Reasons a batch refuses to start.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No active session; start a session before creating tickets")]
    NotAuthenticated,

    #[error("No valid rows to submit; load a CSV file first")]
    NoRows,

    #[error("Batch worker failed: {0}")]
    WorkerFailed(String),
}

/// Cooperative cancellation flag, checked once per row boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Snapshot sent to observers after each processed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Rows processed so far.
    pub cursor: usize,
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processing {}/{} - Success: {}, Errors: {}",
            self.cursor, self.total, self.success_count, self.failure_count
        )
    }
}

/// Why a single row did not produce a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, TLS or timeout failure.
    Transport(String),
    /// The server answered with a status other than 201.
    Rejected { status: u16, body: String },
    /// The request could not be built or its answer could not be handled.
    Local(String),
}

/// One failed row, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    /// 1-based position among the submitted rows.
    pub position: usize,
    pub title: String,
    pub kind: FailureKind,
}

impl FailureDetail {
    fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(untitled)"
        } else {
            &self.title
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.display_title();
        match &self.kind {
            FailureKind::Transport(message) => {
                write!(f, "Ticket '{}': connection error - {}", title, message)
            }
            FailureKind::Rejected { status, body } => {
                write!(f, "Ticket '{}': {} - {}", title, status, body)
            }
            FailureKind::Local(message) => {
                write!(f, "Ticket '{}': processing error - {}", title, message)
            }
        }
    }
}

/// State of one submission pass. Owned and mutated by the submitting task only.
///
/// `success_count + failure_count == cursor` holds after every mutation.
#[derive(Debug)]
pub struct BatchRun {
    total: usize,
    cursor: usize,
    success_count: usize,
    failure_count: usize,
    failures: Vec<FailureDetail>,
    created_ticket_ids: Vec<u64>,
    started_at: DateTime<Utc>,
}

impl BatchRun {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            cursor: 0,
            success_count: 0,
            failure_count: 0,
            failures: Vec::new(),
            created_ticket_ids: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.total
    }

    pub(crate) fn record_success(&mut self, ticket_id: Option<u64>) {
        debug_assert!(!self.is_complete());
        self.cursor += 1;
        self.success_count += 1;
        self.created_ticket_ids.extend(ticket_id);
    }

    pub(crate) fn record_failure(&mut self, detail: FailureDetail) {
        debug_assert!(!self.is_complete());
        self.cursor += 1;
        self.failure_count += 1;
        self.failures.push(detail);
    }

    pub fn snapshot(&self) -> BatchProgress {
        BatchProgress {
            cursor: self.cursor,
            total: self.total,
            success_count: self.success_count,
            failure_count: self.failure_count,
        }
    }

    pub(crate) fn finish(self, cancelled: bool) -> BatchRunResult {
        BatchRunResult {
            total: self.total,
            processed: self.cursor,
            success_count: self.success_count,
            failure_count: self.failure_count,
            failures: self.failures,
            created_ticket_ids: self.created_ticket_ids,
            cancelled,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Final report of a batch run.
#[derive(Debug, Clone)]
pub struct BatchRunResult {
    pub total: usize,
    pub processed: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// Every failure in submission order.
    pub failures: Vec<FailureDetail>,
    /// Ids returned by the server for created tickets, when it sent them.
    pub created_ticket_ids: Vec<u64>,
    /// True when cancellation stopped the run before the last row.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchRunResult {
    /// Wall-clock time between the start of the run and its end.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Human readable end-of-run report showing at most `failure_limit` failures.
    pub fn summary(&self, failure_limit: usize) -> String {
        let mut out = if self.cancelled {
            format!(
                "Processing interrupted after {} of {} tickets.\n\n",
                self.processed, self.total
            )
        } else {
            "Processing complete!\n\n".to_string()
        };

        out.push_str(&format!(
            "Tickets created: {}\nFailures: {}\nElapsed: {:.1}s",
            self.success_count,
            self.failure_count,
            self.elapsed().num_milliseconds() as f64 / 1000.0
        ));

        if !self.failures.is_empty() {
            out.push_str("\n\nError details:");
            for failure in self.failures.iter().take(failure_limit) {
                out.push('\n');
                out.push_str(&failure.to_string());
            }
            if self.failures.len() > failure_limit {
                out.push_str(&format!(
                    "\n... and {} more errors",
                    self.failures.len() - failure_limit
                ));
            }
        }

        out
    }
}
