//! Types produced by the row loader.

use std::fmt;

use thiserror::Error;

pub const COL_REQUESTER_ID: &str = "id_requerente";
pub const COL_TITLE: &str = "titulo";
pub const COL_DESCRIPTION: &str = "descricao";
pub const COL_CATEGORY_ID: &str = "id_categoria";
pub const COL_URGENCY: &str = "urgencia";
pub const COL_TYPE: &str = "tipo";

/// Urgency used when the column is absent or not an integer.
pub const DEFAULT_URGENCY: i64 = 3;
/// Ticket type used when the column is absent or not an integer (1 = incident).
pub const DEFAULT_TYPE: i64 = 1;

/// File-level loader failures.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8: {message}")]
    Encoding { path: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One validated CSV line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRequestRow {
    pub requester_id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    /// `urgencia` as written in the file, coerced by [`TicketRequestRow::urgency`].
    pub raw_urgency: Option<String>,
    /// `tipo` as written in the file, coerced by [`TicketRequestRow::ticket_type`].
    pub raw_type: Option<String>,
}

impl TicketRequestRow {
    pub fn urgency(&self) -> i64 {
        coerce(self.raw_urgency.as_deref(), DEFAULT_URGENCY)
    }

    pub fn ticket_type(&self) -> i64 {
        coerce(self.raw_type.as_deref(), DEFAULT_TYPE)
    }
}

fn coerce(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Why a data row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Required columns absent or empty, in column order.
    MissingFields(Vec<&'static str>),
    /// `id_requerente` or `id_categoria` is not a base-10 integer.
    NonNumericId { field: &'static str, value: String },
    /// The CSV reader could not decode the record.
    Malformed(String),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::MissingFields(fields) => {
                write!(f, "missing required fields ({})", fields.join(", "))
            }
            RejectionReason::NonNumericId { field, value } => {
                write!(f, "IDs must be numbers ({} = '{}')", field, value)
            }
            RejectionReason::Malformed(message) => write!(f, "unreadable row ({})", message),
        }
    }
}

/// A rejected data row and its 1-based position among the data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub position: usize,
    pub reason: RejectionReason,
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {} skipped: {}", self.position, self.reason)
    }
}

/// Result of loading one CSV file.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Accepted rows in file order.
    pub rows: Vec<TicketRequestRow>,
    pub rejected: Vec<RejectedRow>,
}

impl LoadReport {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Number of data rows seen (accepted + rejected).
    pub fn total_rows(&self) -> usize {
        self.rows.len() + self.rejected.len()
    }

    /// True when no row was accepted.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
