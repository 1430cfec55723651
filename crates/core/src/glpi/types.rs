//! Types for GLPI API operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SessionContext;
use crate::loader::TicketRequestRow;

/// Errors from a single HTTP call against the API.
#[derive(Debug, Error)]
pub enum TicketingError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TicketingError {
    /// Whether the error came from the network rather than from local processing.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TicketingError::ConnectionFailed(_) | TicketingError::Timeout | TicketingError::Request(_)
        )
    }
}

impl From<reqwest::Error> for TicketingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TicketingError::Timeout
        } else if e.is_connect() {
            TicketingError::ConnectionFailed(e.to_string())
        } else if e.is_builder() {
            // Request could not be built locally (e.g. invalid header value)
            TicketingError::Internal(e.to_string())
        } else if e.is_decode() || e.is_body() {
            TicketingError::InvalidResponse(e.to_string())
        } else {
            TicketingError::Request(e.to_string())
        }
    }
}

/// Errors that make `initSession` fail.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("API URL cannot be empty")]
    MissingUrl,

    #[error("Error {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid session response: {0}")]
    InvalidResponse(String),

    #[error("Connection failure: {0}")]
    Transport(#[from] TicketingError),
}

/// Body of a successful `initSession` call.
#[derive(Debug, Deserialize)]
pub struct InitSessionResponse {
    pub session_token: String,
}

/// Body of a `POST /Ticket` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketPayload {
    pub input: TicketInput,
}

/// Ticket fields as named by the GLPI Ticket itemtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketInput {
    pub name: String,
    pub content: String,
    pub itilcategories_id: i64,
    #[serde(rename = "_users_id_requester")]
    pub users_id_requester: i64,
    pub urgency: i64,
    #[serde(rename = "type")]
    pub ticket_type: i64,
}

impl From<&TicketRequestRow> for TicketPayload {
    fn from(row: &TicketRequestRow) -> Self {
        Self {
            input: TicketInput {
                name: row.title.clone(),
                content: row.description.clone(),
                itilcategories_id: row.category_id,
                users_id_requester: row.requester_id,
                urgency: row.urgency(),
                ticket_type: row.ticket_type(),
            },
        }
    }
}

/// How the server answered a ticket creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateTicketOutcome {
    /// HTTP 201. `id` is the new ticket id when the body carried one.
    Created { id: Option<u64> },
    /// Any other status.
    Rejected { status: u16, body: String },
}

/// Body of a 201 response, parsed leniently.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedTicketResponse {
    #[serde(default)]
    pub id: Option<u64>,
}

/// Operations the batch needs from the ticketing system.
#[async_trait]
pub trait TicketingApi: Send + Sync {
    /// Open a session and return its token.
    async fn init_session(&self, session: &SessionContext) -> Result<String, SessionError>;

    /// Discard the session token held by `session`.
    async fn kill_session(&self, session: &SessionContext) -> Result<(), TicketingError>;

    /// Send one ticket creation request. Exactly one request per call, no retries.
    async fn create_ticket(
        &self,
        session: &SessionContext,
        payload: &TicketPayload,
    ) -> Result<CreateTicketOutcome, TicketingError>;
}
