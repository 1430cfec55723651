//! Mock ticketing API for testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::glpi::{
    CreateTicketOutcome, SessionContext, SessionError, TicketPayload, TicketingApi,
    TicketingError,
};

/// Mock implementation of the TicketingApi trait.
///
/// Provides controllable behavior for testing:
/// - Script ticket creation outcomes in order (defaults to "created")
/// - Track sent payloads for assertions
/// - Simulate session failures and slow requests
#[derive(Debug)]
pub struct MockTicketingApi {
    /// Token returned by init_session.
    session_token: Arc<RwLock<String>>,
    /// If set, init_session answers with this status and body.
    init_failure: Arc<RwLock<Option<(u16, String)>>>,
    /// If set, the next kill_session fails with this error.
    kill_error: Arc<RwLock<Option<TicketingError>>>,
    /// Scripted create_ticket results, consumed front to back.
    outcomes: Arc<RwLock<VecDeque<Result<CreateTicketOutcome, TicketingError>>>>,
    /// Payloads received by create_ticket, in call order.
    tickets: Arc<RwLock<Vec<TicketPayload>>>,
    /// Delay applied to each create_ticket call.
    delay: Arc<RwLock<Option<Duration>>>,
    init_calls: Arc<RwLock<usize>>,
    kill_calls: Arc<RwLock<usize>>,
}

impl Default for MockTicketingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTicketingApi {
    pub fn new() -> Self {
        Self {
            session_token: Arc::new(RwLock::new("mock-session-token".to_string())),
            init_failure: Arc::new(RwLock::new(None)),
            kill_error: Arc::new(RwLock::new(None)),
            outcomes: Arc::new(RwLock::new(VecDeque::new())),
            tickets: Arc::new(RwLock::new(Vec::new())),
            delay: Arc::new(RwLock::new(None)),
            init_calls: Arc::new(RwLock::new(0)),
            kill_calls: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn set_session_token(&self, token: impl Into<String>) {
        *self.session_token.write().await = token.into();
    }

    /// Make init_session answer with a non-200 status.
    pub async fn fail_init_session(&self, status: u16, body: impl Into<String>) {
        *self.init_failure.write().await = Some((status, body.into()));
    }

    pub async fn fail_kill_session(&self, error: TicketingError) {
        *self.kill_error.write().await = Some(error);
    }

    /// Queue the result of a future create_ticket call.
    pub async fn push_outcome(&self, outcome: CreateTicketOutcome) {
        self.outcomes.write().await.push_back(Ok(outcome));
    }

    /// Queue a failure for a future create_ticket call.
    pub async fn push_error(&self, error: TicketingError) {
        self.outcomes.write().await.push_back(Err(error));
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Payloads sent so far, in order.
    pub async fn recorded_tickets(&self) -> Vec<TicketPayload> {
        self.tickets.read().await.clone()
    }

    pub async fn init_session_calls(&self) -> usize {
        *self.init_calls.read().await
    }

    pub async fn kill_session_calls(&self) -> usize {
        *self.kill_calls.read().await
    }
}

#[async_trait]
impl TicketingApi for MockTicketingApi {
    async fn init_session(&self, _session: &SessionContext) -> Result<String, SessionError> {
        *self.init_calls.write().await += 1;

        if let Some((status, body)) = self.init_failure.read().await.clone() {
            return Err(SessionError::Rejected { status, body });
        }
        Ok(self.session_token.read().await.clone())
    }

    async fn kill_session(&self, _session: &SessionContext) -> Result<(), TicketingError> {
        *self.kill_calls.write().await += 1;

        match self.kill_error.write().await.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn create_ticket(
        &self,
        _session: &SessionContext,
        payload: &TicketPayload,
    ) -> Result<CreateTicketOutcome, TicketingError> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let next_id = {
            let mut tickets = self.tickets.write().await;
            tickets.push(payload.clone());
            tickets.len() as u64
        };

        self.outcomes
            .write()
            .await
            .pop_front()
            .unwrap_or(Ok(CreateTicketOutcome::Created { id: Some(next_id) }))
    }
}
