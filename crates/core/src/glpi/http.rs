//! reqwest implementation of the GLPI REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::config::GlpiConfig;

use super::types::CreatedTicketResponse;
use super::{
    CreateTicketOutcome, InitSessionResponse, SessionContext, SessionError, TicketPayload,
    TicketingApi, TicketingError,
};

/// GLPI REST API client.
///
/// Holds one connection pool that verifies TLS certificates and one that does
/// not; each call picks the pool matching `SessionContext::verify_tls`.
pub struct GlpiHttpClient {
    verifying: Client,
    permissive: Client,
    /// Timeout for session start and ticket creation.
    timeout: Duration,
    /// Timeout for session teardown.
    kill_timeout: Duration,
}

impl GlpiHttpClient {
    /// Create a client using the timeouts from configuration.
    pub fn new(config: &GlpiConfig) -> Result<Self, TicketingError> {
        Self::with_timeouts(
            Duration::from_secs(config.timeout_secs as u64),
            Duration::from_secs(config.kill_timeout_secs as u64),
        )
    }

    pub fn with_timeouts(timeout: Duration, kill_timeout: Duration) -> Result<Self, TicketingError> {
        let verifying = Client::builder()
            .build()
            .map_err(|e| TicketingError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        let permissive = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| TicketingError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            verifying,
            permissive,
            timeout,
            kill_timeout,
        })
    }

    fn client(&self, session: &SessionContext) -> &Client {
        if session.verify_tls {
            &self.verifying
        } else {
            &self.permissive
        }
    }

    fn session_token(session: &SessionContext) -> Result<&str, TicketingError> {
        session
            .session_token
            .as_deref()
            .ok_or_else(|| TicketingError::Internal("No active session token".to_string()))
    }
}

#[async_trait]
impl TicketingApi for GlpiHttpClient {
    async fn init_session(&self, session: &SessionContext) -> Result<String, SessionError> {
        let url = session.endpoint("initSession");

        let response = self
            .client(session)
            .post(&url)
            .header("App-Token", &session.app_token)
            .header(AUTHORIZATION, format!("user_token {}", session.user_token))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(TicketingError::from)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status != StatusCode::OK {
            return Err(SessionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: InitSessionResponse = serde_json::from_str(&body)
            .map_err(|e| SessionError::InvalidResponse(e.to_string()))?;
        Ok(parsed.session_token)
    }

    async fn kill_session(&self, session: &SessionContext) -> Result<(), TicketingError> {
        let url = session.endpoint("killSession");
        let token = Self::session_token(session)?;

        let response = self
            .client(session)
            .post(&url)
            .header("App-Token", &session.app_token)
            .header("Session-Token", token)
            .timeout(self.kill_timeout)
            .send()
            .await?;

        debug!("killSession answered {}", response.status());
        Ok(())
    }

    async fn create_ticket(
        &self,
        session: &SessionContext,
        payload: &TicketPayload,
    ) -> Result<CreateTicketOutcome, TicketingError> {
        let url = session.endpoint("Ticket");
        let token = Self::session_token(session)?;

        // `json` sets Content-Type: application/json
        let response = self
            .client(session)
            .post(&url)
            .header("App-Token", &session.app_token)
            .header("Session-Token", token)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        info!("Response: {} - {}", status.as_u16(), body);

        if status == StatusCode::CREATED {
            let id = serde_json::from_str::<CreatedTicketResponse>(&body)
                .ok()
                .and_then(|r| r.id);
            Ok(CreateTicketOutcome::Created { id })
        } else {
            Ok(CreateTicketOutcome::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
