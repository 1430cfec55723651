//! Session context and the begin/end handshake.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::GlpiConfig;

use super::{SessionError, TicketingApi};

/// Connection capability passed to every API call.
///
/// The caller owns it; `begin` fills in `session_token` and `end` clears it.
#[derive(Clone, Default)]
pub struct SessionContext {
    pub base_url: String,
    pub app_token: String,
    pub user_token: String,
    pub session_token: Option<String>,
    pub verify_tls: bool,
}

impl SessionContext {
    pub fn new(
        base_url: impl Into<String>,
        app_token: impl Into<String>,
        user_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            app_token: app_token.into(),
            user_token: user_token.into(),
            session_token: None,
            verify_tls: false,
        }
    }

    /// Build an unauthenticated context from configuration.
    pub fn from_config(config: &GlpiConfig) -> Self {
        Self {
            verify_tls: config.verify_tls,
            ..Self::new(
                config.url.trim(),
                config.app_token.trim(),
                config.user_token.trim(),
            )
        }
    }

    /// Full URL of an API endpoint, ignoring any trailing slash on the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_token.is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("base_url", &self.base_url)
            .field("app_token", &"<redacted>")
            .field("user_token", &"<redacted>")
            .field("authenticated", &self.is_authenticated())
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// Open a session and store its token in `session`.
///
/// On any failure the context is left without a token.
pub async fn begin<A>(api: &A, session: &mut SessionContext) -> Result<(), SessionError>
where
    A: TicketingApi + ?Sized,
{
    session.session_token = None;

    if session.base_url.trim().is_empty() {
        return Err(SessionError::MissingUrl);
    }

    info!("Starting session at {}", session.endpoint("initSession"));
    match api.init_session(session).await {
        Ok(token) => {
            session.session_token = Some(token);
            info!("Session started");
            Ok(())
        }
        Err(e) => {
            warn!("Failed to start session: {}", e);
            Err(e)
        }
    }
}

/// Discard the session. Errors are ignored and the token is always cleared.
pub async fn end<A>(api: &A, session: &mut SessionContext)
where
    A: TicketingApi + ?Sized,
{
    if session.session_token.is_none() {
        return;
    }

    if let Err(e) = api.kill_session(session).await {
        debug!("Ignoring killSession failure: {}", e);
    }

    session.session_token = None;
    info!("Session ended");
}
