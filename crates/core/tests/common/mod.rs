//! Common test utilities for HTTP-level testing.
//!
//! Provides an in-process fake GLPI REST API on an ephemeral port so the real
//! `GlpiHttpClient` can be exercised without external infrastructure.
//!
//! Ticket titles steer the fake server:
//! - containing `[slow]`: the answer is delayed by [`SLOW_RESPONSE`]
//! - containing `[reject]`: answered with 400 and a GLPI error body
//! - anything else: 201 with `{"id": n, "message": ""}`

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use glpi_batch_core::SessionContext;

pub const APP_TOKEN: &str = "fake-app-token";
pub const USER_TOKEN: &str = "fake-user-token";
pub const SESSION_TOKEN: &str = "fake-session-token";

/// How long `[slow]` tickets take to answer.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(2);

/// A request received by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub app_token: Option<String>,
    pub session_token: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct FakeState {
    /// Forced status for initSession (e.g. 403).
    init_status: Mutex<Option<u16>>,
    /// Answer killSession with 500.
    kill_fails: Mutex<bool>,
    tickets: Mutex<Vec<RecordedRequest>>,
    kills: Mutex<Vec<RecordedRequest>>,
}

/// Running fake GLPI server.
pub struct FakeGlpi {
    pub base_url: String,
    state: Arc<FakeState>,
    _server: JoinHandle<()>,
}

impl FakeGlpi {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route("/apirest.php/initSession", post(init_session))
            .route("/apirest.php/killSession", post(kill_session))
            .route("/apirest.php/Ticket", post(create_ticket))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake GLPI server");
        let addr = listener.local_addr().expect("No local address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake GLPI server failed");
        });

        Self {
            base_url: format!("http://{}/apirest.php", addr),
            state,
            _server: server,
        }
    }

    /// Unauthenticated session context pointing at this server.
    pub fn session(&self) -> SessionContext {
        SessionContext::new(&self.base_url, APP_TOKEN, USER_TOKEN)
    }

    pub fn force_init_status(&self, status: u16) {
        *self.state.init_status.lock().unwrap() = Some(status);
    }

    pub fn fail_kill_session(&self) {
        *self.state.kill_fails.lock().unwrap() = true;
    }

    pub fn tickets(&self) -> Vec<RecordedRequest> {
        self.state.tickets.lock().unwrap().clone()
    }

    pub fn kills(&self) -> Vec<RecordedRequest> {
        self.state.kills.lock().unwrap().clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn init_session(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    if let Some(status) = *state.init_status.lock().unwrap() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::FORBIDDEN);
        return (status, json!(["ERROR", "forced failure"]).to_string());
    }

    let app_ok = header(&headers, "app-token").as_deref() == Some(APP_TOKEN);
    let user_ok = header(&headers, "authorization") == Some(format!("user_token {}", USER_TOKEN));
    if !app_ok || !user_ok {
        return (
            StatusCode::UNAUTHORIZED,
            json!(["ERROR_GLPI_LOGIN_USER_TOKEN", "parameter user_token seems invalid"])
                .to_string(),
        );
    }

    (
        StatusCode::OK,
        json!({ "session_token": SESSION_TOKEN }).to_string(),
    )
}

async fn kill_session(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.kills.lock().unwrap().push(RecordedRequest {
        app_token: header(&headers, "app-token"),
        session_token: header(&headers, "session-token"),
        content_type: header(&headers, "content-type"),
        body: Value::Null,
    });

    if *state.kill_fails.lock().unwrap() {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string())
    } else {
        (StatusCode::OK, String::new())
    }
}

async fn create_ticket(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let title = body["input"]["name"].as_str().unwrap_or_default().to_string();
    let id = {
        let mut tickets = state.tickets.lock().unwrap();
        tickets.push(RecordedRequest {
            app_token: header(&headers, "app-token"),
            session_token: header(&headers, "session-token"),
            content_type: header(&headers, "content-type"),
            body: body.clone(),
        });
        tickets.len()
    };

    if header(&headers, "session-token").as_deref() != Some(SESSION_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            json!(["ERROR_SESSION_TOKEN_INVALID", "session_token seems invalid"]).to_string(),
        );
    }

    if title.contains("[slow]") {
        tokio::time::sleep(SLOW_RESPONSE).await;
    }

    if title.contains("[reject]") {
        return (
            StatusCode::BAD_REQUEST,
            json!(["ERROR_GLPI_ADD", "You don't have permission to perform this action."])
                .to_string(),
        );
    }

    (
        StatusCode::CREATED,
        json!({ "id": id, "message": "" }).to_string(),
    )
}
