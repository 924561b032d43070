//! Mock Telegram Bot API for integration tests
//!
//! Accepts `POST /bot{token}/{method}`, records every call and answers with
//! a scripted reply.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Scripted answer for every call
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with the given status and raw body
    Raw { status: u16, body: String },
    /// Sleep before answering with `{"ok":true,"result":true}`
    Stall(Duration),
}

/// One call observed by the mock
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Path after the leading slash, e.g. `bot123:abc/sendMessage`
    pub path: String,
    pub content_type: Option<String>,
    pub body: Value,
}

struct MockState {
    reply: Reply,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Mock Bot API server
pub struct MockTelegram {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockTelegram {
    /// Answer every call with `{"ok":true,"result":{"message_id":1}}`
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Reply::Raw {
            status: 200,
            body: r#"{"ok":true,"result":{"message_id":1}}"#.to_owned(),
        })
        .await
    }

    /// Answer every call with a Bot API style error
    pub async fn start_failing(status: u16, description: &str) -> anyhow::Result<Self> {
        Self::start_with(Reply::Raw {
            status,
            body: description.to_owned(),
        })
        .await
    }

    pub async fn start_with(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            calls: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/{*path}", routing::post(handle_call))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for `telegram.base_url`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }
}

impl Drop for MockTelegram {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_call(
    State(state): State<Arc<MockState>>,
    Path(path): Path<String>,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> Response {
    state.calls.lock().unwrap().push(RecordedCall {
        path,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match &state.reply {
        Reply::Raw { status, body } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, "application/json")], body.clone()).into_response()
        }
        Reply::Stall(delay) => {
            tokio::time::sleep(*delay).await;
            (
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"ok":true,"result":true}"#,
            )
                .into_response()
        }
    }
}

/// Base URL of a local port with nothing listening on it
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{addr}")
}
