#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod forwarder;
mod http_client;
mod operation;
mod request;
mod state;
mod types;

use std::sync::Arc;

use axum::{Router, extract::State, routing::post};
use serde_json::{Map, Value};

pub use error::{ProviderError, RelayError, Result};
pub use forwarder::{DEFAULT_TELEGRAM_API_URL, FORWARD_TIMEOUT, Forwarder, OutboundRequest, TelegramForwarder};
pub use operation::Operation;
pub use request::{BODY_LIMIT_BYTES, CREDENTIAL_FIELD, ExtractPayload, prepare};
pub use state::TelegramState;
pub use types::ProviderResponse;

/// Build the relay state from configuration
pub fn build_state(config: &courier_config::Config) -> anyhow::Result<Arc<TelegramState>> {
    Ok(Arc::new(TelegramState::from_config(&config.telegram)?))
}

/// Create the endpoint router for the Telegram relay
pub fn endpoint_router() -> Router<Arc<TelegramState>> {
    Router::new()
        .route(&Operation::SendMessage.path(), post(send_message))
        .route(&Operation::SendPhoto.path(), post(send_photo))
        .route(&Operation::SendDocument.path(), post(send_document))
}

async fn send_message(
    State(state): State<Arc<TelegramState>>,
    ExtractPayload(payload): ExtractPayload,
) -> Result<ProviderResponse> {
    relay(&state, Operation::SendMessage, payload).await
}

async fn send_photo(
    State(state): State<Arc<TelegramState>>,
    ExtractPayload(payload): ExtractPayload,
) -> Result<ProviderResponse> {
    relay(&state, Operation::SendPhoto, payload).await
}

async fn send_document(
    State(state): State<Arc<TelegramState>>,
    ExtractPayload(payload): ExtractPayload,
) -> Result<ProviderResponse> {
    relay(&state, Operation::SendDocument, payload).await
}

/// Validate, resolve the bot token, forward, and relay the outcome
async fn relay(
    state: &TelegramState,
    operation: Operation,
    payload: Option<Map<String, Value>>,
) -> Result<ProviderResponse> {
    let request = prepare(operation, payload, state.default_credential()).inspect_err(|e| {
        tracing::debug!(method = operation.method(), "rejected relay request: {e}");
    })?;

    let response = state.forwarder().forward(request).await?;

    Ok(ProviderResponse(response))
}
