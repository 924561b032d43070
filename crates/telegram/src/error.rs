use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use courier_core::{ErrorBody, HttpError};
use thiserror::Error;

use crate::request::BODY_LIMIT_BYTES;

pub type Result<T> = std::result::Result<T, RelayError>;

/// Failure of a single outbound Bot API call
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The call never produced a usable response: connect failure, timeout,
    /// unreadable body, or a success body that is not JSON
    #[error("Request to Telegram API failed: {reason}")]
    Transport { reason: String },

    /// Telegram answered with a non-success status
    #[error("Telegram API error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl ProviderError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport { reason: reason.into() }
    }

    /// Status code returned by Telegram, when a response was received
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } => None,
            Self::Api { status, .. } => Some(*status),
        }
    }

    /// Metric label for this failure
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport_error",
            Self::Api { .. } => "api_error",
        }
    }
}

/// Errors returned by the relay endpoints
#[derive(Debug, Error)]
pub enum RelayError {
    /// Body absent, not JSON, not an object, or an empty object
    #[error("No data provided")]
    NoData,

    /// First required field missing from the body
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Neither the body nor the configuration supplied a bot token
    #[error("No bot token provided and TELEGRAM_BOT_TOKEN environment variable not set")]
    MissingCredential,

    /// Body token with characters that would change the outbound URL
    #[error("Invalid bot token format")]
    InvalidCredential,

    #[error("Request body is too large, limit is {} bytes", BODY_LIMIT_BYTES)]
    PayloadTooLarge,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl HttpError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoData | Self::MissingField(_) | Self::MissingCredential | Self::InvalidCredential => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from_error(&self))).into_response()
    }
}
