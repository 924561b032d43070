use axum::response::{IntoResponse, Response};
use serde_json::value::RawValue;

/// Successful Bot API response, relayed byte-for-byte
pub struct ProviderResponse(pub Box<RawValue>);

impl IntoResponse for ProviderResponse {
    fn into_response(self) -> Response {
        let body: Box<str> = self.0.into();

        (
            [(http::header::CONTENT_TYPE, "application/json")],
            String::from(body),
        )
            .into_response()
    }
}
