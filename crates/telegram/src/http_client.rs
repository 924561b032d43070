use std::time::Duration;

use axum::http;
use reqwest::Client;

use crate::forwarder::FORWARD_TIMEOUT;

/// HTTP client shared by every outbound Bot API call
///
/// The whole request, connect through body read, is bounded by `FORWARD_TIMEOUT`.
pub fn build_http_client() -> reqwest::Result<Client> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .timeout(FORWARD_TIMEOUT)
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
        .build()
}
