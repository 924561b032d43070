use std::time::{Duration, Instant};

use async_trait::async_trait;
use courier_telemetry::{Counter, Histogram, KeyValue, metrics};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, value::RawValue};
use url::Url;

use crate::error::ProviderError;

/// Public Bot API endpoint
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Upper bound on one outbound call, connect through body read
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);

/// One outbound Bot API call
#[derive(Debug)]
pub struct OutboundRequest {
    /// Bot API method name (e.g. `sendMessage`)
    pub method: &'static str,
    /// Bot token, never empty at dispatch
    pub credential: SecretString,
    /// JSON body fields, without the `bot_token` key
    pub parameters: Map<String, Value>,
}

/// Performs the single outbound call behind each relay request
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Send `request` and return Telegram's JSON response untouched
    async fn forward(&self, request: OutboundRequest) -> Result<Box<RawValue>, ProviderError>;
}

/// Forwarder that posts to the Telegram Bot API over HTTPS
pub struct TelegramForwarder {
    client: Client,
    base_url: String,
    metrics: ForwardMetrics,
}

impl TelegramForwarder {
    /// Create a forwarder targeting `base_url`, or the public Bot API when `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(base_url: Option<&Url>) -> reqwest::Result<Self> {
        let base_url = base_url.map_or(DEFAULT_TELEGRAM_API_URL, Url::as_str);

        Ok(Self {
            client: crate::http_client::build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            metrics: ForwardMetrics::new(),
        })
    }

    /// `{base}/bot{token}/{method}`
    fn method_url(&self, method: &str, credential: &SecretString) -> String {
        format!("{}/bot{}/{method}", self.base_url, credential.expose_secret())
    }

    async fn send(&self, request: &OutboundRequest) -> Result<Box<RawValue>, ProviderError> {
        let response = self
            .client
            .post(self.method_url(request.method, &request.credential))
            .json(&request.parameters)
            .send()
            .await
            .map_err(|e| ProviderError::transport(describe(&e.without_url())))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::transport(describe(&e.without_url())))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::transport(format!("response body is not valid JSON: {e}")))
    }
}

#[async_trait]
impl Forwarder for TelegramForwarder {
    async fn forward(&self, request: OutboundRequest) -> Result<Box<RawValue>, ProviderError> {
        let start = Instant::now();

        tracing::debug!(
            method = request.method,
            fields = request.parameters.len(),
            "forwarding request to Telegram"
        );

        let result = self.send(&request).await;

        match &result {
            Ok(_) => tracing::debug!(method = request.method, "Telegram request succeeded"),
            Err(e) => tracing::error!(
                method = request.method,
                status = e.status_code(),
                "Telegram API request failed: {e}"
            ),
        }

        self.metrics.record(request.method, &result, start);

        result
    }
}

/// Human-readable failure reason without the request URL, which carries the token
fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return format!("request timed out after {}s", FORWARD_TIMEOUT.as_secs());
    }

    let mut reason = error.to_string();
    let mut source = std::error::Error::source(error);

    while let Some(inner) = source {
        reason.push_str(": ");
        reason.push_str(&inner.to_string());
        source = inner.source();
    }

    reason
}

struct ForwardMetrics {
    duration: Histogram<f64>,
    count: Counter<u64>,
}

impl ForwardMetrics {
    fn new() -> Self {
        let meter = metrics::meter();

        Self {
            duration: meter
                .f64_histogram(metrics::TELEGRAM_REQUEST_DURATION)
                .with_unit("s")
                .with_description("Duration of outbound Telegram Bot API calls")
                .build(),
            count: meter
                .u64_counter(metrics::TELEGRAM_REQUEST_COUNT)
                .with_description("Outbound Telegram Bot API calls")
                .build(),
        }
    }

    fn record(&self, method: &'static str, result: &Result<Box<RawValue>, ProviderError>, start: Instant) {
        let outcome = result.as_ref().map_or_else(ProviderError::outcome, |_| "success");
        let attributes = [KeyValue::new("method", method), KeyValue::new("outcome", outcome)];

        metrics::record_duration(&self.duration, start, &attributes);
        self.count.add(1, &attributes);
    }
}
