//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::metrics::{Histogram, Meter};

/// Instrumentation scope for every Courier meter
const METER_NAME: &str = "courier";

/// Meter from the global provider (no-op until an exporter is installed)
pub fn meter() -> Meter {
    opentelemetry::global::meter(METER_NAME)
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    let duration = start.elapsed().as_secs_f64();
    histogram.record(duration, attributes);
}

// Telegram Bot API metric names
pub const TELEGRAM_REQUEST_DURATION: &str = "telegram.request.duration";
pub const TELEGRAM_REQUEST_COUNT: &str = "telegram.request.count";
