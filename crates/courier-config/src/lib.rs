#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telegram;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use loader::DEFAULT_CONFIG_PATH;
pub use server::*;
pub use telegram::*;
pub use telemetry::TelemetryConfig;

/// Top-level Courier configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Telegram Bot API relay configuration
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
