//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use courier_config::{Config, CorsConfig, HealthConfig, ServerConfig, TelegramConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with no default bot token and no upstream override
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                    cors: CorsConfig::default(),
                },
                telegram: TelegramConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Point the relay at a mock Bot API
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.telegram.base_url = Some(base_url.parse().expect("valid URL"));
        self
    }

    /// Set the process-wide default bot token
    pub fn with_bot_token(mut self, token: &str) -> Self {
        self.config.telegram.bot_token = Some(SecretString::from(token));
        self
    }

    /// Serve health checks on a different path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = config;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
