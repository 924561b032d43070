use std::sync::Arc;

use secrecy::SecretString;

use crate::forwarder::{Forwarder, TelegramForwarder};

/// Shared, read-only state behind the relay endpoints
pub struct TelegramState {
    forwarder: Arc<dyn Forwarder>,
    default_credential: Option<SecretString>,
}

impl TelegramState {
    pub fn new(forwarder: Arc<dyn Forwarder>, default_credential: Option<SecretString>) -> Self {
        Self {
            forwarder,
            default_credential,
        }
    }

    /// Build the state with the HTTPS forwarder described by configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the outbound HTTP client cannot be constructed
    pub fn from_config(config: &courier_config::TelegramConfig) -> anyhow::Result<Self> {
        let forwarder = TelegramForwarder::new(config.base_url.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to build Telegram HTTP client: {e}"))?;

        if config.bot_token.is_some() {
            tracing::debug!("default bot token configured");
        } else {
            tracing::warn!("no default bot token configured, requests must include bot_token");
        }

        Ok(Self::new(Arc::new(forwarder), config.bot_token.clone()))
    }

    pub fn forwarder(&self) -> &dyn Forwarder {
        self.forwarder.as_ref()
    }

    pub const fn default_credential(&self) -> Option<&SecretString> {
        self.default_credential.as_ref()
    }
}
