use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::{AnyOrArray, Config};

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "courier.toml";

/// Environment variable holding the process-wide default bot token
const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable overriding the listen port
const PORT_VAR: &str = "PORT";

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, applies
    /// environment overrides, then validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Config file to load: `path` when given, else `courier.toml` when it exists
    pub fn locate(path: Option<&Path>) -> Option<PathBuf> {
        path.map(Path::to_path_buf).or_else(|| {
            let fallback = Path::new(DEFAULT_CONFIG_PATH);
            fallback.is_file().then(|| fallback.to_path_buf())
        })
    }

    /// Load from `path` when given, else start from defaults
    ///
    /// Environment overrides and validation apply in both cases.
    ///
    /// # Errors
    ///
    /// Returns an error if the file fails to load or the resulting
    /// configuration is invalid
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration text after expanding environment placeholders
    ///
    /// # Errors
    ///
    /// Returns an error if expansion or TOML parsing fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))
    }

    /// Apply `TELEGRAM_BOT_TOKEN` and `PORT` from the process environment
    ///
    /// An empty `TELEGRAM_BOT_TOKEN` counts as unset. `PORT` replaces only the
    /// port of the listen address and keeps the configured host.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(token) = std::env::var(BOT_TOKEN_VAR)
            && !token.is_empty()
        {
            self.telegram.bot_token = Some(SecretString::from(token));
        }

        if let Ok(port) = std::env::var(PORT_VAR) {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {PORT_VAR} value `{port}`: {e}"))?;

            let mut address = self.server.listen_address();
            address.set_port(port);
            self.server.listen_address = Some(address);
        }

        Ok(())
    }

    /// Override the listen address (used by the `--listen` flag)
    pub const fn set_listen_address(&mut self, address: SocketAddr) {
        self.server.listen_address = Some(address);
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the Telegram section or telemetry settings are invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_telegram_config()?;
        self.validate_cors_config()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    fn validate_telegram_config(&self) -> anyhow::Result<()> {
        if let Some(ref base_url) = self.telegram.base_url
            && !matches!(base_url.scheme(), "http" | "https")
        {
            anyhow::bail!("telegram.base_url must use http or https, got `{}`", base_url.scheme());
        }

        if let Some(ref token) = self.telegram.bot_token {
            let token = token.expose_secret();
            if token.is_empty() {
                anyhow::bail!("telegram.bot_token must not be empty when set");
            }
            if !crate::telegram::is_valid_bot_token(token) {
                anyhow::bail!("telegram.bot_token may only contain ASCII letters, digits, ':', '_' and '-'");
            }
        }

        Ok(())
    }

    fn validate_cors_config(&self) -> anyhow::Result<()> {
        let cors = &self.server.cors;

        if cors.enabled
            && cors.credentials
            && [&cors.origins, &cors.methods, &cors.headers].contains(&&AnyOrArray::Any)
        {
            anyhow::bail!("server.cors.credentials requires explicit origins, methods and headers");
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        let sampling_rate = self
            .telemetry
            .as_ref()
            .and_then(|t| t.tracing.as_ref())
            .map(|t| t.sampling_rate);

        if let Some(rate) = sampling_rate
            && !(0.0..=1.0).contains(&rate)
        {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0, got {rate}");
        }

        Ok(())
    }
}
