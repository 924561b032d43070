use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Telegram Bot API relay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Default bot token used when a request does not carry its own `bot_token`
    #[serde(default)]
    pub bot_token: Option<SecretString>,
    /// Base URL override (defaults to `https://api.telegram.org`)
    #[serde(default)]
    pub base_url: Option<Url>,
}

/// Whether `token` is safe to place in a Bot API URL path segment
///
/// Bot tokens look like `123456:AA-bc_de`. Anything outside ASCII letters,
/// digits, `:`, `_` and `-` could rewrite the path, query, or fragment of
/// the outbound URL.
pub fn is_valid_bot_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b':' | b'_' | b'-'))
}
