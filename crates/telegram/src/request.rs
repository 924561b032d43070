use axum::body::Body;
use courier_config::is_valid_bot_token;
use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::{error::RelayError, forwarder::OutboundRequest, operation::Operation};

/// Body key carrying a per-request bot token
pub const CREDENTIAL_FIELD: &str = "bot_token";

/// Body limit for relay requests (1 MiB)
pub const BODY_LIMIT_BYTES: usize = 1 << 20;

/// Extractor for the JSON object body of a relay request
///
/// Yields `None` when there is nothing usable to relay: an empty body,
/// invalid JSON, a non-object value, or an empty object. Content-Type is
/// not checked.
pub struct ExtractPayload(pub Option<Map<String, Value>>);

impl<S> axum::extract::FromRequest<S> for ExtractPayload
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let bytes = axum::body::to_bytes(request.into_body(), BODY_LIMIT_BYTES)
            .await
            .map_err(|err| {
                if std::error::Error::source(&err)
                    .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
                {
                    RelayError::PayloadTooLarge
                } else {
                    tracing::debug!("failed to read request body: {err}");
                    RelayError::NoData
                }
            })?;

        let payload = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) if !map.is_empty() => Some(map),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("request body is not JSON: {e}");
                None
            }
        };

        Ok(Self(payload))
    }
}

/// Validate a relay payload and turn it into the outbound call
///
/// Required fields are checked by key presence in declared order and the
/// first missing one is reported. A `bot_token` in the body is removed from
/// the forwarded parameters and takes precedence over `default_credential`;
/// when present it must be a non-empty string that cannot alter the URL.
pub fn prepare(
    operation: Operation,
    payload: Option<Map<String, Value>>,
    default_credential: Option<&SecretString>,
) -> Result<OutboundRequest, RelayError> {
    let mut parameters = payload.ok_or(RelayError::NoData)?;

    if let Some(field) = operation
        .required_fields()
        .iter()
        .copied()
        .find(|field| !parameters.contains_key(*field))
    {
        return Err(RelayError::MissingField(field));
    }

    let credential = match parameters.remove(CREDENTIAL_FIELD) {
        Some(Value::String(token)) if !token.is_empty() => {
            if !is_valid_bot_token(&token) {
                return Err(RelayError::InvalidCredential);
            }
            SecretString::from(token)
        }
        Some(_) => return Err(RelayError::MissingCredential),
        None => default_credential.cloned().ok_or(RelayError::MissingCredential)?,
    };

    Ok(OutboundRequest {
        method: operation.method(),
        credential,
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Option<Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn missing_payload_is_no_data() {
        let err = prepare(Operation::SendMessage, None, None).unwrap_err();
        assert!(matches!(err, RelayError::NoData));
    }

    #[test]
    fn reports_first_missing_field_in_order() {
        let err = prepare(Operation::SendPhoto, object(json!({"caption": "hi"})), None).unwrap_err();
        assert!(matches!(err, RelayError::MissingField("chat_id")));

        let err = prepare(Operation::SendPhoto, object(json!({"chat_id": 1})), None).unwrap_err();
        assert!(matches!(err, RelayError::MissingField("photo")));

        let err = prepare(Operation::SendDocument, object(json!({"chat_id": 1, "photo": "x"})), None).unwrap_err();
        assert!(matches!(err, RelayError::MissingField("document")));
    }

    #[test]
    fn null_value_counts_as_present() {
        let default = SecretString::from("1:default");
        let request = prepare(
            Operation::SendMessage,
            object(json!({"chat_id": null, "text": null})),
            Some(&default),
        )
        .unwrap();

        assert_eq!(request.parameters["chat_id"], Value::Null);
    }

    #[test]
    fn field_check_precedes_credential_check() {
        let err = prepare(Operation::SendMessage, object(json!({"bot_token": "1:a"})), None).unwrap_err();
        assert!(matches!(err, RelayError::MissingField("chat_id")));
    }

    #[test]
    fn body_token_is_extracted_and_removed() {
        let default = SecretString::from("1:default");
        let request = prepare(
            Operation::SendMessage,
            object(json!({"bot_token": "2:body", "chat_id": 42, "text": "hi", "parse_mode": "HTML"})),
            Some(&default),
        )
        .unwrap();

        assert_eq!(request.method, "sendMessage");
        assert_eq!(request.credential.expose_secret(), "2:body");
        assert!(!request.parameters.contains_key(CREDENTIAL_FIELD));
        assert_eq!(
            Value::Object(request.parameters),
            json!({"chat_id": 42, "text": "hi", "parse_mode": "HTML"})
        );
    }

    #[test]
    fn falls_back_to_default_credential() {
        let default = SecretString::from("1:default");
        let request = prepare(
            Operation::SendDocument,
            object(json!({"chat_id": 42, "document": "https://example.com/a.pdf"})),
            Some(&default),
        )
        .unwrap();

        assert_eq!(request.method, "sendDocument");
        assert_eq!(request.credential.expose_secret(), "1:default");
    }

    #[test]
    fn no_credential_anywhere_is_rejected() {
        let err = prepare(Operation::SendMessage, object(json!({"chat_id": 1, "text": "hi"})), None).unwrap_err();
        assert!(matches!(err, RelayError::MissingCredential));
    }

    #[test]
    fn empty_or_non_string_body_token_does_not_fall_back() {
        let default = SecretString::from("1:default");

        for token in [json!(""), json!(null), json!(123)] {
            let err = prepare(
                Operation::SendMessage,
                object(json!({"chat_id": 1, "text": "hi", "bot_token": token})),
                Some(&default),
            )
            .unwrap_err();
            assert!(matches!(err, RelayError::MissingCredential));
        }
    }

    #[test]
    fn body_token_that_alters_url_is_rejected() {
        let default = SecretString::from("1:default");

        for token in ["1:x/deleteWebhook?", "1:x#frag", "1:x y", "../getMe"] {
            let err = prepare(
                Operation::SendMessage,
                object(json!({"chat_id": 1, "text": "hi", "bot_token": token})),
                Some(&default),
            )
            .unwrap_err();
            assert!(matches!(err, RelayError::InvalidCredential), "{token}");
        }
    }
}
