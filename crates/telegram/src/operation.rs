/// Bot API operations exposed by the relay
///
/// Each operation maps to one provider method and a fixed, ordered list of
/// fields that must be present in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SendMessage,
    SendPhoto,
    SendDocument,
}

impl Operation {
    pub const ALL: [Self; 3] = [Self::SendMessage, Self::SendPhoto, Self::SendDocument];

    /// Bot API method name, also the last segment of the relay route
    pub const fn method(self) -> &'static str {
        match self {
            Self::SendMessage => "sendMessage",
            Self::SendPhoto => "sendPhoto",
            Self::SendDocument => "sendDocument",
        }
    }

    /// Required body fields, in the order they are checked
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::SendMessage => &["chat_id", "text"],
            Self::SendPhoto => &["chat_id", "photo"],
            Self::SendDocument => &["chat_id", "document"],
        }
    }

    /// Relay route for this operation
    pub fn path(self) -> String {
        format!("/api/telegram/{}", self.method())
    }
}
