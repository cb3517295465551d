use serde::Serialize;

/// The bare `{success, message}` envelope for responses with no payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
