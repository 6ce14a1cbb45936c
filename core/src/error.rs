use serde::Deserialize;
use serde_json::Value;

/// Error envelope the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<Value>,
}

/// Normalized failure shape shared by the HTTP wrapper and the streaming
/// client. Cancellation is deliberately absent: a cancelled stream is not
/// an error and terminates silently.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Response received with an error status code.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        detail: Option<String>,
        /// 422 validation responses carry a structured field-error list,
        /// kept for diagnostics only.
        errors: Vec<Value>,
    },
    /// Request went out but no response came back.
    #[error("network error")]
    Network(#[source] reqwest::Error),
    /// The request could not be constructed or sent at all.
    #[error("{0}")]
    Request(String),
    /// The response body did not match the declared type.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    /// The event stream misbehaved at the transport or framing level.
    #[error("stream error: {0}")]
    Stream(String),
    /// The server reported a failure inside an event stream.
    #[error("{message}")]
    Generation { message: String, code: Option<u16> },
    /// A client-side invariant rejected the call before any network I/O.
    #[error("{0}")]
    Precondition(String),
}

impl ApiError {
    /// Classify an error-status response into the canned user-facing
    /// message table. `envelope` is whatever the backend sent alongside.
    pub fn from_status(status: u16, envelope: ErrorEnvelope) -> Self {
        let detail = envelope.detail.clone();
        let message = match status {
            400 => detail.clone().unwrap_or_else(|| "bad request".to_string()),
            401 => "unauthorized, please sign in".to_string(),
            403 => "you do not have permission to do that".to_string(),
            404 => detail
                .clone()
                .unwrap_or_else(|| "the requested resource does not exist".to_string()),
            422 => detail
                .clone()
                .unwrap_or_else(|| "request validation failed".to_string()),
            500 => detail
                .clone()
                .unwrap_or_else(|| "internal server error".to_string()),
            503 => "service temporarily unavailable, please retry later".to_string(),
            _ => detail
                .clone()
                .or(envelope.message.clone())
                .unwrap_or_else(|| format!("request failed ({status})")),
        };
        Self::Status {
            status,
            message,
            detail,
            errors: envelope.errors,
        }
    }

    /// The transient message shown to the user, one per failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Network(_) => "network error, please check your connection".to_string(),
            Self::Request(message) => message.clone(),
            Self::Decode(_) => "the server returned an unexpected response".to_string(),
            Self::Stream(_) => "the generation stream was interrupted".to_string(),
            Self::Generation { message, .. } => message.clone(),
            Self::Precondition(message) => message.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
