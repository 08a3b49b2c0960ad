//! Error types for Heybox API operations

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::transport::HttpResponse;

/// A non-successful API response, kept for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct FailedResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Decoded body, absent when the body was empty or not JSON
    pub body: Option<Value>,
}

impl FailedResponse {
    /// Capture a response; body decoding failures are swallowed
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let body = if response.body.is_empty() {
            None
        } else {
            serde_json::from_slice(&response.body).ok()
        };

        Self {
            status_code: response.status_code,
            body,
        }
    }

    /// The `msg` field of the body, if any
    #[must_use]
    pub fn msg(&self) -> Option<&str> {
        self.body.as_ref()?.get("msg")?.as_str()
    }
}

impl fmt::Display for FailedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.msg() {
            Some(msg) => write!(f, "<ActionFailed: {}, msg={}>", self.status_code, msg),
            None => write!(f, "<ActionFailed: {}>", self.status_code),
        }
    }
}

/// Named subtypes of a failed send, keyed by server error text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SendFailureKind {
    /// No registered text matched
    Generic,
    /// The bot may not speak in this channel
    PermissionDenied,
    /// Same ack id was already delivered
    DuplicateMessage,
    /// The bot has not joined the room
    RoomNotJoined,
    /// The channel is private
    PrivateRoom,
    /// Kind registered at runtime under a caller-chosen name
    Custom(String),
}

impl fmt::Display for SendFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => f.write_str("SendMessageFailed"),
            Self::PermissionDenied => f.write_str("PermissionDenied"),
            Self::DuplicateMessage => f.write_str("DuplicateMessage"),
            Self::RoomNotJoined => f.write_str("RoomNotJoined"),
            Self::PrivateRoom => f.write_str("PrivateRoom"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Failure taxonomy of the send path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response
    NetworkFailure,
    /// Non-2xx status or malformed success body
    ActionFailed,
    /// 2xx status but the body reported a failure
    SendMessageFailed(SendFailureKind),
}

/// Heybox adapter errors
#[derive(Debug, Error)]
pub enum HeyboxError {
    /// Transport-level error (connection, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP-level failure, or a success status with an unusable body
    #[error("Action failed: {0}")]
    ActionFailed(FailedResponse),

    /// The platform answered but refused the action
    #[error("Send message failed ({kind}): {response}")]
    SendMessage {
        /// Classified failure kind
        kind: SendFailureKind,
        /// Raw response
        response: FailedResponse,
    },

    /// Reply requested for an event without a reply location.
    /// A caller defect, raised before any request is made.
    #[error("Event cannot be replied to: {event}")]
    EventNotRepliable {
        /// Event name
        event: String,
    },

    /// Local payload encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HeyboxError {
    /// Position of this error in the send-path taxonomy.
    ///
    /// `None` for caller defects and local encoding errors.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Network(_) => Some(ErrorKind::NetworkFailure),
            Self::ActionFailed(_) => Some(ErrorKind::ActionFailed),
            Self::SendMessage { kind, .. } => Some(ErrorKind::SendMessageFailed(kind.clone())),
            Self::EventNotRepliable { .. } | Self::Json(_) => None,
        }
    }

    /// Response attached to action and send failures
    #[must_use]
    pub fn response(&self) -> Option<&FailedResponse> {
        match self {
            Self::ActionFailed(response) | Self::SendMessage { response, .. } => Some(response),
            _ => None,
        }
    }

    /// True when the error signals misuse of the API rather than a remote condition
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::EventNotRepliable { .. })
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, HeyboxError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn response(status_code: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status_code,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_failed_response_extracts_msg() {
        let failed = FailedResponse::from_response(&response(
            200,
            r#"{"status":"fail","msg":"nope"}"#,
        ));
        assert_eq!(failed.status_code, 200);
        assert_eq!(failed.msg(), Some("nope"));
        assert_eq!(failed.to_string(), "<ActionFailed: 200, msg=nope>");
    }

    #[test]
    fn test_failed_response_swallows_bad_body() {
        let failed = FailedResponse::from_response(&response(502, "<html>bad gateway</html>"));
        assert!(failed.body.is_none());
        assert!(failed.msg().is_none());
        assert_eq!(failed.to_string(), "<ActionFailed: 502>");

        let empty = FailedResponse::from_response(&response(500, ""));
        assert!(empty.body.is_none());
    }

    #[test]
    fn test_kind_projection() {
        let failed = FailedResponse {
            status_code: 200,
            body: None,
        };

        assert_eq!(
            HeyboxError::Network("refused".into()).kind(),
            Some(ErrorKind::NetworkFailure)
        );
        assert_eq!(
            HeyboxError::ActionFailed(failed.clone()).kind(),
            Some(ErrorKind::ActionFailed)
        );
        assert_eq!(
            HeyboxError::SendMessage {
                kind: SendFailureKind::PrivateRoom,
                response: failed,
            }
            .kind(),
            Some(ErrorKind::SendMessageFailed(SendFailureKind::PrivateRoom))
        );

        let misuse = HeyboxError::EventNotRepliable {
            event: "heartbeat".into(),
        };
        assert!(misuse.kind().is_none());
        assert!(misuse.is_contract_violation());
        assert!(misuse.response().is_none());
    }
}
