//! Registry mapping server error text to send failure kinds

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

use crate::error::SendFailureKind;

/// Error texts the platform is known to return for refused sends
const BUILTIN_MESSAGE_ERRORS: &[(&str, SendFailureKind)] = &[
    ("权限不足，无法发言", SendFailureKind::PermissionDenied),
    ("消息已发送，请勿重复发送", SendFailureKind::DuplicateMessage),
    ("请加入房间后再发送消息", SendFailureKind::RoomNotJoined),
    ("该频道为私密频道，无法发送消息", SendFailureKind::PrivateRoom),
];

static GLOBAL: OnceLock<Arc<ErrorRegistry>> = OnceLock::new();

/// Open mapping from exact server `msg` text to a failure kind
#[derive(Debug, Default)]
pub struct ErrorRegistry {
    /// server text → kind
    entries: RwLock<HashMap<String, SendFailureKind>>,
}

impl ErrorRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the platform's known error texts
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for (text, kind) in BUILTIN_MESSAGE_ERRORS {
            registry.register(*text, kind.clone());
        }
        registry
    }

    /// Process-wide registry, initialized with the defaults on first use
    pub fn global() -> Arc<ErrorRegistry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::with_defaults())))
    }

    /// Map `text` to `kind`. A later registration for the same text wins.
    pub fn register(&self, text: impl Into<String>, kind: SendFailureKind) {
        let text = text.into();
        debug!(%text, %kind, "Registering message error");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(text, kind);
    }

    /// Kind registered for `text`, or `Generic` when absent or unknown
    #[must_use]
    pub fn classify(&self, text: Option<&str>) -> SendFailureKind {
        let Some(text) = text else {
            return SendFailureKind::Generic;
        };

        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
            .cloned()
            .unwrap_or(SendFailureKind::Generic)
    }

    /// Number of registered texts
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Register `text` into the process-wide registry
pub fn register_message_error(text: impl Into<String>, kind: SendFailureKind) {
    ErrorRegistry::global().register(text, kind);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_texts() {
        let registry = ErrorRegistry::with_defaults();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.classify(Some("权限不足，无法发言")),
            SendFailureKind::PermissionDenied
        );
        assert_eq!(
            registry.classify(Some("消息已发送，请勿重复发送")),
            SendFailureKind::DuplicateMessage
        );
        assert_eq!(
            registry.classify(Some("请加入房间后再发送消息")),
            SendFailureKind::RoomNotJoined
        );
        assert_eq!(
            registry.classify(Some("该频道为私密频道，无法发送消息")),
            SendFailureKind::PrivateRoom
        );
    }

    #[test]
    fn test_unknown_or_missing_text_is_generic() {
        let registry = ErrorRegistry::with_defaults();
        assert_eq!(registry.classify(None), SendFailureKind::Generic);
        assert_eq!(
            registry.classify(Some("unknown text")),
            SendFailureKind::Generic
        );
        assert!(ErrorRegistry::new().is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = ErrorRegistry::new();
        registry.register("slow down", SendFailureKind::Custom("RateLimited".into()));
        registry.register("slow down", SendFailureKind::DuplicateMessage);

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.classify(Some("slow down")),
            SendFailureKind::DuplicateMessage
        );
    }

    #[test]
    fn test_global_registration() {
        register_message_error("频道已关闭", SendFailureKind::Custom("ChannelClosed".into()));
        assert_eq!(
            ErrorRegistry::global().classify(Some("频道已关闭")),
            SendFailureKind::Custom("ChannelClosed".into())
        );
        assert_eq!(
            ErrorRegistry::global().classify(Some("权限不足，无法发言")),
            SendFailureKind::PermissionDenied
        );
    }
}
