//! Text and request helpers
//!
//! Formatting rules for text sent to Heybox channels, plus request nonces.

use uuid::Uuid;

/// Line break marker understood by Heybox channel messages
pub const LINE_BREAK: &str = "<br>";

/// Format text for Heybox display: every `\n` becomes [`LINE_BREAK`]
pub fn format_for_heybox(text: &str) -> String {
    text.replace('\n', LINE_BREAK)
}

/// Fresh per-request nonce: 32 lowercase hex characters
pub fn gen_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}
