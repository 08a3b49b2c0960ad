//! Wire payload of the channel message send endpoint

use heyclaw_types::{ImageInfo, Message};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::format_for_heybox;

/// Message type of rich channel messages
pub const MSG_TYPE_CHANNEL: u32 = 10;

/// `addition` object; sent JSON-encoded inside a string field
#[derive(Debug, Serialize)]
struct ImageAddition<'a> {
    img_files_info: Vec<&'a ImageInfo>,
}

/// Body of a channel message send request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSendData {
    pub msg_type: u32,
    pub room_id: String,
    pub channel_id: String,
    pub heychat_ack_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<String>,
    /// Comma-joined mentioned user ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_user_id: Option<String>,
    /// JSON text of `{"img_files_info": [...]}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addition: Option<String>,
    pub msg: String,
}

impl MessageSendData {
    /// Assemble the payload for `message`.
    ///
    /// `message` must already have its local images uploaded; any left
    /// over are not part of the payload.
    pub fn build(
        room_id: &str,
        channel_id: &str,
        heychat_ack_id: String,
        reply_id: Option<&str>,
        message: &Message,
    ) -> Result<Self> {
        debug_assert!(
            !message.has_local_images(),
            "local images must be uploaded before building the payload"
        );

        let mentions: Vec<&str> = message.mentions().collect();
        let at_user_id = (!mentions.is_empty()).then(|| mentions.join(","));

        let images: Vec<&ImageInfo> = message.images().collect();
        let addition = if images.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&ImageAddition {
                img_files_info: images,
            })?)
        };

        Ok(Self {
            msg_type: MSG_TYPE_CHANNEL,
            room_id: room_id.to_string(),
            channel_id: channel_id.to_string(),
            heychat_ack_id,
            reply_id: reply_id.filter(|id| !id.is_empty()).map(str::to_string),
            at_user_id,
            addition,
            msg: format_for_heybox(&message.extract_content()),
        })
    }
}
