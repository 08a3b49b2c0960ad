use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user message posted into a room channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserImMessageEvent {
    pub room_id: String,
    pub channel_id: String,
    /// Sequence number of the message, used as the reply id
    pub im_seq: String,
    pub user_id: String,
    pub msg_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A user joining or leaving a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomMemberEvent {
    pub room_id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Events delivered to the bot by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// User channel message
    UserImMessage(UserImMessageEvent),

    /// User joined a room
    RoomMemberJoin(RoomMemberEvent),

    /// User left a room
    RoomMemberLeave(RoomMemberEvent),

    /// Keep-alive from the platform
    Heartbeat,
}

/// Where a reply to an event has to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub room_id: String,
    pub channel_id: String,
    pub reply_id: String,
}

impl Event {
    /// Short name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserImMessage(_) => "user_im_message",
            Event::RoomMemberJoin(_) => "room_member_join",
            Event::RoomMemberLeave(_) => "room_member_leave",
            Event::Heartbeat => "heartbeat",
        }
    }

    /// Only channel messages carry an addressable room/channel location
    pub fn reply_target(&self) -> Option<ReplyTarget> {
        match self {
            Event::UserImMessage(msg) => Some(ReplyTarget {
                room_id: msg.room_id.clone(),
                channel_id: msg.channel_id.clone(),
                reply_id: msg.im_seq.clone(),
            }),
            _ => None,
        }
    }
}
