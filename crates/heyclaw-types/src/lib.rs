//! HeyClaw Types - Core types for the HeyClaw chat adapter
//!
//! This crate defines the platform-agnostic message model and the inbound
//! event shapes the adapter can address replies to.

pub mod events;
pub mod message;

pub use events::{Event, ReplyTarget, RoomMemberEvent, UserImMessageEvent};
pub use message::{ImageInfo, Message, Segment};
