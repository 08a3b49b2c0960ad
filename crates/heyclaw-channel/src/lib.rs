//! `HeyClaw` channel adapter
//!
//! Sends messages to Heybox chat channels over HTTP:
//!
//! - Normalizes text, mention and image segments into the platform payload
//! - Uploads local images before referencing them in a send
//! - Classifies every response into a success value or a typed error
//! - Maps server error text onto named failure kinds through an open registry

pub mod bot;
pub mod config;
pub mod error;
pub mod payload;
pub mod registry;
pub mod response;
pub mod transport;
pub mod utils;

pub use bot::{AckCounter, HeyboxBot};
pub use config::{ApiConfig, BotInfo};
pub use error::{ErrorKind, FailedResponse, HeyboxError, Result, SendFailureKind};
pub use payload::MessageSendData;
pub use registry::{register_message_error, ErrorRegistry};
pub use transport::{FilePart, HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub use heyclaw_types::{Event, ImageInfo, Message, Segment};
