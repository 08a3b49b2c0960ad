//! Heybox bot: message sending and image upload

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use heyclaw_types::{Event, Message, Segment};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ApiConfig, BotInfo};
use crate::error::{FailedResponse, HeyboxError, Result};
use crate::payload::MessageSendData;
use crate::registry::ErrorRegistry;
use crate::response::classify_response;
use crate::transport::{FilePart, HttpRequest, HttpResponse, Transport};
use crate::utils::gen_nonce;

/// Per-bot acknowledgment id sequence: 0, 1, ..., 99999, 0, ...
#[derive(Debug, Default)]
pub struct AckCounter {
    /// Id handed out by the next call
    next: AtomicU32,
}

impl AckCounter {
    /// Largest id before wrapping to 0
    pub const MAX: u32 = 99_999;

    /// Counter whose first id is 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next id. Safe to call from concurrent sends.
    pub fn next_id(&self) -> String {
        let id = self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(if current >= Self::MAX { 0 } else { current + 1 })
            })
            .unwrap_or_else(|current| current);
        id.to_string()
    }
}

/// A bot account able to send messages to Heybox channels
pub struct HeyboxBot<T> {
    info: BotInfo,
    api: ApiConfig,
    transport: T,
    ack: AckCounter,
    errors: Arc<ErrorRegistry>,
}

impl<T: Transport> HeyboxBot<T> {
    /// Create a bot using the process-wide error registry
    pub fn new(info: BotInfo, api: ApiConfig, transport: T) -> Self {
        info!(bot_id = %info.bot_id, "Heybox bot initialized");
        Self {
            info,
            api,
            transport,
            ack: AckCounter::new(),
            errors: ErrorRegistry::global(),
        }
    }

    /// Classify send failures with `registry` instead of the global one
    #[must_use]
    pub fn with_error_registry(mut self, registry: Arc<ErrorRegistry>) -> Self {
        self.errors = registry;
        self
    }

    /// Bot identity and credential
    pub fn info(&self) -> &BotInfo {
        &self.info
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run a request through the transport; no response at all is a network error
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.execute(request).await.map_err(|e| {
            warn!(error = %e, "Heybox request failed");
            HeyboxError::Network(format!("API request failed, {e}"))
        })
    }

    async fn request(&self, request: HttpRequest) -> Result<Value> {
        let response = self.execute(request).await?;
        classify_response(&response, &self.errors)
    }

    /// Upload image bytes and return the hosted URL
    pub async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        debug!(filename, size = bytes.len(), "Uploading image");

        let request = HttpRequest::post(&self.api.upload_url)
            .header("token", &self.info.token)
            .file(FilePart {
                name: "file".to_string(),
                filename: filename.to_string(),
                bytes,
                mime: None,
            });

        let response = self.execute(request).await?;
        let body = classify_response(&response, &self.errors)?;

        match body.pointer("/result/url").and_then(Value::as_str) {
            Some(url) => {
                debug!(filename, url, "Image uploaded");
                Ok(url.to_string())
            }
            None => {
                warn!(filename, "Upload response has no result.url");
                Err(HeyboxError::ActionFailed(FailedResponse {
                    status_code: response.status_code,
                    body: Some(body),
                }))
            }
        }
    }

    /// Replace every local image with a hosted one, uploading in segment order.
    ///
    /// The first failed upload aborts the whole resolution.
    pub async fn resolve_images(&self, message: Message) -> Result<Message> {
        if !message.has_local_images() {
            return Ok(message);
        }

        let mut resolved = Vec::with_capacity(message.len());
        for segment in message {
            match segment {
                Segment::LocalImage {
                    bytes,
                    filename,
                    width,
                    height,
                } => {
                    let url = self.upload_image(bytes, &filename).await?;
                    resolved.push(Segment::image(url, width, height));
                }
                other => resolved.push(other),
            }
        }

        Ok(resolved.into())
    }

    /// Post an assembled payload to the channel message endpoint
    pub async fn send_channel_msg(&self, data: &MessageSendData) -> Result<Value> {
        let request = HttpRequest::post(&self.api.send_url)
            .query("chat_os_type", "bot")
            .query("chat_version", &self.api.chat_version)
            .query("nonce", gen_nonce())
            .header("token", &self.info.token)
            .json(serde_json::to_value(data)?);

        self.request(request).await
    }

    /// Send `message` to a room channel, optionally as a reply.
    ///
    /// Local images are uploaded first; if any upload fails nothing is sent.
    pub async fn send_to_channel(
        &self,
        room_id: &str,
        channel_id: &str,
        message: impl Into<Message>,
        reply_id: Option<&str>,
    ) -> Result<Value> {
        let message = self.resolve_images(message.into()).await?;

        let ack_id = self.ack.next_id();
        let data = MessageSendData::build(room_id, channel_id, ack_id, reply_id, &message)?;

        info!(
            room_id,
            channel_id,
            ack_id = %data.heychat_ack_id,
            reply_id = ?data.reply_id,
            "Sending channel message"
        );
        debug!(payload = ?data, "Channel message payload");

        self.send_channel_msg(&data).await
    }

    /// Send `message` to where `event` happened.
    ///
    /// With `is_reply` the message quotes the event's message.
    /// Events without a room/channel location fail before any request.
    pub async fn send(
        &self,
        event: &Event,
        message: impl Into<Message>,
        is_reply: bool,
    ) -> Result<Value> {
        let Some(target) = event.reply_target() else {
            return Err(HeyboxError::EventNotRepliable {
                event: event.name().to_string(),
            });
        };

        let reply_id = is_reply.then_some(target.reply_id.as_str());
        self.send_to_channel(&target.room_id, &target.channel_id, message, reply_id)
            .await
    }
}
