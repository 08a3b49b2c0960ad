use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use heyclaw_types::{Message, Segment};
use std::path::PathBuf;
use std::str::FromStr;

/// Send messages to Heybox chat channels
#[derive(Debug, Parser)]
#[command(name = "heyclaw-gateway", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one message to a room channel
    Send(SendArgs),
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Target room id
    #[arg(long)]
    pub room: String,

    /// Target channel id
    #[arg(long)]
    pub channel: String,

    /// Message sequence number to reply to
    #[arg(long)]
    pub reply: Option<String>,

    /// User id to mention (repeatable)
    #[arg(long = "mention")]
    pub mentions: Vec<String>,

    /// Local image as PATH:WIDTHxHEIGHT (repeatable)
    #[arg(long = "image")]
    pub images: Vec<ImageArg>,

    /// Message text
    pub text: Vec<String>,
}

/// `--image` value
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArg {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl FromStr for ImageArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (path, size) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected PATH:WIDTHxHEIGHT, got '{s}'"))?;
        let (width, height) = size
            .split_once('x')
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{size}'"))?;

        Ok(Self {
            path: PathBuf::from(path),
            width: width.parse().map_err(|e| format!("bad width '{width}': {e}"))?,
            height: height
                .parse()
                .map_err(|e| format!("bad height '{height}': {e}"))?,
        })
    }
}

impl SendArgs {
    /// Mentions first, then the text, then the images
    pub async fn to_message(&self) -> Result<Message> {
        let mut message: Message = self.mentions.iter().map(Segment::mention).collect();

        if !self.text.is_empty() {
            let text = self.text.join(" ");
            let segment = if message.is_empty() {
                text
            } else {
                format!(" {text}")
            };
            message = message.push(segment);
        }

        for image in &self.images {
            let bytes = tokio::fs::read(&image.path)
                .await
                .with_context(|| format!("Failed to read image {}", image.path.display()))?;
            let filename = image
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            message = message.push(Segment::local_image(
                bytes,
                filename,
                image.width,
                image.height,
            ));
        }

        Ok(message)
    }
}
