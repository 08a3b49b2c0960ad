use serde::{Deserialize, Serialize};
use std::fmt;

/// A hosted image as the platform describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }
}

/// One typed unit of message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    Text {
        content: String,
    },
    Mention {
        user_id: String,
    },
    /// Image already hosted by the platform
    Image(ImageInfo),
    /// Raw image bytes that still have to be uploaded.
    /// Never serialized into an outbound payload.
    LocalImage {
        bytes: Vec<u8>,
        filename: String,
        width: u32,
        height: u32,
    },
}

impl Segment {
    pub fn text(content: impl Into<String>) -> Self {
        Segment::Text {
            content: content.into(),
        }
    }

    pub fn mention(user_id: impl Into<String>) -> Self {
        Segment::Mention {
            user_id: user_id.into(),
        }
    }

    pub fn image(url: impl Into<String>, width: u32, height: u32) -> Self {
        Segment::Image(ImageInfo::new(url, width, height))
    }

    pub fn local_image(
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Segment::LocalImage {
            bytes: bytes.into(),
            filename: filename.into(),
            width,
            height,
        }
    }

    /// Text this segment contributes to the plain-text projection
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Segment::Text { content } => Some(content),
            _ => None,
        }
    }

    pub fn is_local_image(&self) -> bool {
        matches!(self, Segment::LocalImage { .. })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Text { content } => f.write_str(content),
            Segment::Mention { user_id } => write!(f, "@{}", user_id),
            Segment::Image(_) | Segment::LocalImage { .. } => f.write_str("[image]"),
        }
    }
}

/// An ordered sequence of segments forming one logical message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message {
    segments: Vec<Segment>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, builder style
    pub fn push(mut self, segment: impl Into<Segment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenated text of all text segments, in order.
    ///
    /// Newlines are kept as-is; line-break markers are a wire concern.
    pub fn extract_content(&self) -> String {
        self.segments
            .iter()
            .filter_map(Segment::text_content)
            .collect()
    }

    /// User ids of all mention segments, in order
    pub fn mentions(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Mention { user_id } => Some(user_id.as_str()),
            _ => None,
        })
    }

    /// All hosted images, in order
    pub fn images(&self) -> impl Iterator<Item = &ImageInfo> + '_ {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Image(info) => Some(info),
            _ => None,
        })
    }

    pub fn has_local_images(&self) -> bool {
        self.segments.iter().any(Segment::is_local_image)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<&str> for Segment {
    fn from(text: &str) -> Self {
        Segment::text(text)
    }
}

impl From<String> for Segment {
    fn from(text: String) -> Self {
        Segment::text(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Segment::text(text).into()
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Segment::text(text).into()
    }
}

impl From<Segment> for Message {
    fn from(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl From<Vec<Segment>> for Message {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<Segment> for Message {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Extend<Segment> for Message {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.segments.extend(iter);
    }
}

impl IntoIterator for Message {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content_skips_non_text() {
        let message = Message::new()
            .push("hello ")
            .push(Segment::mention("42"))
            .push(Segment::image("https://img/1.png", 10, 20))
            .push("world\nagain");
        assert_eq!(message.extract_content(), "hello world\nagain");
    }

    #[test]
    fn test_mentions_and_images_keep_order() {
        let message: Message = vec![
            Segment::image("a", 1, 1),
            Segment::text("x"),
            Segment::mention("u1"),
            Segment::image("b", 2, 2),
            Segment::mention("u2"),
        ]
        .into();

        let mentions: Vec<&str> = message.mentions().collect();
        assert_eq!(mentions, vec!["u1", "u2"]);

        let urls: Vec<&str> = message.images().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b"]);
    }

    #[test]
    fn test_normalization_from_str_and_segment() {
        let from_str: Message = "hi".into();
        assert_eq!(from_str.segments(), &[Segment::text("hi")]);

        let from_segment: Message = Segment::mention("7").into();
        assert_eq!(from_segment.len(), 1);
        assert!(!from_segment.is_empty());
    }

    #[test]
    fn test_has_local_images() {
        let message = Message::new()
            .push("pic")
            .push(Segment::local_image(vec![1, 2, 3], "a.png", 4, 5));
        assert!(message.has_local_images());
        assert!(!Message::from("plain").has_local_images());
    }

    #[test]
    fn test_display_rendering() {
        let message = Message::new()
            .push(Segment::mention("9"))
            .push(" look ")
            .push(Segment::image("u", 1, 1));
        assert_eq!(message.to_string(), "@9 look [image]");
    }

    #[test]
    fn test_segment_serde_shape() {
        let value = serde_json::to_value(Segment::mention("5")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "mention", "data": {"user_id": "5"}})
        );

        let image: Segment = serde_json::from_value(serde_json::json!({
            "type": "image",
            "data": {"url": "u", "width": 3, "height": 4}
        }))
        .unwrap();
        assert_eq!(image, Segment::image("u", 3, 4));
    }
}
