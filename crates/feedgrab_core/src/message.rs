use serde::{Deserialize, Serialize};

/// Ordinal message identifier, monotonic with arrival order.
pub type MessageId = i64;

/// Opaque handle the transport uses to locate a media item's bytes.
pub type MediaRef = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub media: Option<MediaItem>,
}

impl Message {
    pub fn new(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            media: None,
        }
    }

    pub fn with_media(mut self, media: MediaItem) -> Self {
        self.media = Some(media);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    /// Anything the feed reports that this crate does not model.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MediaAttribute {
    FileName(String),
    MimeType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub reference: MediaRef,
    pub kind: MediaKind,
    #[serde(default)]
    pub attributes: Vec<MediaAttribute>,
}

impl MediaItem {
    pub fn new(reference: impl Into<MediaRef>, kind: MediaKind) -> Self {
        Self {
            reference: reference.into(),
            kind,
            attributes: Vec::new(),
        }
    }

    pub fn photo(reference: impl Into<MediaRef>) -> Self {
        Self::new(reference, MediaKind::Photo)
    }

    pub fn video(reference: impl Into<MediaRef>) -> Self {
        Self::new(reference, MediaKind::Video)
    }

    pub fn document(reference: impl Into<MediaRef>) -> Self {
        Self::new(reference, MediaKind::Document)
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(MediaAttribute::FileName(name.into()));
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.attributes.push(MediaAttribute::MimeType(mime.into()));
        self
    }

    /// File name attributes in declaration order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().filter_map(|attr| match attr {
            MediaAttribute::FileName(name) => Some(name.as_str()),
            MediaAttribute::MimeType(_) => None,
        })
    }

    /// First MIME type attribute, if any.
    pub fn mime_type(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attr| match attr {
            MediaAttribute::MimeType(mime) => Some(mime.as_str()),
            MediaAttribute::FileName(_) => None,
        })
    }
}
