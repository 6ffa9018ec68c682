//! Media classification.
//!
//! Fixed precedence:
//! 1. photo: `.jpg`, no original name.
//! 2. video: suffix of the first file name attribute that has one, else `.mp4`.
//! 3. document: suffix of the first file name attribute that has one, else the
//!    MIME table, else `.dat`.
//! 4. anything else: `.dat`.
//!
//! Suffixes are lowercased. A name ending in a bare dot has no usable suffix.
use crate::{MediaItem, MediaKind};

pub const FALLBACK_EXTENSION: &str = ".dat";

const PHOTO_EXTENSION: &str = ".jpg";
const VIDEO_EXTENSION: &str = ".mp4";

/// Ordered MIME fragments; the first contained fragment wins.
const MIME_TABLE: &[(&str, &str)] = &[
    ("pdf", ".pdf"),
    ("zip", ".zip"),
    ("audio", ".mp3"),
    ("video/mp4", ".mp4"),
    ("video", ".mp4"),
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("text/plain", ".txt"),
    ("application/msword", ".doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".docx",
    ),
];

/// Lowercased file name fragments that mark disposable or system files.
const SKIP_PATTERNS: &[&str] = &[".ds_store", "thumbs.db", ".tmp", ".temp", ".cache", ".log"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Storage extension including the leading dot, always lowercase.
    pub extension: String,
    pub original_file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    SystemFile { file_name: String },
}

pub fn classify(item: &MediaItem) -> Classification {
    match item.kind {
        MediaKind::Photo => Classification {
            extension: PHOTO_EXTENSION.to_string(),
            original_file_name: None,
        },
        MediaKind::Video => Classification {
            extension: suffix_from_names(item).unwrap_or_else(|| VIDEO_EXTENSION.to_string()),
            original_file_name: first_file_name(item),
        },
        MediaKind::Document => {
            let extension = suffix_from_names(item)
                .or_else(|| item.mime_type().and_then(extension_for_mime))
                .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
            Classification {
                extension,
                original_file_name: first_file_name(item),
            }
        }
        MediaKind::Unknown => Classification {
            extension: FALLBACK_EXTENSION.to_string(),
            original_file_name: first_file_name(item),
        },
    }
}

/// Documents carrying a system or temporary file name are not downloaded.
pub fn should_skip(item: &MediaItem) -> Option<SkipReason> {
    if item.kind != MediaKind::Document {
        return None;
    }
    item.file_names().find_map(|name| {
        let lowered = name.to_lowercase();
        SKIP_PATTERNS
            .iter()
            .any(|pattern| lowered.contains(pattern))
            .then(|| SkipReason::SystemFile {
                file_name: lowered.clone(),
            })
    })
}

fn first_file_name(item: &MediaItem) -> Option<String> {
    item.file_names().next().map(ToOwned::to_owned)
}

fn suffix_from_names(item: &MediaItem) -> Option<String> {
    item.file_names().find_map(suffix_of)
}

fn suffix_of(name: &str) -> Option<String> {
    let (_, suffix) = name.rsplit_once('.')?;
    if suffix.is_empty() {
        return None;
    }
    Some(format!(".{}", suffix.to_lowercase()))
}

fn extension_for_mime(mime: &str) -> Option<String> {
    let mime = mime.to_lowercase();
    MIME_TABLE
        .iter()
        .find(|(fragment, _)| mime.contains(fragment))
        .map(|(_, ext)| (*ext).to_string())
}
