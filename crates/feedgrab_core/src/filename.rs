use crate::MessageId;

/// Sanitized message text is cut to this many characters.
pub const MAX_TEXT_CHARS: usize = 70;

const PDF_EXTENSION: &str = ".pdf";

/// Destination filename for a message's media.
///
/// PDFs are named after the message text alone (`file_<id>` when empty);
/// everything else is `<id>_<text or "file">`. The extension is appended only
/// when the stem does not already end with it, compared case-insensitively.
pub fn resolve_filename(message_id: MessageId, text: &str, extension: &str) -> String {
    let sanitized = sanitize_text(text);
    let stem = if extension.eq_ignore_ascii_case(PDF_EXTENSION) {
        let mut stem = if sanitized.is_empty() {
            format!("file_{message_id}")
        } else {
            sanitized
        };
        if is_reserved_windows_name(&stem) {
            stem.push('_');
        }
        stem
    } else {
        let body = if sanitized.is_empty() {
            "file"
        } else {
            sanitized.as_str()
        };
        format!("{message_id}_{body}")
    };
    append_extension(stem, extension)
}

/// Strip path-illegal characters, cut to [`MAX_TEXT_CHARS`], trim whitespace.
pub fn sanitize_text(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !is_forbidden(*c))
        .take(MAX_TEXT_CHARS)
        .collect();
    cleaned.trim().to_string()
}

/// Folder name for a channel: ASCII alphanumerics kept, everything else `_`.
pub fn channel_folder_name(channel: &str) -> String {
    channel
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn append_extension(stem: String, extension: &str) -> String {
    if ends_with_ignore_case(&stem, extension) {
        stem
    } else {
        format!("{stem}{extension}")
    }
}

fn ends_with_ignore_case(haystack: &str, suffix: &str) -> bool {
    haystack.len() >= suffix.len()
        && haystack.is_char_boundary(haystack.len() - suffix.len())
        && haystack[haystack.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_check_respects_char_boundaries() {
        assert!(!ends_with_ignore_case("é", ".pdf"));
        assert!(!ends_with_ignore_case("ab✅", ".p"));
        assert!(ends_with_ignore_case("Report.PDF", ".pdf"));
    }
}
