use feedgrab_core::{classify, should_skip, Classification, MediaItem, MediaKind, SkipReason};
use pretty_assertions::assert_eq;

fn ext(item: &MediaItem) -> String {
    classify(item).extension
}

#[test]
fn photo_is_always_jpg_without_name() {
    let item = MediaItem::photo("p").with_file_name("snap.png");
    assert_eq!(
        classify(&item),
        Classification {
            extension: ".jpg".to_string(),
            original_file_name: None,
        }
    );
}

#[test]
fn video_prefers_file_name_suffix() {
    assert_eq!(ext(&MediaItem::video("v").with_file_name("Clip.MOV")), ".mov");
    assert_eq!(ext(&MediaItem::video("v").with_file_name("clip")), ".mp4");
    assert_eq!(ext(&MediaItem::video("v")), ".mp4");
}

#[test]
fn document_name_wins_over_mime() {
    let item = MediaItem::document("d")
        .with_mime_type("application/zip")
        .with_file_name("Report.PDF");
    let classified = classify(&item);
    assert_eq!(classified.extension, ".pdf");
    assert_eq!(classified.original_file_name.as_deref(), Some("Report.PDF"));
}

#[test]
fn document_falls_back_to_mime_then_dat() {
    assert_eq!(
        ext(&MediaItem::document("d").with_mime_type("application/pdf")),
        ".pdf"
    );
    assert_eq!(
        ext(&MediaItem::document("d").with_mime_type(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        )),
        ".docx"
    );
    assert_eq!(
        ext(&MediaItem::document("d").with_mime_type("application/msword")),
        ".doc"
    );
    assert_eq!(ext(&MediaItem::document("d").with_mime_type("image/png")), ".png");
    assert_eq!(ext(&MediaItem::document("d").with_mime_type("text/plain")), ".txt");
    assert_eq!(ext(&MediaItem::document("d")), ".dat");
    assert_eq!(
        ext(&MediaItem::document("d").with_mime_type("application/x-unknown")),
        ".dat"
    );
}

#[test]
fn document_skips_names_without_suffix() {
    let item = MediaItem::document("d")
        .with_file_name("README")
        .with_file_name("notes.TXT");
    assert_eq!(ext(&item), ".txt");
}

#[test]
fn unknown_kind_degrades_to_dat() {
    let item = MediaItem::new("x", MediaKind::Unknown).with_file_name("a.png");
    assert_eq!(ext(&item), ".dat");
}

#[test]
fn system_documents_are_skipped() {
    let item = MediaItem::document("d").with_file_name("Thumbs.db");
    assert_eq!(
        should_skip(&item),
        Some(SkipReason::SystemFile {
            file_name: "thumbs.db".to_string()
        })
    );
    assert!(should_skip(&MediaItem::document("d").with_file_name("debug.log")).is_some());
    assert!(should_skip(&MediaItem::document("d").with_file_name("report.pdf")).is_none());
    assert!(should_skip(&MediaItem::document("d")).is_none());
}

#[test]
fn only_documents_are_subject_to_skip_rules() {
    let item = MediaItem::video("v").with_file_name("capture.tmp");
    assert_eq!(should_skip(&item), None);
}
