use std::sync::Once;

use feedgrab_core::{
    select_window, MediaItem, Message, WindowError, WindowPhrases, WindowState,
};
use pretty_assertions::assert_eq;

const START: &str = "📌 how to instagram ankoor warikoo";
const STOP: &str = "complete ✅";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feedgrab_logging::initialize_for_tests);
}

fn phrases() -> WindowPhrases {
    WindowPhrases::new(START, STOP)
}

fn ids(messages: &[Message]) -> Vec<i64> {
    messages.iter().map(|m| m.id).collect()
}

#[test]
fn missing_start_phrase_is_an_error() {
    init_logging();
    let messages = vec![
        Message::new(1, "hello").with_media(MediaItem::photo("p1")),
        Message::new(2, "complete ✅"),
    ];
    let err = select_window(messages, phrases()).unwrap_err();
    assert_eq!(
        err,
        WindowError::StartPhraseNotFound {
            phrase: START.to_string()
        }
    );
}

#[test]
fn empty_feed_has_no_start() {
    init_logging();
    assert!(select_window(Vec::new(), phrases()).is_err());
}

#[test]
fn window_includes_start_and_excludes_stop() {
    init_logging();
    let messages = vec![
        Message::new(1, "intro"),
        Message::new(2, START).with_media(MediaItem::photo("p")),
        Message::new(3, "notes").with_media(MediaItem::document("d").with_file_name("report.pdf")),
        Message::new(4, STOP).with_media(MediaItem::video("v")),
        Message::new(5, "after").with_media(MediaItem::photo("p5")),
    ];
    let mut window = select_window(messages, phrases()).unwrap();
    assert_eq!(window.state(), WindowState::Searching);

    let selected: Vec<Message> = window.by_ref().collect();
    assert_eq!(ids(&selected), vec![2, 3]);
    assert_eq!(window.state(), WindowState::Stopped { closed_at: 4 });
    assert_eq!(window.next(), None);
}

#[test]
fn phrases_match_case_insensitively_as_substrings() {
    init_logging();
    let messages = vec![
        Message::new(10, "Today: 📌 HOW TO Instagram Ankoor Warikoo (part 1)"),
        Message::new(11, "body"),
        Message::new(12, "All COMPLETE ✅ now"),
    ];
    let selected: Vec<Message> = select_window(messages, phrases()).unwrap().collect();
    assert_eq!(ids(&selected), vec![10, 11]);
}

#[test]
fn start_message_that_also_stops_yields_nothing() {
    init_logging();
    let messages = vec![
        Message::new(1, format!("{START} {STOP}")).with_media(MediaItem::photo("p")),
        Message::new(2, "later").with_media(MediaItem::photo("p2")),
    ];
    let mut window = select_window(messages, phrases()).unwrap();
    assert_eq!(window.next(), None);
    assert_eq!(window.state(), WindowState::Stopped { closed_at: 1 });
}

#[test]
fn window_without_stop_runs_to_end() {
    init_logging();
    let messages = vec![
        Message::new(1, START),
        Message::new(2, "a"),
        Message::new(3, "b"),
    ];
    let mut window = select_window(messages, phrases()).unwrap();
    let selected: Vec<Message> = window.by_ref().collect();
    assert_eq!(ids(&selected), vec![1, 2, 3]);
    assert_eq!(window.state(), WindowState::Active { opened_at: 1 });
}

#[test]
fn only_first_start_opens_the_window() {
    init_logging();
    let messages = vec![
        Message::new(1, START),
        Message::new(2, STOP),
        Message::new(3, START),
        Message::new(4, "x"),
    ];
    let selected: Vec<Message> = select_window(messages, phrases()).unwrap().collect();
    assert_eq!(ids(&selected), vec![1]);
}
