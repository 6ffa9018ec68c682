//! Message window selection.
//!
//! The window opens on the first message whose text contains the start phrase
//! and closes on the first later message whose text contains the stop phrase.
//! Matching is a case-insensitive substring test. The stop check runs before
//! a message is emitted, including on the start message itself: a message
//! carrying both phrases opens and immediately closes the window, so it yields
//! nothing.
use thiserror::Error;

use crate::{Message, MessageId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("start phrase {phrase:?} not found in any message")]
    StartPhraseNotFound { phrase: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPhrases {
    start: String,
    stop: String,
}

impl WindowPhrases {
    pub fn new(start: impl AsRef<str>, stop: impl AsRef<str>) -> Self {
        Self {
            start: start.as_ref().to_lowercase(),
            stop: stop.as_ref().to_lowercase(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn stop(&self) -> &str {
        &self.stop
    }

    fn matches_start(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.start)
    }

    fn matches_stop(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.stop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Searching,
    Active { opened_at: MessageId },
    Stopped { closed_at: MessageId },
}

/// Lazy, single-pass view over the in-window messages.
#[derive(Debug)]
pub struct Window<I> {
    messages: I,
    phrases: WindowPhrases,
    state: WindowState,
}

/// Select the window from a chronologically ordered message sequence.
///
/// Fails with [`WindowError::StartPhraseNotFound`] without yielding anything
/// when no message contains the start phrase.
pub fn select_window(
    messages: Vec<Message>,
    phrases: WindowPhrases,
) -> Result<Window<std::vec::IntoIter<Message>>, WindowError> {
    if !messages.iter().any(|msg| phrases.matches_start(&msg.text)) {
        return Err(WindowError::StartPhraseNotFound {
            phrase: phrases.start.clone(),
        });
    }
    Ok(Window {
        messages: messages.into_iter(),
        phrases,
        state: WindowState::Searching,
    })
}

impl<I> Window<I> {
    pub fn state(&self) -> WindowState {
        self.state
    }
}

impl<I: Iterator<Item = Message>> Iterator for Window<I> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        loop {
            match self.state {
                WindowState::Stopped { .. } => return None,
                WindowState::Searching => {
                    let message = self.messages.next()?;
                    if !self.phrases.matches_start(&message.text) {
                        continue;
                    }
                    self.state = WindowState::Active {
                        opened_at: message.id,
                    };
                    return self.admit(message);
                }
                WindowState::Active { .. } => {
                    let message = self.messages.next()?;
                    return self.admit(message);
                }
            }
        }
    }
}

impl<I> Window<I> {
    fn admit(&mut self, message: Message) -> Option<Message> {
        if self.phrases.matches_stop(&message.text) {
            self.state = WindowState::Stopped {
                closed_at: message.id,
            };
            return None;
        }
        Some(message)
    }
}
