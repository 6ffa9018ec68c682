use std::fmt;
use std::time::Duration;

use feedgrab_core::{EscalationDecision, MessageId, ProgressTick};

/// Status events surfaced while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    MessagesFetched {
        count: usize,
    },
    WindowOpened {
        message_id: MessageId,
    },
    WindowClosed {
        message_id: MessageId,
    },
    SystemFileSkipped {
        message_id: MessageId,
        file_name: String,
    },
    AlreadyDownloaded {
        message_id: MessageId,
        file_name: String,
    },
    AttemptStarted {
        message_id: MessageId,
        file_name: String,
        attempt: u32,
    },
    Progress {
        message_id: MessageId,
        tick: ProgressTick,
    },
    /// `retry_in` is `None` when the failure escalated to the operator; the
    /// engine still waits out the backoff delay before asking.
    AttemptFailed {
        message_id: MessageId,
        file_name: String,
        attempt: u32,
        error: TransportError,
        retry_in: Option<Duration>,
    },
    Escalated(Escalation),
    DecisionTaken {
        message_id: MessageId,
        decision: EscalationDecision,
    },
    Saved {
        message_id: MessageId,
        file_name: String,
        bytes: u64,
    },
    Skipped {
        message_id: MessageId,
        file_name: String,
    },
}

/// What the operator is told when a task stops retrying on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escalation {
    pub message_id: MessageId,
    pub file_name: String,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Unauthorized,
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Unauthorized => write!(f, "unauthorized"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
