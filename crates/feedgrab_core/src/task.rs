use std::path::PathBuf;

use crate::{MediaItem, MessageId, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    InProgress,
    FailedRetrying,
    Escalated,
    Succeeded,
    Skipped,
    Aborted,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Skipped | TaskState::Aborted
        )
    }
}

/// Operator answer once a task has escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationDecision {
    Continue,
    Skip,
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    AttemptStarted,
    AttemptSucceeded,
    AttemptFailed,
    Decided(EscalationDecision),
}

/// One in-window media item that still has to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub message_id: MessageId,
    pub file_name: String,
    pub target: PathBuf,
    pub media: MediaItem,
    attempts: u32,
    consecutive_failures: u32,
    state: TaskState,
}

impl DownloadTask {
    pub fn new(message_id: MessageId, file_name: String, target: PathBuf, media: MediaItem) -> Self {
        Self {
            message_id,
            file_name,
            target,
            media,
            attempts: 0,
            consecutive_failures: 0,
            state: TaskState::Pending,
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Attempts started so far; never reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Failures since the last success. Once this reaches the escalation
    /// threshold, every further failure escalates again.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

/// Pure transition function: applies an event to a task and returns its new state.
///
/// Events that make no sense in the current state leave the task untouched.
pub fn advance(task: &mut DownloadTask, event: TaskEvent, policy: &RetryPolicy) -> TaskState {
    use TaskState::*;

    let next = match (task.state, event) {
        (Pending | FailedRetrying | InProgress, TaskEvent::AttemptStarted) => {
            task.attempts += 1;
            InProgress
        }
        (InProgress, TaskEvent::AttemptSucceeded) => Succeeded,
        (InProgress, TaskEvent::AttemptFailed) => {
            task.consecutive_failures += 1;
            if policy.should_escalate(task.consecutive_failures) {
                Escalated
            } else {
                FailedRetrying
            }
        }
        (Escalated, TaskEvent::Decided(decision)) => match decision {
            EscalationDecision::Continue => InProgress,
            EscalationDecision::Skip => Skipped,
            EscalationDecision::Abort => Aborted,
        },
        (state, _) => state,
    };
    task.state = next;
    next
}
