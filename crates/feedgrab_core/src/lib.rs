//! Feedgrab core: pure message-window selection, media classification,
//! filename derivation, retry arithmetic and the per-task state machine.
mod backoff;
mod classify;
mod filename;
mod message;
mod progress;
mod stats;
mod task;
mod window;

pub use backoff::RetryPolicy;
pub use classify::{classify, should_skip, Classification, SkipReason, FALLBACK_EXTENSION};
pub use filename::{channel_folder_name, resolve_filename, sanitize_text, MAX_TEXT_CHARS};
pub use message::{MediaAttribute, MediaItem, MediaKind, MediaRef, Message, MessageId};
pub use progress::{ProgressReporter, ProgressTick};
pub use stats::RunStatistics;
pub use task::{advance, DownloadTask, EscalationDecision, TaskEvent, TaskState};
pub use window::{select_window, Window, WindowError, WindowPhrases, WindowState};
