use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use feedgrab_core::{
    advance, channel_folder_name, classify, resolve_filename, select_window, should_skip,
    DownloadTask, MessageId, ProgressReporter, RetryPolicy, RunStatistics, SkipReason, TaskEvent,
    TaskState, WindowError, WindowPhrases, WindowState,
};
use feedgrab_logging::{grab_debug, grab_info, grab_warn};

use crate::{
    ensure_output_dir, AtomicFileWriter, DecisionProvider, EngineEvent, Escalation, EventSink,
    FailureKind, PersistError, ProgressObserver, Transport, TransportError,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Channel folders are created below this directory.
    pub base_dir: PathBuf,
    pub start_phrase: String,
    pub stop_phrase: String,
    pub retry: RetryPolicy,
    /// Pause after every saved item.
    pub politeness_delay: Duration,
    /// Upper bound on a single transfer. `None` leaves it to the
    /// transport's own timeouts.
    pub attempt_timeout: Option<Duration>,
    /// Percentage points between progress events.
    pub progress_granularity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./downloads"),
            start_phrase: "📌 how to instagram ankoor warikoo".to_string(),
            stop_phrase: "complete ✅".to_string(),
            retry: RetryPolicy::default(),
            politeness_delay: Duration::from_secs(2),
            attempt_timeout: Some(Duration::from_secs(120)),
            progress_granularity: 5,
        }
    }
}

/// Result of a run that went through the whole window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub stats: RunStatistics,
    pub destination: PathBuf,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("start phrase {phrase:?} not found in any message")]
    StartPhraseNotFound { phrase: String },
    #[error("failed to fetch messages: {0}")]
    FetchMessages(TransportError),
    #[error("aborted by operator after {} downloads", .stats.downloaded_count())]
    OperatorAbort { stats: RunStatistics },
    #[error("filesystem error: {0}")]
    Filesystem(#[from] PersistError),
}

impl From<WindowError> for RunError {
    fn from(err: WindowError) -> Self {
        match err {
            WindowError::StartPhraseNotFound { phrase } => RunError::StartPhraseNotFound { phrase },
        }
    }
}

/// Sequential downloader: one transfer in flight, items in message order.
pub struct DownloadEngine {
    config: EngineConfig,
    transport: Arc<dyn Transport>,
    decisions: Arc<dyn DecisionProvider>,
    sink: Arc<dyn EventSink>,
}

impl DownloadEngine {
    pub fn new(
        config: EngineConfig,
        transport: Arc<dyn Transport>,
        decisions: Arc<dyn DecisionProvider>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            transport,
            decisions,
            sink,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch the latest `limit` messages of `channel` and download every
    /// media item inside the window.
    pub async fn run(&self, channel: &str, limit: usize) -> Result<RunReport, RunError> {
        let mut messages = self
            .transport
            .fetch_messages(channel, limit)
            .await
            .map_err(RunError::FetchMessages)?;
        self.sink.emit(EngineEvent::MessagesFetched {
            count: messages.len(),
        });
        messages.sort_by_key(|message| message.id);

        let phrases = WindowPhrases::new(&self.config.start_phrase, &self.config.stop_phrase);
        let mut window = select_window(messages, phrases)?;

        let destination = self.config.base_dir.join(channel_folder_name(channel));
        let writer = AtomicFileWriter::new(destination.clone());
        let mut stats = RunStatistics::new();
        let mut opened = false;

        for message in window.by_ref() {
            if !opened {
                opened = true;
                grab_info!("Window opened at message {}", message.id);
                self.sink.emit(EngineEvent::WindowOpened {
                    message_id: message.id,
                });
                ensure_output_dir(&destination)?;
            }

            let Some(media) = message.media else {
                continue;
            };
            if let Some(SkipReason::SystemFile { file_name }) = should_skip(&media) {
                self.sink.emit(EngineEvent::SystemFileSkipped {
                    message_id: message.id,
                    file_name,
                });
                continue;
            }

            let classification = classify(&media);
            let file_name = resolve_filename(message.id, &message.text, &classification.extension);
            let target = destination.join(&file_name);
            if target.try_exists().map_err(PersistError::Io)? {
                self.sink.emit(EngineEvent::AlreadyDownloaded {
                    message_id: message.id,
                    file_name,
                });
                continue;
            }

            let task = DownloadTask::new(message.id, file_name, target, media);
            match self.process(task, &writer, &mut stats).await? {
                TaskState::Aborted => {
                    grab_warn!("Run aborted by operator");
                    return Err(RunError::OperatorAbort { stats });
                }
                TaskState::Succeeded => tokio::time::sleep(self.config.politeness_delay).await,
                _ => {}
            }
        }

        if let WindowState::Stopped { closed_at } = window.state() {
            grab_info!("Window closed at message {}", closed_at);
            self.sink.emit(EngineEvent::WindowClosed {
                message_id: closed_at,
            });
        }

        Ok(RunReport { stats, destination })
    }

    /// Drive one task to a terminal state.
    async fn process(
        &self,
        mut task: DownloadTask,
        writer: &AtomicFileWriter,
        stats: &mut RunStatistics,
    ) -> Result<TaskState, RunError> {
        let policy = &self.config.retry;
        loop {
            advance(&mut task, TaskEvent::AttemptStarted, policy);
            let attempt = task.attempts();
            grab_debug!("Fetching {:?} (attempt {})", task.file_name, attempt);
            self.sink.emit(EngineEvent::AttemptStarted {
                message_id: task.message_id,
                file_name: task.file_name.clone(),
                attempt,
            });

            let error = match self.acquire(&task).await {
                Ok(bytes) => {
                    writer.write_new(&task.file_name, &bytes)?;
                    advance(&mut task, TaskEvent::AttemptSucceeded, policy);
                    let size = bytes.len() as u64;
                    stats.record_success(size);
                    self.sink.emit(EngineEvent::Saved {
                        message_id: task.message_id,
                        file_name: task.file_name.clone(),
                        bytes: size,
                    });
                    return Ok(TaskState::Succeeded);
                }
                Err(error) => error,
            };

            grab_warn!(
                "Attempt {} for {:?} failed: {}",
                attempt,
                task.file_name,
                error
            );
            let delay = policy.delay_for_attempt(attempt);
            if advance(&mut task, TaskEvent::AttemptFailed, policy) != TaskState::Escalated {
                self.sink.emit(EngineEvent::AttemptFailed {
                    message_id: task.message_id,
                    file_name: task.file_name.clone(),
                    attempt,
                    error,
                    retry_in: Some(delay),
                });
                tokio::time::sleep(delay).await;
                continue;
            }

            self.sink.emit(EngineEvent::AttemptFailed {
                message_id: task.message_id,
                file_name: task.file_name.clone(),
                attempt,
                error,
                retry_in: None,
            });
            tokio::time::sleep(delay).await;
            let escalation = Escalation {
                message_id: task.message_id,
                file_name: task.file_name.clone(),
                attempts: attempt,
            };
            self.sink.emit(EngineEvent::Escalated(escalation.clone()));
            let decision = self.decisions.decide(&escalation).await;
            self.sink.emit(EngineEvent::DecisionTaken {
                message_id: task.message_id,
                decision,
            });

            match advance(&mut task, TaskEvent::Decided(decision), policy) {
                TaskState::Skipped => {
                    self.sink.emit(EngineEvent::Skipped {
                        message_id: task.message_id,
                        file_name: task.file_name.clone(),
                    });
                    return Ok(TaskState::Skipped);
                }
                TaskState::Aborted => return Ok(TaskState::Aborted),
                _ => {}
            }
        }
    }

    async fn acquire(&self, task: &DownloadTask) -> Result<Vec<u8>, TransportError> {
        let observer = TaskProgress::new(
            task.message_id,
            self.config.progress_granularity,
            self.sink.as_ref(),
        );
        let fetch = self.transport.fetch_media(&task.media, &observer);
        match self.config.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
                TransportError::new(FailureKind::Timeout, format!("no response within {limit:?}"))
            })?,
            None => fetch.await,
        }
    }
}

/// Bridges raw transfer samples to throttled [`EngineEvent::Progress`] events.
struct TaskProgress<'a> {
    message_id: MessageId,
    reporter: Mutex<ProgressReporter>,
    sink: &'a dyn EventSink,
}

impl<'a> TaskProgress<'a> {
    fn new(message_id: MessageId, granularity: u8, sink: &'a dyn EventSink) -> Self {
        Self {
            message_id,
            reporter: Mutex::new(ProgressReporter::new(granularity, Instant::now())),
            sink,
        }
    }
}

impl ProgressObserver for TaskProgress<'_> {
    fn on_progress(&self, downloaded: u64, total: u64) {
        let tick = self
            .reporter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observe(downloaded, total, Instant::now());
        if let Some(tick) = tick {
            self.sink.emit(EngineEvent::Progress {
                message_id: self.message_id,
                tick,
            });
        }
    }
}
