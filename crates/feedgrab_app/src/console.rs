use std::io::{self, Write};
use std::path::Path;

use feedgrab_core::{EscalationDecision, ProgressTick, RunStatistics};
use feedgrab_engine::{EngineEvent, EventSink};
use humansize::{format_size, BINARY};

/// Renders engine events as status lines on stdout.
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: EngineEvent) {
        let mut out = io::stdout().lock();
        // Progress rewrites the current line until the transfer completes.
        let _ = match &event {
            EngineEvent::Progress { tick, .. } => {
                let end = if tick.percent == 100 { "\n" } else { "" };
                write!(out, "\r{}{}", progress_line(tick), end)
            }
            _ => writeln!(out, "{}", status_line(&event)),
        };
        let _ = out.flush();
    }
}

pub fn progress_line(tick: &ProgressTick) -> String {
    format!(
        "📊 {}% ({}/{}) - {}/s",
        tick.percent,
        format_size(tick.downloaded, BINARY),
        format_size(tick.total, BINARY),
        format_size(tick.bytes_per_sec as u64, BINARY),
    )
}

pub fn status_line(event: &EngineEvent) -> String {
    match event {
        EngineEvent::MessagesFetched { count } => format!("📥 Fetched {count} messages"),
        EngineEvent::WindowOpened { message_id } => {
            format!("✅ Start phrase found in message {message_id}, downloading")
        }
        EngineEvent::WindowClosed { message_id } => {
            format!("🛑 Stop phrase found in message {message_id}, done scanning")
        }
        EngineEvent::SystemFileSkipped { file_name, .. } => {
            format!("⏭️  Ignoring system file {file_name}")
        }
        EngineEvent::AlreadyDownloaded { file_name, .. } => {
            format!("⏭️  Already downloaded: {file_name}")
        }
        EngineEvent::AttemptStarted {
            file_name, attempt, ..
        } => format!("📥 Downloading \"{file_name}\" (attempt {attempt})"),
        EngineEvent::Progress { tick, .. } => progress_line(tick),
        EngineEvent::AttemptFailed {
            file_name,
            error,
            retry_in,
            ..
        } => match retry_in {
            Some(delay) => format!(
                "❌ \"{file_name}\" failed: {error}; retrying in {}s",
                delay.as_secs_f64().round()
            ),
            None => format!("❌ \"{file_name}\" failed: {error}"),
        },
        EngineEvent::Escalated(escalation) => format!(
            "⚠️  \"{}\" has failed {} times",
            escalation.file_name, escalation.attempts
        ),
        EngineEvent::DecisionTaken { decision, .. } => match decision {
            EscalationDecision::Continue => "🔄 Continuing to retry".to_string(),
            EscalationDecision::Skip => "⏭️  Skipping at operator request".to_string(),
            EscalationDecision::Abort => "👋 Exiting at operator request".to_string(),
        },
        EngineEvent::Saved {
            file_name, bytes, ..
        } => format!("✅ Saved {file_name} ({})", format_size(*bytes, BINARY)),
        EngineEvent::Skipped { file_name, .. } => format!("⏭️  Skipped {file_name}"),
    }
}

pub fn summary(stats: &RunStatistics, destination: &Path) -> String {
    let finished = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        "🎉 Finished at {finished}\n   • Files downloaded: {}\n   • Total size: {}\n   • Saved to: {}",
        stats.downloaded_count(),
        format_size(stats.total_bytes(), BINARY),
        destination.display(),
    )
}
