use std::time::{Duration, Instant};

/// One coalesced progress update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTick {
    pub percent: u8,
    pub downloaded: u64,
    pub total: u64,
    /// Average since the transfer started.
    pub bytes_per_sec: f64,
}

/// Throttles raw `(downloaded, total)` samples into percentage ticks.
///
/// A tick is produced when the rounded percentage has advanced by at least
/// `granularity` points since the last tick, or on first reaching 100%.
/// Samples with an unknown (zero) total never produce a tick.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    granularity: u8,
    started: Instant,
    last_percent: u8,
    finished: bool,
}

impl ProgressReporter {
    pub fn new(granularity: u8, started: Instant) -> Self {
        Self {
            granularity: granularity.max(1),
            started,
            last_percent: 0,
            finished: false,
        }
    }

    pub fn observe(&mut self, downloaded: u64, total: u64, now: Instant) -> Option<ProgressTick> {
        if total == 0 || self.finished {
            return None;
        }
        let ratio = (downloaded as f64 / total as f64).clamp(0.0, 1.0);
        let percent = (ratio * 100.0).round() as u8;
        let crossed = percent >= self.last_percent.saturating_add(self.granularity);
        if !crossed && percent != 100 {
            return None;
        }
        self.last_percent = percent;
        self.finished = percent == 100;
        Some(ProgressTick {
            percent,
            downloaded,
            total,
            bytes_per_sec: throughput(downloaded, now.saturating_duration_since(self.started)),
        })
    }
}

fn throughput(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        bytes as f64 / secs
    } else {
        0.0
    }
}
