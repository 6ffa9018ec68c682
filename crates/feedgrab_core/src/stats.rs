/// Totals accumulated over one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStatistics {
    downloaded_count: u64,
    total_bytes: u64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successfully persisted item.
    pub fn record_success(&mut self, bytes: u64) {
        self.downloaded_count += 1;
        self.total_bytes += bytes;
    }

    pub fn downloaded_count(&self) -> u64 {
        self.downloaded_count
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
