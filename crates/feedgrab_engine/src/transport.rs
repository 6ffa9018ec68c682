use feedgrab_core::{MediaItem, Message};

use crate::{EngineEvent, TransportError};

/// Receives raw byte counts from an in-flight media transfer.
/// `total` is zero when the size is unknown.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, downloaded: u64, total: u64);
}

/// Receives status events from the engine.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Remote message feed. Session handling belongs to the implementation.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Most recent `limit` messages of a channel, newest first.
    async fn fetch_messages(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<Message>, TransportError>;

    async fn fetch_media(
        &self,
        media: &MediaItem,
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<u8>, TransportError>;
}
