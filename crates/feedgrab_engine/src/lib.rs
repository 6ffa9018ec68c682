//! Feedgrab engine: transport, persistence and the sequential download loop.
mod decision;
mod engine;
mod http;
mod persist;
mod session;
mod transport;
mod types;

pub use decision::DecisionProvider;
pub use engine::{DownloadEngine, EngineConfig, RunError, RunReport};
pub use http::{ReqwestTransport, SignIn, TransportSettings};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use session::SessionStore;
pub use transport::{EventSink, ProgressObserver, Transport};
pub use types::{EngineEvent, Escalation, FailureKind, TransportError};
