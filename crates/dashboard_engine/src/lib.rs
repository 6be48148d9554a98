//! Dashboard engine: backend client, status polling and download persistence.
mod backend;
mod disposition;
mod engine;
mod persist;
mod poller;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend, DEFAULT_BASE_URL};
pub use disposition::{filename_from_disposition, sanitize_download_name, DEFAULT_DOWNLOAD_NAME};
pub use engine::{run_attempt, ChannelEventSink, EngineHandle, EngineSettings, EventSink};
pub use persist::{prepare_download_dir, DownloadStore, PersistError};
pub use poller::{poll_status, spawn_status_poller};
pub use types::{
    AttemptId, BackendError, ConnectionReport, EngineError, EngineEvent, PageId, RemotePhase,
    RunDownload, SavedDownload, StatusSnapshot, TemplateUpload, UNKNOWN_ERROR,
};
