use std::io;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::persist::PersistError;

pub type AttemptId = u64;
pub type PageId = u64;

/// Shown when a failed run carries no usable error field.
pub const UNKNOWN_ERROR: &str = "Unknown error";
const NETWORK_ERROR: &str = "Network error";

/// Job phase as reported by `GET /api/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemotePhase {
    Idle,
    Fetching,
    Generating,
    Done,
    Error,
}

impl RemotePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RemotePhase::Done | RemotePhase::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusSnapshot {
    pub status: RemotePhase,
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionReport {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Body and suggested name of a successful run response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDownload {
    /// Name suggested by the backend.
    pub filename: String,
    /// Where the file landed; the name may be sanitized.
    pub path: PathBuf,
    pub byte_len: u64,
}

#[derive(Debug)]
pub enum EngineEvent {
    StatusPolled {
        attempt: AttemptId,
        snapshot: StatusSnapshot,
    },
    RunCompleted {
        attempt: AttemptId,
        result: Result<SavedDownload, BackendError>,
    },
    ConnectionTested {
        page: PageId,
        service: String,
        result: Result<ConnectionReport, BackendError>,
    },
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("{message}")]
    Application { status: u16, message: String },
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("could not read template: {0}")]
    Template(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl BackendError {
    /// Text for the Run panel's error line.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Application { message, .. } => message.clone(),
            other => {
                let text = other.to_string();
                if text.trim().is_empty() {
                    NETWORK_ERROR.to_string()
                } else {
                    text
                }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build http client: {0}")]
    Backend(#[from] BackendError),
}
