//! Storage for generated documents.
//!
//! A download only appears under its final name once it is complete. The
//! bytes are staged in a hidden `.part` file next to the target and renamed
//! over it, so a failed save never costs the previous download.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

const STAGING_PREFIX: &str = ".download-";
const STAGING_SUFFIX: &str = ".part";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory {} is unusable: {reason}", path.display())]
    DownloadDir { path: PathBuf, reason: String },
    #[error("could not save {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("saving {filename} was interrupted: {reason}")]
    Interrupted { filename: String, reason: String },
}

/// Creates the download directory if needed; fails if the path is something else.
pub fn prepare_download_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::DownloadDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(unusable("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| unusable(err.to_string()))
        }
        Err(err) => Err(unusable(err.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct DownloadStore {
    dir: PathBuf,
}

impl DownloadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Saves `bytes` as `{dir}/{filename}`, replacing an earlier download of
    /// the same name in a single rename.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        prepare_download_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let failed = |source: io::Error| PersistError::Write {
            path: target.clone(),
            source,
        };
        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&self.dir)
            .map_err(failed)?;
        staged.write_all(bytes).map_err(failed)?;
        staged.as_file().sync_all().map_err(failed)?;
        // On error the staged file is dropped and removed; the target is untouched.
        staged.persist(&target).map_err(|err| failed(err.error))?;
        Ok(target)
    }

    /// [`DownloadStore::save`] on the blocking pool, for callers on the runtime.
    pub async fn save_off_runtime(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<PathBuf, PersistError> {
        let store = self.clone();
        let name = filename.clone();
        tokio::task::spawn_blocking(move || store.save(&name, &bytes))
            .await
            .map_err(|err| PersistError::Interrupted {
                filename,
                reason: err.to_string(),
            })?
    }
}
