//! Upload staging: local file selection, validation, and submission.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::api::{self, ApiError, DocumentBackend, UploadFile, UploadReceipt};
use crate::auth::SessionStore;

/// Shown when submitting with nothing selected.
pub const NO_FILES_MESSAGE: &str = "Please select one or more files.";
/// Shown when submitting without a signed-in user.
pub const NOT_SIGNED_IN_MESSAGE: &str = "No valid user ID found. Please log in again.";
/// Shown when the backend rejects an upload without saying why.
pub const UPLOAD_FAILED_MESSAGE: &str = "File upload failed";

/// Errors raised while staging or submitting an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{}", NO_FILES_MESSAGE)]
    NoFiles,

    #[error("{}", NOT_SIGNED_IN_MESSAGE)]
    NotSignedIn,

    /// An upload is already running.
    #[error("An upload is already in progress.")]
    Busy,

    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend answered with an error status.
    #[error("{0}")]
    Rejected(String),

    /// The request never completed.
    #[error("Upload failed: {0}")]
    Failed(String),
}

impl From<ApiError> for UploadError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Server { .. } => UploadError::Rejected(
                err.server_message()
                    .unwrap_or(UPLOAD_FAILED_MESSAGE)
                    .to_string(),
            ),
            other => UploadError::Failed(other.to_string()),
        }
    }
}

/// A file picked by the user, with where it came from.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    pub file: UploadFile,
}

/// Read a local file into an upload part, guessing its MIME type from the name.
pub async fn read_file(path: &Path) -> Result<StagedFile, UploadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(StagedFile {
        path: path.to_path_buf(),
        file: UploadFile::new(file_name, bytes),
    })
}

/// The upload selection.
#[derive(Debug, Default)]
pub struct Uploader {
    staged: Vec<StagedFile>,
    in_flight: bool,
}

impl Uploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight
    }

    pub fn total_bytes(&self) -> usize {
        self.staged.iter().map(|s| s.file.size()).sum()
    }

    /// Read `path` from disk and stage it. Re-adding the same path replaces it.
    pub async fn add_path(&mut self, path: impl AsRef<Path>) -> Result<&StagedFile, UploadError> {
        let staged = read_file(path.as_ref()).await?;
        Ok(self.stage(staged.path, staged.file))
    }

    /// Stage an already-loaded file.
    pub fn stage(&mut self, path: PathBuf, file: UploadFile) -> &StagedFile {
        self.staged.retain(|s| s.path != path);
        self.staged.push(StagedFile { path, file });
        let last = self.staged.len() - 1;
        &self.staged[last]
    }

    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        (index < self.staged.len()).then(|| self.staged.remove(index))
    }

    pub fn clear(&mut self) {
        self.staged.clear();
    }

    /// Validate the selection against the session without touching the network.
    ///
    /// Returns the user id and a copy of the files to send. Marks the upload as
    /// in flight; [`finish`](Self::finish) clears that.
    pub fn prepare(&mut self, session: &SessionStore) -> Result<(String, Vec<UploadFile>), UploadError> {
        if self.in_flight {
            return Err(UploadError::Busy);
        }
        if self.staged.is_empty() {
            return Err(UploadError::NoFiles);
        }
        let user_id = session.user_id().ok_or(UploadError::NotSignedIn)?;

        self.in_flight = true;
        let files = self.staged.iter().map(|s| s.file.clone()).collect();
        Ok((user_id, files))
    }

    /// Apply the backend's answer. The selection is cleared only on success.
    pub fn finish(&mut self, result: api::Result<UploadReceipt>) -> Result<UploadReceipt, UploadError> {
        self.in_flight = false;
        match result {
            Ok(receipt) => {
                info!(queued = receipt.queued.len(), "upload accepted");
                self.staged.clear();
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "upload failed");
                Err(e.into())
            }
        }
    }

    /// Validate, send, and apply in one go.
    pub async fn submit(
        &mut self,
        backend: &dyn DocumentBackend,
        session: &SessionStore,
    ) -> Result<UploadReceipt, UploadError> {
        let (user_id, files) = self.prepare(session)?;
        let result = backend.upload(&user_id, files).await;
        self.finish(result)
    }
}
