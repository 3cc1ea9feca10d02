use std::path::{Component, Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, instrument};
use wedding_error::{storage::StorageError, StorageResult};

const STAGING_PREFIX: &str = ".upload-";
const MAX_EXTENSION_LEN: usize = 8;

fn io_error(action: &str, e: impl std::fmt::Display) -> StorageError {
    StorageError::MediaStore(format!("{action}: {e}"))
}

/// Directory holding uploaded gallery files under generated names.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error("Failed to create media directory", e))
    }

    /// Starts an upload. Bytes are written to a temporary file inside the media
    /// root so that `persist` is a rename on the same filesystem; the temporary
    /// file is removed if the staged upload is dropped.
    #[instrument(name = "stage-upload", skip(self))]
    pub fn stage(&self, original_name: Option<&str>, mime: &str) -> StorageResult<StagedUpload> {
        let extension = file_extension(original_name, mime);
        let temp = Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(&format!(".{extension}"))
            .tempfile_in(&self.root)
            .map_err(|e| io_error("Failed to create temp file", e))?;
        let file = File::from_std(
            temp.reopen()
                .map_err(|e| io_error("Failed to reopen temp file", e))?,
        );

        Ok(StagedUpload {
            temp,
            file,
            extension,
            root: self.root.clone(),
            size: 0,
        })
    }

    /// Absolute location of a stored file. Only bare file names are accepted.
    pub fn resolve(&self, file_name: &str) -> StorageResult<PathBuf> {
        if !is_plain_file_name(file_name) {
            return Err(StorageError::MediaStore(format!(
                "Invalid media file name: {file_name}"
            )));
        }
        Ok(self.root.join(file_name))
    }

    /// Removes a stored file, returning whether it existed.
    pub async fn remove(&self, file_name: &str) -> StorageResult<bool> {
        let path = self.resolve(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(file = file_name, "Removed media file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("Failed to remove media file", e)),
        }
    }
}

/// An upload being written. Call [`StagedUpload::persist`] to keep it.
pub struct StagedUpload {
    temp: NamedTempFile,
    file: File,
    extension: String,
    root: PathBuf,
    size: u64,
}

impl StagedUpload {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StorageResult<()> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| io_error("Failed to write upload", e))?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Flushes the upload and moves it to `{uuid}.{ext}`, returning that file name.
    pub async fn persist(mut self) -> StorageResult<String> {
        self.file
            .flush()
            .await
            .map_err(|e| io_error("Failed to flush upload", e))?;
        self.file
            .sync_all()
            .await
            .map_err(|e| io_error("Failed to sync upload", e))?;

        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), self.extension);
        self.temp
            .persist(self.root.join(&file_name))
            .map_err(|e| io_error("Failed to persist upload", e.error))?;
        Ok(file_name)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.starts_with('.')
        && !name.contains(['/', '\\'])
}

/// Lowercase alphanumeric extension taken from the uploaded name, else from the MIME subtype.
fn file_extension(original_name: Option<&str>, mime: &str) -> String {
    let clean = |raw: &str| {
        let ext = raw.trim().to_ascii_lowercase();
        (!ext.is_empty()
            && ext.len() <= MAX_EXTENSION_LEN
            && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
    };

    original_name
        .and_then(|n| Path::new(n).extension().and_then(|e| e.to_str()))
        .and_then(clean)
        .or_else(|| {
            mime.split('/')
                .nth(1)
                .map(|sub| sub.split(['+', ';']).next().unwrap_or(sub))
                .and_then(clean)
        })
        .unwrap_or_else(|| "bin".to_string())
}
