//! Where the document for a new process comes from.

use std::path::{Path, PathBuf};

use capture::UploadFile;

use crate::error::CaptureError;

/// The document to attach to a new process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// In-memory content with the file name to record on the server.
    Bytes {
        /// Name to record for the upload.
        file_name: String,
        /// Document content.
        bytes: Vec<u8>,
    },
    /// A local file; its final path component becomes the file name.
    Path(PathBuf),
}

impl FileSource {
    /// A source for content already in memory.
    pub fn bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        FileSource::Bytes {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// A source read from `path` when the process is created.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        FileSource::Path(path.into())
    }

    /// Resolves the source into an upload payload, reading from disk if needed.
    pub(crate) async fn load(self) -> Result<UploadFile, CaptureError> {
        match self {
            FileSource::Bytes { file_name, bytes } => Ok(UploadFile::new(file_name, bytes)),
            FileSource::Path(path) => {
                let file_name = file_name_of(&path)?;
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| CaptureError::FileRead {
                        path: path.clone(),
                        source,
                    })?;
                Ok(UploadFile::new(file_name, bytes))
            }
        }
    }
}

fn file_name_of(path: &Path) -> Result<String, CaptureError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CaptureError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path does not name a file",
            ),
        })
}
