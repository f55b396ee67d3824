//! Terminal error of a process creation.
//!
//! Every failure aborts the remaining steps and surfaces as exactly one
//! [`CaptureError`], tagged with the [`Phase`] that failed. Errors raised after
//! a successful upload carry the stored path of the file left on the server,
//! because nothing removes it.

use std::path::PathBuf;

use capture::{ApiError, RetryPolicy, StoredFilePath, SynthesisError, WorkflowId};
use thiserror::Error;

/// Step of process creation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Reading the local document.
    ReadFile,
    /// Uploading the document.
    Upload,
    /// Fetching the workflow definition.
    FetchWorkflow,
    /// Deriving the process from the workflow.
    Synthesize,
    /// Posting the process.
    Submit,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::ReadFile => "read-file",
            Phase::Upload => "upload",
            Phase::FetchWorkflow => "fetch-workflow",
            Phase::Synthesize => "synthesize",
            Phase::Submit => "submit",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`crate::CaptureGateway::create_process`].
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The local document could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    FileRead {
        /// Local path that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The upload call failed or returned no stored path.
    #[error("File upload failed: {source}")]
    FileUploadFailed {
        #[source]
        source: ApiError,
    },

    /// The workflow definition could not be fetched.
    #[error("Fetching workflow '{workflow_id}' failed: {source}")]
    WorkflowFetchFailed {
        /// Workflow that was requested.
        workflow_id: WorkflowId,
        /// Path of the already uploaded file, left on the server.
        stored_file_path: StoredFilePath,
        #[source]
        source: ApiError,
    },

    /// The workflow definition cannot spawn a process.
    #[error("Process synthesis failed: {source}")]
    Synthesis {
        /// Path of the already uploaded file, left on the server.
        stored_file_path: StoredFilePath,
        #[source]
        source: SynthesisError,
    },

    /// The synthesized process was rejected or the response was unusable.
    #[error("Process submit failed: {source}")]
    ProcessSubmitFailed {
        /// Path of the already uploaded file, left on the server.
        stored_file_path: StoredFilePath,
        #[source]
        source: ApiError,
    },
}

impl CaptureError {
    /// The step that failed.
    pub fn phase(&self) -> Phase {
        match self {
            CaptureError::FileRead { .. } => Phase::ReadFile,
            CaptureError::FileUploadFailed { .. } => Phase::Upload,
            CaptureError::WorkflowFetchFailed { .. } => Phase::FetchWorkflow,
            CaptureError::Synthesis { .. } => Phase::Synthesize,
            CaptureError::ProcessSubmitFailed { .. } => Phase::Submit,
        }
    }

    /// The remote service's diagnostic text, when a response carried one.
    pub fn remote_detail(&self) -> Option<&str> {
        self.api_error().and_then(ApiError::remote_detail)
    }

    /// The uploaded file that remains on the server after this failure.
    pub fn orphaned_file(&self) -> Option<&StoredFilePath> {
        match self {
            CaptureError::WorkflowFetchFailed {
                stored_file_path, ..
            }
            | CaptureError::Synthesis {
                stored_file_path, ..
            }
            | CaptureError::ProcessSubmitFailed {
                stored_file_path, ..
            } => Some(stored_file_path),
            CaptureError::FileRead { .. } | CaptureError::FileUploadFailed { .. } => None,
        }
    }

    /// Retry hint: remote failures may be retried, definition and local file
    /// problems may not.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self.api_error() {
            Some(api) => api.retry_policy(),
            None => RetryPolicy::NonRetryable,
        }
    }

    fn api_error(&self) -> Option<&ApiError> {
        match self {
            CaptureError::FileUploadFailed { source }
            | CaptureError::WorkflowFetchFailed { source, .. }
            | CaptureError::ProcessSubmitFailed { source, .. } => Some(source),
            CaptureError::FileRead { .. } | CaptureError::Synthesis { .. } => None,
        }
    }
}
