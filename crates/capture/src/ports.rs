//! Port to the remote Capture API.
//!
//! The orchestration layer depends on [`CaptureApi`] only. The HTTP adapter in
//! `capture-http` implements it; tests implement it in memory.

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::process::Process;
use crate::workflow::WorkflowSnapshot;
use crate::{ContainerId, WorkflowId};

/// A document to upload, with the file name the remote store should record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Name sent as the multipart file name.
    pub file_name: String,
    /// Raw document content.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Creates an upload payload.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// The three remote calls needed to create a process.
///
/// Implementations hold only immutable configuration so one instance can serve
/// concurrent callers. They report every non-success response as
/// [`ApiError::Status`] with the body verbatim, and never retry.
#[async_trait]
pub trait CaptureApi: Send + Sync {
    /// Stores `file` on the server and returns the stored paths, in the
    /// server's order. May be empty; callers decide whether that is an error.
    async fn upload_file(&self, file: &UploadFile) -> Result<Vec<String>, ApiError>;

    /// Fetches the definition of `workflow_id` within `container_id`.
    async fn get_workflow(
        &self,
        workflow_id: &WorkflowId,
        container_id: ContainerId,
    ) -> Result<WorkflowSnapshot, ApiError>;

    /// Posts `process` into `container_id` and returns the server's copy.
    async fn submit_process(
        &self,
        container_id: ContainerId,
        process: &Process,
    ) -> Result<Process, ApiError>;
}
