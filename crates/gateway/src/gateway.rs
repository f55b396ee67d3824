//! The capture gateway: one call to create and enroll a process.

use std::sync::Arc;

use capture::{
    synthesize, ApiError, CaptureApi, ContainerId, Process, StoredFilePath, UploadFile,
    WorkflowId, WorkflowSnapshot,
};
use tracing::{info, instrument, warn};

use crate::error::CaptureError;
use crate::source::FileSource;

/// Result of the upload step.
#[derive(Debug)]
struct UploadedFile {
    stored_path: StoredFilePath,
}

/// Result of the fetch step, still tied to the uploaded file.
#[derive(Debug)]
struct FetchedWorkflow {
    uploaded: UploadedFile,
    workflow: WorkflowSnapshot,
}

/// Result of the synthesis step, ready for submission.
#[derive(Debug)]
struct SynthesizedProcess {
    uploaded: UploadedFile,
    process: Process,
}

/// Creates processes on the Capture API.
///
/// Holds only the shared [`CaptureApi`] handle, so it is cheap to clone and
/// safe to use from concurrent tasks. Each [`create_process`] call runs its
/// steps strictly in order:
///
/// 1. upload the document,
/// 2. fetch the workflow,
/// 3. synthesize the process,
/// 4. submit it and return the server's copy.
///
/// The first failure ends the call. Nothing is rolled back: a file uploaded in
/// step 1 stays on the server if a later step fails (see
/// [`CaptureError::orphaned_file`]). Dropping the returned future cancels at
/// the next await point with the same caveat. Timeouts belong to the
/// [`CaptureApi`] implementation; retries belong to the caller.
///
/// [`create_process`]: CaptureGateway::create_process
#[derive(Clone)]
pub struct CaptureGateway {
    api: Arc<dyn CaptureApi>,
}

impl CaptureGateway {
    /// Creates a gateway over the given API implementation.
    pub fn new(api: Arc<dyn CaptureApi>) -> Self {
        Self { api }
    }

    /// Uploads `file`, derives a process from `workflow_id`, and posts it into
    /// `container_id`.
    ///
    /// Returns the process as the server stored it, with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureError`] tagged with the failed phase. No partial
    /// process is ever returned.
    #[instrument(skip(self, file), fields(workflow_id = %workflow_id, container_id = %container_id))]
    pub async fn create_process(
        &self,
        workflow_id: &WorkflowId,
        container_id: ContainerId,
        file: FileSource,
    ) -> Result<Process, CaptureError> {
        let upload = file.load().await?;
        let uploaded = self.upload(&upload).await?;
        let fetched = self.fetch_workflow(workflow_id, container_id, uploaded).await?;
        let synthesized = synthesize_process(fetched)?;
        let process = self.submit(container_id, synthesized).await?;

        info!(process_id = %process.id, "process created");
        Ok(process)
    }

    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
    async fn upload(&self, upload: &UploadFile) -> Result<UploadedFile, CaptureError> {
        let paths = self
            .api
            .upload_file(upload)
            .await
            .map_err(|source| CaptureError::FileUploadFailed { source })?;

        let stored_path = paths
            .into_iter()
            .next()
            .and_then(StoredFilePath::new)
            .ok_or(CaptureError::FileUploadFailed {
                source: ApiError::EmptyUpload,
            })?;

        info!(stored_path = %stored_path, "file uploaded");
        Ok(UploadedFile { stored_path })
    }

    #[instrument(skip(self, uploaded))]
    async fn fetch_workflow(
        &self,
        workflow_id: &WorkflowId,
        container_id: ContainerId,
        uploaded: UploadedFile,
    ) -> Result<FetchedWorkflow, CaptureError> {
        match self.api.get_workflow(workflow_id, container_id).await {
            Ok(workflow) => Ok(FetchedWorkflow { uploaded, workflow }),
            Err(source) => {
                warn!(
                    orphaned_file = %uploaded.stored_path,
                    "workflow fetch failed after upload"
                );
                Err(CaptureError::WorkflowFetchFailed {
                    workflow_id: workflow_id.clone(),
                    stored_file_path: uploaded.stored_path,
                    source,
                })
            }
        }
    }

    #[instrument(skip(self, synthesized))]
    async fn submit(
        &self,
        container_id: ContainerId,
        synthesized: SynthesizedProcess,
    ) -> Result<Process, CaptureError> {
        let SynthesizedProcess { uploaded, process } = synthesized;
        self.api
            .submit_process(container_id, &process)
            .await
            .map_err(|source| {
                warn!(orphaned_file = %uploaded.stored_path, "process submit failed after upload");
                CaptureError::ProcessSubmitFailed {
                    stored_file_path: uploaded.stored_path,
                    source,
                }
            })
    }
}

fn synthesize_process(fetched: FetchedWorkflow) -> Result<SynthesizedProcess, CaptureError> {
    let FetchedWorkflow { uploaded, workflow } = fetched;
    match synthesize(&workflow, &uploaded.stored_path) {
        Ok(process) => Ok(SynthesizedProcess { uploaded, process }),
        Err(source) => {
            warn!(
                orphaned_file = %uploaded.stored_path,
                error = %source,
                "workflow cannot spawn a process"
            );
            Err(CaptureError::Synthesis {
                stored_file_path: uploaded.stored_path,
                source,
            })
        }
    }
}
