//! Error and retry-policy types for the Capture API domain.
//!
//! [`SynthesisError`] covers malformed workflow definitions discovered while
//! deriving a process. [`ApiError`] is the failure contract of the
//! [`crate::CaptureApi`] port; transport adapters map their own failures onto
//! it so the orchestration layer never sees transport types.
//!
//! [`RetryPolicy`] is a cross-cutting concern: any error type that participates
//! in retry decisions must be able to produce a [`RetryPolicy`].

use std::time::Duration;

use thiserror::Error;

use crate::{NodeId, WorkflowId};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Nothing in this workspace retries on its own; callers of the gateway read
/// this hint to build their own retry schedule.
///
/// - `Retryable` errors: non-success responses and transport failures.
/// - `NonRetryable` errors: malformed workflow definitions, undecodable
///   responses, unreadable local files.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried; the input has to be fixed first.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Synthesis errors
// ---------------------------------------------------------------------------

/// A workflow definition that cannot spawn a process.
///
/// All variants are fatal: the workflow has to be corrected on the remote
/// engine before a retry can succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// No node in the workflow graph has the initiator category.
    #[error("Workflow '{workflow_id}' has no initiator node")]
    MissingInitiatorNode {
        /// Workflow that was being synthesized from.
        workflow_id: WorkflowId,
    },

    /// More than one node claims the initiator category, so the entry point is
    /// ambiguous.
    #[error("Workflow '{workflow_id}' has {} initiator nodes", .nodes.len())]
    MultipleInitiatorNodes {
        /// Workflow that was being synthesized from.
        workflow_id: WorkflowId,
        /// Keys of every node with the initiator category.
        nodes: Vec<NodeId>,
    },

    /// The reserved `BatchID` property (id 0) is not declared by the workflow.
    #[error("Workflow '{workflow_id}' is missing the reserved BatchID property")]
    MissingBatchIdProperty {
        /// Workflow that was being synthesized from.
        workflow_id: WorkflowId,
    },

    /// The reserved `FilePath` property (id -1) is not declared by the workflow.
    #[error("Workflow '{workflow_id}' is missing the reserved FilePath property")]
    MissingFilePathProperty {
        /// Workflow that was being synthesized from.
        workflow_id: WorkflowId,
    },
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Failure of a single call through the [`crate::CaptureApi`] port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The remote service answered with a non-success status.
    ///
    /// `body` is the response body verbatim; the remote side has no structured
    /// error schema.
    #[error("Capture API responded with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
        /// Delay the service asked for through `Retry-After`, if any.
        retry_after: Option<Duration>,
    },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("Capture API request failed: {message}")]
    Transport {
        /// Transport-level description of the failure.
        message: String,
    },

    /// A success response carried a body that could not be decoded.
    #[error("Capture API response could not be decoded: {message}")]
    Decode {
        /// Decoder description of the failure.
        message: String,
    },

    /// The upload route succeeded but returned no stored file paths.
    #[error("Capture API accepted the upload but returned no stored file path")]
    EmptyUpload,
}

impl ApiError {
    /// Returns the remote diagnostic text, when the service sent one.
    pub fn remote_detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Retry hint for this failure.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            ApiError::Decode { .. } => RetryPolicy::NonRetryable,
            ApiError::Status { retry_after, .. } => RetryPolicy::Retryable {
                after: *retry_after,
            },
            ApiError::Transport { .. } | ApiError::EmptyUpload => {
                RetryPolicy::Retryable { after: None }
            }
        }
    }
}

// ---------------------------------------------------------------------------

/// An integer on the wire that does not name a known enumeration member.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value} is not a valid {kind}")]
pub struct UnknownDiscriminant {
    kind: &'static str,
    value: u8,
}

impl UnknownDiscriminant {
    pub(crate) fn new(kind: &'static str, value: u8) -> Self {
        Self { kind, value }
    }
}
