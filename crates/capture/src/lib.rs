//! Core domain for Process Poster.
//!
//! This crate contains the Capture API record types (properties, workflow
//! snapshots, processes), the newtype identifiers, the process synthesis rules,
//! and the [`CaptureApi`] port the orchestration layer calls through.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; `capture-http` defines *how* to supply it and
//! `gateway` sequences the calls.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`WorkflowId`, `NodeId`, `ContainerId`, etc.) |
//! | [`types`] | Shared value types (`Timestamp`, `ProcessStatus`, `ProcessType`, etc.) |
//! | [`property`] | The property record and the reserved property slots |
//! | [`workflow`] | Read-only workflow snapshot and initiator lookup |
//! | [`process`] | The process record exchanged with the engine |
//! | [`synthesizer`] | Derivation of a new process from a workflow |
//! | [`ports`] | The `CaptureApi` port trait |
//! | [`errors`] | Synthesis, port, and retry-policy types |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod process;
pub mod property;
pub mod synthesizer;
pub mod types;
pub mod workflow;

mod wire;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{ApiError, RetryPolicy, SynthesisError, UnknownDiscriminant};
pub use identifiers::{BatchId, ContainerId, NodeId, ProcessId, StoredFilePath, WorkflowId};
pub use ports::{CaptureApi, UploadFile};
pub use process::Process;
pub use property::{BoundingBox, Property, ReservedProperty};
pub use synthesizer::{synthesize, synthesize_with};
pub use types::{OpaqueEntry, ProcessStatus, ProcessType, Timestamp};
pub use workflow::{Node, WorkflowSnapshot, INITIATOR_CATEGORY};
