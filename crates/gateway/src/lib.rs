//! Process Poster capture gateway.
//!
//! This crate provides [`CaptureGateway`], which turns a workflow id, a
//! container id and a document into a process enrolled on the remote engine.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The gateway sequences calls between the synthesis
//! rules in the [`capture`] crate and the [`capture::CaptureApi`] port. It
//! contains no domain rules of its own and no transport code.

mod error;
mod gateway;
mod source;

pub use error::{CaptureError, Phase};
pub use gateway::CaptureGateway;
pub use source::FileSource;
