//! The process record posted to and returned by the Capture API.
//!
//! Only the members the client must set are modelled as typed fields. Any
//! other member the server fills in is kept in [`Process::extra`] so the
//! authoritative copy returned by the engine is never truncated.

use serde::{Deserialize, Serialize};

use crate::property::{Property, ReservedProperty};
use crate::types::{OpaqueEntry, ProcessStatus, ProcessType, Timestamp};
use crate::wire::{null_as_default, null_as_empty};
use crate::{NodeId, ProcessId, WorkflowId};

/// One unit of work flowing through a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Server-assigned; [`ProcessId::UNASSIGNED`] until persisted.
    #[serde(rename = "ID", default)]
    pub id: ProcessId,

    /// Empty when the engine sends `null`.
    #[serde(rename = "WorkflowID", deserialize_with = "null_as_empty")]
    pub workflow_id: WorkflowId,

    /// Display name of the source workflow.
    #[serde(rename = "WorkflowName", default, deserialize_with = "null_as_default")]
    pub workflow_name: String,

    /// When the process was first picked up. Always set on a new process.
    #[serde(rename = "FirstAccessed", default)]
    pub first_accessed_at: Option<Timestamp>,

    /// When the process was last touched. Always set on a new process.
    #[serde(rename = "LastAccessed", default)]
    pub last_accessed_at: Option<Timestamp>,

    /// Node the process is currently at; `None` once the engine has moved it
    /// off the graph.
    #[serde(rename = "CurrentNode", default)]
    pub current_node: Option<NodeId>,

    /// Deep copy of the workflow's property set, reserved slots filled in.
    #[serde(rename = "Properties", default, deserialize_with = "null_as_default")]
    pub properties: Vec<Property>,

    /// Engine that owns the process.
    #[serde(rename = "ProcessType")]
    pub process_type: ProcessType,

    /// Lifecycle status.
    #[serde(rename = "Status")]
    pub status: ProcessStatus,

    /// Always serialised as an array; the engine rejects `null`.
    #[serde(rename = "History", default, deserialize_with = "null_as_default")]
    pub history: Vec<OpaqueEntry>,

    /// Always serialised as an array; the engine rejects `null`.
    #[serde(rename = "FilePages", default, deserialize_with = "null_as_default")]
    pub file_pages: Vec<OpaqueEntry>,

    /// Members the engine returns that this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Process {
    /// Returns the value of a reserved property, if the slot is present.
    pub fn reserved_value(&self, slot: ReservedProperty) -> Option<&str> {
        slot.find(&self.properties).map(|p| p.value.as_str())
    }
}
