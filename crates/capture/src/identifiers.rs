//! Newtype domain identifiers.
//!
//! Every Capture API concept that has an identity is represented as a distinct
//! newtype wrapping a primitive. This prevents accidentally interchanging, for
//! example, a [`WorkflowId`] with a [`NodeId`] even though both are strings on
//! the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a workflow definition on the Capture API.
    ///
    /// Workflow identifiers are opaque strings assigned by the remote engine.
    WorkflowId
}

string_id! {
    /// Identifies a node within a workflow's node graph.
    ///
    /// Used as the key of [`crate::WorkflowSnapshot`] nodes and as the
    /// `CurrentNode` of a [`crate::Process`].
    NodeId
}

string_id! {
    /// A file path as it exists on the Capture API server after upload.
    ///
    /// Returned by the `files` route; written into the reserved `FilePath`
    /// property of a new process so the engine can find its document.
    StoredFilePath
}

// ---------------------------------------------------------------------------
// Identifiers — integer-backed (server-assigned)
// ---------------------------------------------------------------------------

/// Identifies a container (the remote "portal") that processes are posted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Creates a new identifier from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a process record on the Capture API.
///
/// The remote engine assigns the value when a process is accepted. A process
/// that has not been submitted yet carries [`ProcessId::UNASSIGNED`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(i64);

impl ProcessId {
    /// The identifier carried by a process before the server has persisted it.
    pub const UNASSIGNED: ProcessId = ProcessId(0);

    /// Creates a new identifier from a raw integer.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Returns `true` once the server has assigned an identifier.
    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// The batch identifier stamped into the reserved `BatchID` property of every
/// newly synthesized process.
///
/// Generated fresh for each synthesis; travels on the wire in its hyphenated
/// string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(Uuid);

impl BatchId {
    /// Generates a new random batch identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`BatchId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_reject_empty_values() {
        assert!(WorkflowId::new("").is_none());
        assert_eq!(WorkflowId::new("W1").map(|w| w.to_string()), Some("W1".to_string()));
    }

    #[test]
    fn process_id_zero_is_unassigned() {
        assert!(!ProcessId::default().is_assigned());
        assert!(ProcessId::new(17).is_assigned());
    }

    #[test]
    fn batch_id_displays_hyphenated_form() {
        let id = BatchId::new_random();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(Uuid::parse_str(&text).ok(), Some(id.as_uuid()));
    }

    #[test]
    fn node_id_serializes_as_plain_string() {
        let node = NodeId::new("n1").expect("non-empty");
        assert_eq!(serde_json::to_string(&node).expect("serialize"), "\"n1\"");
    }
}
