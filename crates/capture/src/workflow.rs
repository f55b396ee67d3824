//! Read-only projection of a remote workflow definition.
//!
//! Only the members needed to spawn a process are modelled: identity, name,
//! the default property set, and enough of the node graph to find the
//! initiator. Anything else the engine sends is ignored on decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::SynthesisError;
use crate::property::Property;
use crate::wire::{null_as_default, null_as_empty};
use crate::{NodeId, WorkflowId};

/// Node category the remote engine assigns to a workflow's entry node.
pub const INITIATOR_CATEGORY: &str = "18";

/// A node in the workflow graph, reduced to its category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Engine-defined node kind; [`INITIATOR_CATEGORY`] marks the entry node.
    #[serde(rename = "Category", default, deserialize_with = "null_as_default")]
    pub category: String,
}

impl Node {
    /// Creates a node with the given category.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    /// Returns `true` for the node where new processes begin.
    pub fn is_initiator(&self) -> bool {
        self.category == INITIATOR_CATEGORY
    }
}

/// A workflow definition as fetched from the Capture API.
///
/// Fetched fresh for each process creation and never mutated; the accessors
/// hand out shared references only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    #[serde(rename = "ID", deserialize_with = "null_as_empty")]
    id: WorkflowId,

    #[serde(rename = "Name", default, deserialize_with = "null_as_default")]
    name: String,

    #[serde(rename = "Properties", default, deserialize_with = "null_as_default")]
    properties: Vec<Property>,

    #[serde(rename = "Nodes", default, deserialize_with = "null_as_default")]
    nodes: BTreeMap<NodeId, Node>,
}

impl WorkflowSnapshot {
    /// Creates a snapshot from its parts.
    pub fn new(
        id: WorkflowId,
        name: impl Into<String>,
        properties: Vec<Property>,
        nodes: BTreeMap<NodeId, Node>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            properties,
            nodes,
        }
    }

    /// The workflow's identifier; empty when the engine sent `null`.
    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    /// The workflow's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The workflow's default property set, in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The node graph, keyed by node id.
    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    /// Returns the key of the single initiator node.
    ///
    /// # Errors
    ///
    /// [`SynthesisError::MissingInitiatorNode`] when no node has the initiator
    /// category, [`SynthesisError::MultipleInitiatorNodes`] when several do.
    pub fn initiator_node(&self) -> Result<&NodeId, SynthesisError> {
        let mut initiators = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_initiator())
            .map(|(key, _)| key);

        let first = initiators
            .next()
            .ok_or_else(|| SynthesisError::MissingInitiatorNode {
                workflow_id: self.id.clone(),
            })?;

        let rest: Vec<&NodeId> = initiators.collect();
        if rest.is_empty() {
            return Ok(first);
        }

        let mut nodes = vec![first.clone()];
        nodes.extend(rest.into_iter().cloned());
        Err(SynthesisError::MultipleInitiatorNodes {
            workflow_id: self.id.clone(),
            nodes,
        })
    }
}
