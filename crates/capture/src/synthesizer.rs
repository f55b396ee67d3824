//! Derivation of a new process from a workflow definition.
//!
//! Synthesis is pure: it reads a [`WorkflowSnapshot`] and a stored-file path
//! and returns a fresh [`Process`] ready for submission, or a
//! [`SynthesisError`] naming the first structural defect found. It never
//! returns a partially built process.
//!
//! Rules applied, in order:
//!
//! 1. Workflow id and name are copied onto the process.
//! 2. First- and last-accessed are stamped with the same instant.
//! 3. The process is a `GlobalCapture` process in `Ready` status.
//! 4. The current node is the workflow's single initiator node.
//! 5. Properties are a deep copy of the workflow's default set.
//! 6. The reserved `BatchID` slot receives a fresh batch identifier.
//! 7. The reserved `FilePath` slot receives the stored-file path.
//! 8. History and file pages are empty arrays.

use tracing::debug;

use crate::errors::SynthesisError;
use crate::process::Process;
use crate::property::ReservedProperty;
use crate::types::{ProcessStatus, ProcessType, Timestamp};
use crate::workflow::WorkflowSnapshot;
use crate::{BatchId, ProcessId, StoredFilePath};

/// Builds a new process from `workflow` for the document at `stored_file_path`.
///
/// Uses the current time and a random batch identifier.
///
/// # Errors
///
/// Returns a [`SynthesisError`] when the workflow lacks exactly one initiator
/// node or either reserved property slot.
pub fn synthesize(
    workflow: &WorkflowSnapshot,
    stored_file_path: &StoredFilePath,
) -> Result<Process, SynthesisError> {
    synthesize_with(
        workflow,
        stored_file_path,
        Timestamp::now(),
        BatchId::new_random(),
    )
}

/// Same as [`synthesize`] with the clock reading and batch identifier supplied
/// by the caller.
pub fn synthesize_with(
    workflow: &WorkflowSnapshot,
    stored_file_path: &StoredFilePath,
    now: Timestamp,
    batch_id: BatchId,
) -> Result<Process, SynthesisError> {
    let current_node = workflow.initiator_node()?.clone();

    let mut properties = workflow.properties().to_vec();

    ReservedProperty::BatchId
        .find_mut(&mut properties)
        .ok_or_else(|| SynthesisError::MissingBatchIdProperty {
            workflow_id: workflow.id().clone(),
        })?
        .value = batch_id.to_string();

    ReservedProperty::FilePath
        .find_mut(&mut properties)
        .ok_or_else(|| SynthesisError::MissingFilePathProperty {
            workflow_id: workflow.id().clone(),
        })?
        .value = stored_file_path.as_str().to_string();

    debug!(
        workflow_id = %workflow.id(),
        current_node = %current_node,
        batch_id = %batch_id,
        property_count = properties.len(),
        "synthesized process"
    );

    Ok(Process {
        id: ProcessId::UNASSIGNED,
        workflow_id: workflow.id().clone(),
        workflow_name: workflow.name().to_string(),
        first_accessed_at: Some(now),
        last_accessed_at: Some(now),
        current_node: Some(current_node),
        properties,
        process_type: ProcessType::GlobalCapture,
        status: ProcessStatus::Ready,
        history: Vec::new(),
        file_pages: Vec::new(),
        extra: serde_json::Map::new(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::property::Property;
    use crate::workflow::Node;
    use crate::{NodeId, WorkflowId};
    use serde_json::json;
    use uuid::Uuid;

    fn intake_workflow() -> WorkflowSnapshot {
        let mut nodes = BTreeMap::new();
        nodes.insert(NodeId::new("n1").unwrap(), Node::new("18"));
        WorkflowSnapshot::new(
            WorkflowId::new("W1").unwrap(),
            "Intake",
            vec![Property::new(0, "BatchID"), Property::new(-1, "FilePath")],
            nodes,
        )
    }

    fn workflow_with(properties: Vec<Property>, nodes: &[(&str, &str)]) -> WorkflowSnapshot {
        WorkflowSnapshot::new(
            WorkflowId::new("W2").unwrap(),
            "Claims",
            properties,
            nodes
                .iter()
                .map(|(k, c)| (NodeId::new(*k).unwrap(), Node::new(*c)))
                .collect(),
        )
    }

    fn stored(path: &str) -> StoredFilePath {
        StoredFilePath::new(path).unwrap()
    }

    #[test]
    fn intake_scenario() {
        let process = synthesize(&intake_workflow(), &stored("/cache/doc123.pdf")).unwrap();

        assert_eq!(process.workflow_id.as_str(), "W1");
        assert_eq!(process.workflow_name, "Intake");
        assert_eq!(process.current_node, NodeId::new("n1"));
        assert_eq!(
            process.reserved_value(ReservedProperty::FilePath),
            Some("/cache/doc123.pdf")
        );

        let batch = process
            .reserved_value(ReservedProperty::BatchId)
            .expect("batch slot");
        assert!(!batch.is_empty());
        assert!(Uuid::parse_str(batch).is_ok());
    }

    #[test]
    fn new_processes_start_ready_with_empty_sequences() {
        let process = synthesize(&intake_workflow(), &stored("/cache/a.tif")).unwrap();

        assert_eq!(process.id, ProcessId::UNASSIGNED);
        assert_eq!(process.status, ProcessStatus::Ready);
        assert_eq!(process.process_type, ProcessType::GlobalCapture);
        assert!(process.history.is_empty());
        assert!(process.file_pages.is_empty());
        assert!(process.first_accessed_at.is_some());
        assert_eq!(process.first_accessed_at, process.last_accessed_at);

        let encoded = serde_json::to_value(&process).unwrap();
        assert_eq!(encoded["History"], json!([]));
        assert_eq!(encoded["FilePages"], json!([]));
        assert_eq!(encoded["Status"], json!(5));
        assert_eq!(encoded["ProcessType"], json!(2));
        assert_eq!(encoded["ID"], json!(0));
    }

    #[test]
    fn batch_ids_differ_between_calls() {
        let workflow = intake_workflow();
        let path = stored("/cache/a.pdf");
        let first = synthesize(&workflow, &path).unwrap();
        let second = synthesize(&workflow, &path).unwrap();

        assert_ne!(
            first.reserved_value(ReservedProperty::BatchId),
            second.reserved_value(ReservedProperty::BatchId)
        );
    }

    #[test]
    fn supplied_clock_and_batch_id_are_used() {
        let now = Timestamp::parse("2024-03-01T14:30:00Z").unwrap();
        let batch = BatchId::from_uuid(Uuid::nil());
        let process =
            synthesize_with(&intake_workflow(), &stored("/cache/x.pdf"), now, batch).unwrap();

        assert_eq!(process.first_accessed_at, Some(now));
        assert_eq!(process.last_accessed_at, Some(now));
        assert_eq!(
            process.reserved_value(ReservedProperty::BatchId),
            Some("00000000-0000-0000-0000-000000000000")
        );
    }

    #[test]
    fn properties_are_an_independent_copy() {
        let workflow = intake_workflow();
        let mut process = synthesize(&workflow, &stored("/cache/a.pdf")).unwrap();

        process.properties[0].value = "changed".to_string();
        process.properties.push(Property::new(7, "Vendor"));

        assert_eq!(workflow.properties()[0].value, "");
        assert_eq!(workflow.properties()[1].value, "");
        assert_eq!(workflow.properties().len(), 2);
    }

    #[test]
    fn non_reserved_properties_are_carried_over_in_order() {
        let mut vendor = Property::new(12, "Vendor");
        vendor.value = "Acme".to_string();
        vendor.bounding_box.page = 3;
        let workflow = workflow_with(
            vec![
                vendor.clone(),
                Property::new(-1, "FilePath"),
                Property::new(0, "BatchID"),
            ],
            &[("s", "18")],
        );

        let process = synthesize(&workflow, &stored("/cache/b.pdf")).unwrap();
        assert_eq!(process.properties[0], vendor);
        assert_eq!(process.properties[1].value, "/cache/b.pdf");
        assert_eq!(process.properties[2].name, "BatchID");
    }

    #[test]
    fn missing_initiator_is_reported_first() {
        let workflow = workflow_with(Vec::new(), &[("a", "1")]);
        assert!(matches!(
            synthesize(&workflow, &stored("/cache/a.pdf")),
            Err(SynthesisError::MissingInitiatorNode { .. })
        ));
    }

    #[test]
    fn missing_batch_id_slot_fails() {
        let workflow = workflow_with(vec![Property::new(-1, "FilePath")], &[("a", "18")]);
        assert!(matches!(
            synthesize(&workflow, &stored("/cache/a.pdf")),
            Err(SynthesisError::MissingBatchIdProperty { .. })
        ));
    }

    #[test]
    fn misnamed_file_path_slot_fails() {
        let workflow = workflow_with(
            vec![Property::new(0, "BatchID"), Property::new(-1, "Path")],
            &[("a", "18")],
        );
        assert_eq!(
            synthesize(&workflow, &stored("/cache/a.pdf")),
            Err(SynthesisError::MissingFilePathProperty {
                workflow_id: WorkflowId::new("W2").unwrap()
            })
        );
    }
}
