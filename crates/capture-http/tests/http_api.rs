//! `HttpCaptureApi` against a mock Capture API.

use std::collections::BTreeMap;
use std::time::Duration;

use capture::{
    synthesize, ApiError, CaptureApi, ContainerId, Node, NodeId, ProcessId, ProcessStatus,
    Property, ReservedProperty, RetryPolicy, StoredFilePath, UploadFile, WorkflowId,
    WorkflowSnapshot,
};
use capture_http::{ClientConfig, HttpCaptureApi};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("svc:secret")
const AUTH: &str = "Basic c3ZjOnNlY3JldA==";

fn api_for(server: &MockServer, prefix: &str) -> HttpCaptureApi {
    let config = ClientConfig::new(format!("{}{prefix}", server.uri()), "svc", "secret");
    HttpCaptureApi::new(&config).expect("valid config")
}

fn workflow_json() -> serde_json::Value {
    json!({
        "ID": "W1",
        "Name": "Intake",
        "Properties": [
            { "ID": 0, "Name": "BatchID", "Value": "" },
            { "ID": -1, "Name": "FilePath", "Value": "" },
            { "ID": 4, "Name": "Vendor", "Value": "Acme", "Page": 2 }
        ],
        "Nodes": {
            "n0": { "Category": "5" },
            "n1": { "Category": "18" }
        }
    })
}

#[tokio::test]
async fn upload_posts_multipart_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/files"))
        .and(header("authorization", AUTH))
        .and(header("accept", "application/json"))
        .and(body_string_contains("filename=\"doc123.pdf\""))
        .and(body_string_contains("hello capture"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["/cache/doc123.pdf"])))
        .expect(1)
        .mount(&server)
        .await;

    let paths = api_for(&server, "/api")
        .upload_file(&UploadFile::new("doc123.pdf", b"hello capture".to_vec()))
        .await
        .expect("upload succeeds");

    assert_eq!(paths, vec!["/cache/doc123.pdf".to_string()]);
}

#[tokio::test]
async fn empty_upload_list_is_returned_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let paths = api_for(&server, "/")
        .upload_file(&UploadFile::new("a.pdf", vec![1]))
        .await
        .expect("upload call succeeds");
    assert!(paths.is_empty());
}

#[tokio::test]
async fn fetches_and_decodes_the_workflow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/portal/3/workflow/W1"))
        .and(header("authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(workflow_json()))
        .expect(1)
        .mount(&server)
        .await;

    let workflow = api_for(&server, "/api/")
        .get_workflow(&WorkflowId::new("W1").unwrap(), ContainerId::new(3))
        .await
        .expect("workflow fetched");

    assert_eq!(workflow.name(), "Intake");
    assert_eq!(workflow.properties().len(), 3);
    assert_eq!(
        workflow.initiator_node().map(NodeId::as_str),
        Ok("n1")
    );
}

#[tokio::test]
async fn failed_responses_surface_the_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/portal/3/workflow/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Unable to find workflow."))
        .mount(&server)
        .await;

    let err = api_for(&server, "")
        .get_workflow(&WorkflowId::new("missing").unwrap(), ContainerId::new(3))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            body: "Unable to find workflow.".to_string(),
            retry_after: None,
        }
    );
}

#[tokio::test]
async fn undecodable_success_bodies_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server, "")
        .upload_file(&UploadFile::new("a.pdf", vec![1]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn submits_the_process_and_returns_the_server_copy() {
    let server = MockServer::start().await;

    let mut nodes = BTreeMap::new();
    nodes.insert(NodeId::new("n1").unwrap(), Node::new("18"));
    let workflow = WorkflowSnapshot::new(
        WorkflowId::new("W1").unwrap(),
        "Intake",
        vec![Property::new(0, "BatchID"), Property::new(-1, "FilePath")],
        nodes,
    );
    let process = synthesize(&workflow, &StoredFilePath::new("/cache/doc123.pdf").unwrap())
        .expect("synthesized");

    let mut stored = serde_json::to_value(&process).unwrap();
    stored["ID"] = json!(77);
    stored["Status"] = json!(1);
    stored["Priority"] = json!(2);

    Mock::given(method("POST"))
        .and(path("/portal/9/process"))
        .and(header("authorization", AUTH))
        .and(body_partial_json(json!({
            "ID": 0,
            "WorkflowID": "W1",
            "WorkflowName": "Intake",
            "CurrentNode": "n1",
            "ProcessType": 2,
            "Status": 5,
            "History": [],
            "FilePages": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .expect(1)
        .mount(&server)
        .await;

    let returned = api_for(&server, "")
        .submit_process(ContainerId::new(9), &process)
        .await
        .expect("process submitted");

    assert_eq!(returned.id, ProcessId::new(77));
    assert_eq!(returned.status, ProcessStatus::WaitQueue);
    assert_eq!(
        returned.reserved_value(ReservedProperty::BatchId),
        process.reserved_value(ReservedProperty::BatchId)
    );
    assert_eq!(returned.extra.get("Priority"), Some(&json!(2)));
}

#[tokio::test]
async fn slow_responses_hit_the_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(["/cache/a.pdf"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "svc", "secret").with_timeout_secs(1);
    let err = HttpCaptureApi::new(&config)
        .unwrap()
        .upload_file(&UploadFile::new("a.pdf", vec![1]))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
}

#[tokio::test]
async fn zero_timeout_waits_for_slow_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(["/cache/a.pdf"]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "svc", "secret").with_timeout_secs(0);
    let paths = HttpCaptureApi::new(&config)
        .unwrap()
        .upload_file(&UploadFile::new("a.pdf", vec![1]))
        .await
        .expect("no timeout applied");

    assert_eq!(paths, vec!["/cache/a.pdf".to_string()]);
}

#[tokio::test]
async fn throttled_responses_carry_the_requested_back_off() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/portal/3/workflow/W1"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("Retry-After", "30")
                .set_body_string("Service busy"),
        )
        .mount(&server)
        .await;

    let err = api_for(&server, "")
        .get_workflow(&WorkflowId::new("W1").unwrap(), ContainerId::new(3))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 503,
            body: "Service busy".to_string(),
            retry_after: Some(Duration::from_secs(30)),
        }
    );
    assert_eq!(
        err.retry_policy(),
        RetryPolicy::Retryable {
            after: Some(Duration::from_secs(30))
        }
    );
}

#[tokio::test]
async fn retry_after_is_ignored_outside_throttling_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("Retry-After", "30")
                .set_body_string("boom"),
        )
        .mount(&server)
        .await;

    let err = api_for(&server, "")
        .upload_file(&UploadFile::new("a.pdf", vec![1]))
        .await
        .unwrap_err();

    assert_eq!(err.retry_policy(), RetryPolicy::Retryable { after: None });
}

#[tokio::test]
async fn server_copy_with_null_members_is_accepted() {
    let server = MockServer::start().await;

    let mut nodes = BTreeMap::new();
    nodes.insert(NodeId::new("n1").unwrap(), Node::new("18"));
    let workflow = WorkflowSnapshot::new(
        WorkflowId::new("W1").unwrap(),
        "Intake",
        vec![Property::new(0, "BatchID"), Property::new(-1, "FilePath")],
        nodes,
    );
    let process = synthesize(&workflow, &StoredFilePath::new("/cache/doc123.pdf").unwrap())
        .expect("synthesized");

    let mut stored = serde_json::to_value(&process).unwrap();
    stored["ID"] = json!(78);
    stored["CurrentNode"] = json!(null);
    stored["LastAccessed"] = json!(null);
    stored["History"] = json!(null);

    Mock::given(method("POST"))
        .and(path("/portal/9/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .mount(&server)
        .await;

    let returned = api_for(&server, "")
        .submit_process(ContainerId::new(9), &process)
        .await
        .expect("server copy decoded");

    assert_eq!(returned.id, ProcessId::new(78));
    assert!(returned.current_node.is_none());
    assert!(returned.last_accessed_at.is_none());
    assert_eq!(returned.first_accessed_at, process.first_accessed_at);
    assert!(returned.history.is_empty());
}
