//! Integration coverage for the create lifecycle: hook ordering, failure
//! classification, the pre/post-create asymmetry, and cancellation.

mod common;

use approval_core::error::ApprovalCoreError;
use approval_core::orchestration::{ApprovalCore, CreatePhase};
use common::{LeaveRequest, MockRemoteClient, RecordingHandler};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn leave_request() -> LeaveRequest {
    LeaveRequest {
        employee: "a.chen".to_string(),
        days: 3,
    }
}

#[tokio::test]
async fn test_happy_path_runs_hooks_in_order() {
    let handler = Arc::new(RecordingHandler::new());
    let client = Arc::new(MockRemoteClient::accepting("I-1"));
    let core = ApprovalCore::builder()
        .client(client.clone())
        .build()
        .unwrap();
    core.register::<LeaveRequest>(handler.clone()).await.unwrap();

    let outcome = core.create(&leave_request()).await.unwrap();

    assert_eq!(outcome.result.instance_id, "I-1");
    assert!(outcome.postprocess_warning.is_none());
    assert_eq!(
        handler.calls(),
        vec!["validate", "pre_process", "post_process"]
    );
    assert_eq!(client.create_call_count(), 1);
}

#[tokio::test]
async fn test_validate_failure_short_circuits_lifecycle() {
    let handler = Arc::new(RecordingHandler::failing_validate("days missing"));
    let client = Arc::new(MockRemoteClient::accepting("I-1"));
    let core = ApprovalCore::builder()
        .client(client.clone())
        .build()
        .unwrap();
    core.register::<LeaveRequest>(handler.clone()).await.unwrap();

    let err = core.create(&leave_request()).await.unwrap_err();

    assert!(matches!(err, ApprovalCoreError::Validation { .. }));
    assert_eq!(handler.count("validate"), 1);
    assert_eq!(handler.count("pre_process"), 0);
    assert_eq!(handler.count("post_process"), 0);
    assert_eq!(client.create_call_count(), 0);
    // failure hook ran exactly once with the original classification
    assert_eq!(handler.count("on_create_failure"), 1);
    assert_eq!(handler.last_failure_classification(), Some("validation"));
}

#[tokio::test]
async fn test_pre_process_failure_classified() {
    let handler = Arc::new(RecordingHandler::failing_pre_process("normalization bug"));
    let client = Arc::new(MockRemoteClient::accepting("I-1"));
    let core = ApprovalCore::builder()
        .client(client.clone())
        .build()
        .unwrap();
    core.register::<LeaveRequest>(handler.clone()).await.unwrap();

    let err = core.create(&leave_request()).await.unwrap_err();

    assert!(matches!(err, ApprovalCoreError::PreProcess { .. }));
    assert_eq!(client.create_call_count(), 0);
    assert_eq!(handler.last_failure_classification(), Some("pre_process"));
}

#[tokio::test]
async fn test_remote_refusal_is_creation_failure() {
    let handler = Arc::new(RecordingHandler::new());
    let client = Arc::new(MockRemoteClient::refusing());
    let core = ApprovalCore::builder()
        .client(client.clone())
        .build()
        .unwrap();
    core.register::<LeaveRequest>(handler.clone()).await.unwrap();

    let err = core.create(&leave_request()).await.unwrap_err();

    assert!(matches!(err, ApprovalCoreError::CreationFailed { .. }));
    assert_eq!(client.create_call_count(), 1);
    assert_eq!(handler.count("post_process"), 0);
    assert_eq!(handler.count("on_create_failure"), 1);
}

#[tokio::test]
async fn test_remote_transport_error_is_creation_failure() {
    let handler = Arc::new(RecordingHandler::new());
    let client = Arc::new(MockRemoteClient::failing("connection reset"));
    let core = ApprovalCore::builder().client(client).build().unwrap();
    core.register::<LeaveRequest>(handler.clone()).await.unwrap();

    let err = core.create(&leave_request()).await.unwrap_err();

    assert!(matches!(err, ApprovalCoreError::CreationFailed { .. }));
    assert!(err.to_string().contains("connection reset"));
}

#[tokio::test]
async fn test_post_process_failure_still_returns_success() {
    let handler = Arc::new(RecordingHandler::failing_post_process("audit sink offline"));
    let client = Arc::new(MockRemoteClient::accepting("I-2"));
    let core = ApprovalCore::builder()
        .client(client.clone())
        .build()
        .unwrap();
    core.register::<LeaveRequest>(handler.clone()).await.unwrap();

    let outcome = core.create(&leave_request()).await.unwrap();

    // the remote side effect happened, so the caller sees success + warning
    assert_eq!(outcome.result.instance_id, "I-2");
    let warning = outcome.postprocess_warning.expect("warning attached");
    assert!(warning.contains("audit sink offline"));
    assert_eq!(client.create_call_count(), 1);
    assert_eq!(handler.count("on_create_failure"), 0);
}

#[tokio::test]
async fn test_unregistered_type_is_typed_error() {
    let client = Arc::new(MockRemoteClient::accepting("I-1"));
    let core = ApprovalCore::builder().client(client.clone()).build().unwrap();

    let err = core.create(&leave_request()).await.unwrap_err();

    assert!(matches!(
        err,
        ApprovalCoreError::UnregisteredHandler { ref type_id } if type_id == "leave_approval"
    ));
    assert_eq!(client.create_call_count(), 0);
}

#[tokio::test]
async fn test_pre_process_mutation_reaches_remote_client() {
    let handler = Arc::new(RecordingHandler::normalizing());
    let client = Arc::new(MockRemoteClient::accepting("I-3"));
    let core = ApprovalCore::builder()
        .client(client.clone())
        .build()
        .unwrap();
    core.register::<LeaveRequest>(handler).await.unwrap();

    core.create(&leave_request()).await.unwrap();

    let seen = client.last_request().expect("client saw a request");
    assert_eq!(seen.payload["employee"], "normalized");
}

#[tokio::test]
async fn test_already_cancelled_token_aborts_before_validate() {
    let handler = Arc::new(RecordingHandler::new());
    let client = Arc::new(MockRemoteClient::accepting("I-1"));
    let core = ApprovalCore::builder()
        .client(client.clone())
        .build()
        .unwrap();
    core.register::<LeaveRequest>(handler.clone()).await.unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = core
        .create_cancellable(&leave_request(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApprovalCoreError::Cancelled {
            phase: CreatePhase::Start
        }
    ));
    assert_eq!(handler.count("validate"), 0);
    assert_eq!(client.create_call_count(), 0);
    assert_eq!(handler.count("on_create_failure"), 1);
    assert_eq!(handler.last_failure_classification(), Some("cancelled"));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_during_remote_create() {
    let handler = Arc::new(RecordingHandler::new());
    let client = Arc::new(MockRemoteClient::delayed(
        Duration::from_secs(60),
        "I-late",
    ));
    let core = ApprovalCore::builder()
        .client(client.clone())
        .build()
        .unwrap();
    core.register::<LeaveRequest>(handler.clone()).await.unwrap();

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let err = core
        .create_cancellable(&leave_request(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApprovalCoreError::Cancelled {
            phase: CreatePhase::PreProcessed
        }
    ));
    // the remote call was started but its result abandoned
    assert_eq!(client.create_call_count(), 1);
    assert_eq!(handler.count("post_process"), 0);
}
