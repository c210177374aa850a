//! Shared test doubles for the integration suites: a recording handler with
//! per-hook call accounting and a configurable mock remote client.

#![allow(dead_code)]

use approval_core::client::{InstanceDetail, RemoteApprovalClient};
use approval_core::error::ApprovalCoreError;
use approval_core::orchestration::{
    ApprovalContext, ApprovalHandler, ApprovalPayload, ApprovalRequest, ApprovalTypeId,
    CreateResult, HookResult,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub employee: String,
    pub days: u32,
}

impl ApprovalPayload for LeaveRequest {
    fn approval_type() -> ApprovalTypeId {
        ApprovalTypeId::new("leave_approval")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRequest {
    pub amount: u64,
}

impl ApprovalPayload for ExpenseRequest {
    fn approval_type() -> ApprovalTypeId {
        ApprovalTypeId::new("expense_approval")
    }
}

/// Handler double recording every hook invocation in order
#[derive(Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<&'static str>>,
    fail_validate: Option<String>,
    fail_pre_process: Option<String>,
    fail_post_process: Option<String>,
    fail_status_hooks: Option<String>,
    fail_business_exception: Option<String>,
    normalize_on_pre_process: bool,
    last_context: Mutex<Option<ApprovalContext>>,
    last_failure_classification: Mutex<Option<&'static str>>,
    last_business_error: Mutex<Option<String>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_validate(msg: &str) -> Self {
        Self {
            fail_validate: Some(msg.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_pre_process(msg: &str) -> Self {
        Self {
            fail_pre_process: Some(msg.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_post_process(msg: &str) -> Self {
        Self {
            fail_post_process: Some(msg.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_status_hooks(msg: &str) -> Self {
        Self {
            fail_status_hooks: Some(msg.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_everywhere(msg: &str) -> Self {
        Self {
            fail_status_hooks: Some(msg.to_string()),
            fail_business_exception: Some(msg.to_string()),
            ..Self::default()
        }
    }

    pub fn normalizing() -> Self {
        Self {
            normalize_on_pre_process: true,
            ..Self::default()
        }
    }

    fn record(&self, hook: &'static str) {
        self.calls.lock().unwrap().push(hook);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, hook: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == hook).count()
    }

    pub fn last_context(&self) -> Option<ApprovalContext> {
        self.last_context.lock().unwrap().clone()
    }

    pub fn last_failure_classification(&self) -> Option<&'static str> {
        *self.last_failure_classification.lock().unwrap()
    }

    pub fn last_business_error(&self) -> Option<String> {
        self.last_business_error.lock().unwrap().clone()
    }

    fn capture_context(&self, context: &ApprovalContext) {
        *self.last_context.lock().unwrap() = Some(context.clone());
    }

    fn status_hook(&self, hook: &'static str, context: &ApprovalContext) -> HookResult {
        self.record(hook);
        self.capture_context(context);
        if let Some(msg) = &self.fail_status_hooks {
            anyhow::bail!("{msg}");
        }
        Ok(())
    }
}

#[async_trait]
impl ApprovalHandler for RecordingHandler {
    async fn validate(&self, _request: &ApprovalRequest) -> HookResult {
        self.record("validate");
        if let Some(msg) = &self.fail_validate {
            anyhow::bail!("{msg}");
        }
        Ok(())
    }

    async fn pre_process(&self, request: &mut ApprovalRequest) -> HookResult {
        self.record("pre_process");
        if let Some(msg) = &self.fail_pre_process {
            anyhow::bail!("{msg}");
        }
        if self.normalize_on_pre_process {
            request.payload["employee"] = Value::String("normalized".to_string());
        }
        Ok(())
    }

    async fn post_process(&self, _request: &ApprovalRequest, _result: &CreateResult) -> HookResult {
        self.record("post_process");
        if let Some(msg) = &self.fail_post_process {
            anyhow::bail!("{msg}");
        }
        Ok(())
    }

    async fn on_create_failure(
        &self,
        _request: &ApprovalRequest,
        error: &ApprovalCoreError,
    ) -> HookResult {
        self.record("on_create_failure");
        *self.last_failure_classification.lock().unwrap() = Some(error.classification());
        Ok(())
    }

    async fn on_approved(&self, context: &ApprovalContext) -> HookResult {
        self.status_hook("on_approved", context)
    }

    async fn on_rejected(&self, context: &ApprovalContext) -> HookResult {
        self.status_hook("on_rejected", context)
    }

    async fn on_cancelled(&self, context: &ApprovalContext) -> HookResult {
        self.status_hook("on_cancelled", context)
    }

    async fn on_unknown_status(&self, context: &ApprovalContext) -> HookResult {
        self.status_hook("on_unknown_status", context)
    }

    async fn on_business_exception(
        &self,
        context: &ApprovalContext,
        error: &anyhow::Error,
    ) -> HookResult {
        self.record("on_business_exception");
        self.capture_context(context);
        *self.last_business_error.lock().unwrap() = Some(error.to_string());
        if let Some(msg) = &self.fail_business_exception {
            anyhow::bail!("{msg}");
        }
        Ok(())
    }
}

/// Remote client behaviors selectable per test
pub enum RemoteBehavior {
    Accept(&'static str),
    Refuse,
    Fail(&'static str),
    DelayThenAccept(Duration, &'static str),
}

/// Mock remote platform client with call accounting
pub struct MockRemoteClient {
    behavior: RemoteBehavior,
    create_calls: AtomicUsize,
    last_request: Mutex<Option<ApprovalRequest>>,
}

impl MockRemoteClient {
    pub fn accepting(instance_id: &'static str) -> Self {
        Self::with_behavior(RemoteBehavior::Accept(instance_id))
    }

    pub fn refusing() -> Self {
        Self::with_behavior(RemoteBehavior::Refuse)
    }

    pub fn failing(msg: &'static str) -> Self {
        Self::with_behavior(RemoteBehavior::Fail(msg))
    }

    pub fn delayed(delay: Duration, instance_id: &'static str) -> Self {
        Self::with_behavior(RemoteBehavior::DelayThenAccept(delay, instance_id))
    }

    pub fn with_behavior(behavior: RemoteBehavior) -> Self {
        Self {
            behavior,
            create_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ApprovalRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteApprovalClient for MockRemoteClient {
    async fn create_instance(&self, request: &ApprovalRequest) -> anyhow::Result<CreateResult> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.behavior {
            RemoteBehavior::Accept(instance_id) => Ok(CreateResult::accepted(*instance_id)),
            RemoteBehavior::Refuse => Ok(CreateResult::refused()),
            RemoteBehavior::Fail(msg) => Err(anyhow::anyhow!("{msg}")),
            RemoteBehavior::DelayThenAccept(delay, instance_id) => {
                tokio::time::sleep(*delay).await;
                Ok(CreateResult::accepted(*instance_id))
            }
        }
    }

    async fn get_instance(&self, instance_id: &str) -> anyhow::Result<InstanceDetail> {
        Ok(InstanceDetail {
            instance_id: instance_id.to_string(),
            status: "pending".to_string(),
            raw: None,
        })
    }
}
