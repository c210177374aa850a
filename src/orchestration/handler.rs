//! # Approval Handler Contract
//!
//! The trait independent teams implement to plug business logic for one
//! approval type into the shared dispatch path. The core drives the create
//! lifecycle and the callback state machine; handlers only supply the
//! per-type behavior behind each hook.
//!
//! Five hooks are required: `validate` plus the four status reactions.
//! The remaining four (`pre_process`, `post_process`, `on_create_failure`,
//! `on_business_exception`) default to no-ops so simple handlers stay small.

use crate::error::ApprovalCoreError;
use crate::orchestration::types::{ApprovalContext, ApprovalRequest, CreateResult};
use async_trait::async_trait;

/// Result type for handler hooks; failures are arbitrary business errors
pub type HookResult = anyhow::Result<()>;

/// Pluggable per-type business logic
///
/// Implementations must be safe to call concurrently: the core may dispatch
/// multiple callbacks or create calls against the same handler at once, and
/// gives no ordering guarantee between invocations. Handlers should be
/// idempotent or tolerate reordering of callbacks for the same instance.
#[async_trait]
pub trait ApprovalHandler: Send + Sync {
    /// Validate a request before any side effect
    ///
    /// An error here fails the create call with a validation classification;
    /// neither preprocessing nor the remote create call will run.
    async fn validate(&self, request: &ApprovalRequest) -> HookResult;

    /// Normalize or enrich the request before the remote create call
    ///
    /// The request may be mutated in place. Default implementation does
    /// nothing.
    async fn pre_process(&self, request: &mut ApprovalRequest) -> HookResult {
        let _ = request;
        Ok(())
    }

    /// React to a successful remote create
    ///
    /// Errors here are advisory: the remote instance already exists, so the
    /// create call still succeeds and the failure surfaces as a warning.
    async fn post_process(&self, request: &ApprovalRequest, result: &CreateResult) -> HookResult {
        let _ = (request, result);
        Ok(())
    }

    /// Best-effort hook invoked when the create lifecycle fails before the
    /// remote instance exists
    ///
    /// Errors raised here are logged and never override the original failure.
    async fn on_create_failure(
        &self,
        request: &ApprovalRequest,
        error: &ApprovalCoreError,
    ) -> HookResult {
        let _ = (request, error);
        Ok(())
    }

    /// React to an instance being approved
    async fn on_approved(&self, context: &ApprovalContext) -> HookResult;

    /// React to an instance being rejected
    async fn on_rejected(&self, context: &ApprovalContext) -> HookResult;

    /// React to an instance being cancelled
    async fn on_cancelled(&self, context: &ApprovalContext) -> HookResult;

    /// React to a status tag outside the recognized set
    ///
    /// Required so every type decides explicitly what an unrecognized status
    /// means for it; an unknown status is not an error.
    async fn on_unknown_status(&self, context: &ApprovalContext) -> HookResult;

    /// Catch-all for errors raised inside any status reaction
    ///
    /// Invoked exactly once with the original error. If this hook itself
    /// fails, the dispatcher logs and suppresses the failure so the webhook
    /// caller never sees a business-logic bug as a retryable fault.
    async fn on_business_exception(
        &self,
        context: &ApprovalContext,
        error: &anyhow::Error,
    ) -> HookResult {
        let _ = (context, error);
        Ok(())
    }

    /// Get the handler name for identification
    ///
    /// Used for logging and debugging purposes. Default implementation
    /// returns the type name.
    fn handler_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
