//! # Approval Create Orchestrator
//!
//! Drives the create lifecycle for one approval instance: validate,
//! preprocess, remote create, postprocess, with a best-effort failure hook on
//! the pre-create path.
//!
//! ## Failure Asymmetry
//!
//! Errors before the remote instance exists (validate, preprocess, the create
//! call itself, cancellation) are fatal and surface to the caller after the
//! handler's failure hook ran. Errors after creation (postprocess) degrade to
//! a warning on the successful outcome: once the remote instance exists,
//! failing the whole call would hide a real side effect from the caller.
//!
//! The orchestrator is strictly sequential and applies no retries; retry
//! policy belongs to the remote client collaborator.

use crate::client::RemoteApprovalClient;
use crate::error::{ApprovalCoreError, Result};
use crate::events::{names, EventPublisher};
use crate::orchestration::handler::ApprovalHandler;
use crate::orchestration::lifecycle::CreatePhase;
use crate::orchestration::types::{ApprovalRequest, CreateOutcome};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Create-lifecycle driver, agnostic of any handler's internal logic
#[derive(Clone)]
pub struct ApprovalOrchestrator {
    client: Arc<dyn RemoteApprovalClient>,
    event_publisher: Option<EventPublisher>,
}

impl ApprovalOrchestrator {
    /// Create an orchestrator over the given remote client
    pub fn new(client: Arc<dyn RemoteApprovalClient>) -> Self {
        Self {
            client,
            event_publisher: None,
        }
    }

    /// Create an orchestrator that publishes lifecycle events
    pub fn with_event_publisher(
        client: Arc<dyn RemoteApprovalClient>,
        event_publisher: EventPublisher,
    ) -> Self {
        Self {
            client,
            event_publisher: Some(event_publisher),
        }
    }

    /// Run the full create lifecycle for one request
    ///
    /// The remote create call is invoked at most once per invocation. The
    /// cancellation token is honored between phases and while the remote call
    /// is in flight; cancellation after the remote instance exists is
    /// advisory only.
    #[instrument(skip_all, fields(type_id = %request.type_id))]
    pub async fn create(
        &self,
        handler: Arc<dyn ApprovalHandler>,
        mut request: ApprovalRequest,
        cancel: &CancellationToken,
    ) -> Result<CreateOutcome> {
        let trace_id = Uuid::new_v4().to_string();
        info!(
            trace_id = %trace_id,
            type_id = %request.type_id,
            handler = handler.handler_name(),
            "Starting approval create lifecycle"
        );

        if cancel.is_cancelled() {
            let err = ApprovalCoreError::Cancelled {
                phase: CreatePhase::Start,
            };
            return self.fail(&handler, &request, &trace_id, err).await;
        }

        if let Err(cause) = handler.validate(&request).await {
            let err = ApprovalCoreError::Validation {
                type_id: request.type_id.to_string(),
                error: cause,
            };
            return self.fail(&handler, &request, &trace_id, err).await;
        }
        self.phase_completed(&trace_id, &request, CreatePhase::Validated)
            .await;

        if cancel.is_cancelled() {
            let err = ApprovalCoreError::Cancelled {
                phase: CreatePhase::Validated,
            };
            return self.fail(&handler, &request, &trace_id, err).await;
        }

        if let Err(cause) = handler.pre_process(&mut request).await {
            let err = ApprovalCoreError::PreProcess {
                type_id: request.type_id.to_string(),
                error: cause,
            };
            return self.fail(&handler, &request, &trace_id, err).await;
        }
        self.phase_completed(&trace_id, &request, CreatePhase::PreProcessed)
            .await;

        let created = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let err = ApprovalCoreError::Cancelled {
                    phase: CreatePhase::PreProcessed,
                };
                return self.fail(&handler, &request, &trace_id, err).await;
            }
            created = self.client.create_instance(&request) => created,
        };

        let result = match created {
            Ok(result) if result.success => result,
            Ok(result) => {
                let err = ApprovalCoreError::CreationFailed {
                    type_id: request.type_id.to_string(),
                    error: anyhow::anyhow!(
                        "remote platform refused the request (instance '{}')",
                        result.instance_id
                    ),
                };
                return self.fail(&handler, &request, &trace_id, err).await;
            }
            Err(cause) => {
                let err = ApprovalCoreError::CreationFailed {
                    type_id: request.type_id.to_string(),
                    error: cause,
                };
                return self.fail(&handler, &request, &trace_id, err).await;
            }
        };
        self.phase_completed(&trace_id, &request, CreatePhase::Created)
            .await;

        // Post-create errors are advisory: the remote side effect already
        // happened, so the caller still gets a success with a warning.
        let postprocess_warning = match handler.post_process(&request, &result).await {
            Ok(()) => None,
            Err(cause) => {
                warn!(
                    trace_id = %trace_id,
                    type_id = %request.type_id,
                    instance_id = %result.instance_id,
                    error = %cause,
                    "Postprocess failed after successful remote create; surfacing as warning"
                );
                self.publish(
                    names::CREATE_POSTPROCESS_WARNING,
                    json!({
                        "trace_id": trace_id,
                        "type_id": request.type_id.as_str(),
                        "instance_id": result.instance_id,
                        "error": format!("{cause:#}"),
                    }),
                )
                .await;
                Some(format!("{cause:#}"))
            }
        };
        self.phase_completed(&trace_id, &request, CreatePhase::PostProcessed)
            .await;

        info!(
            trace_id = %trace_id,
            type_id = %request.type_id,
            instance_id = %result.instance_id,
            "Approval create lifecycle completed"
        );

        Ok(CreateOutcome {
            result,
            postprocess_warning,
        })
    }

    /// Pre-create failure path: best-effort failure hook, then propagate the
    /// original error unchanged
    async fn fail(
        &self,
        handler: &Arc<dyn ApprovalHandler>,
        request: &ApprovalRequest,
        trace_id: &str,
        err: ApprovalCoreError,
    ) -> Result<CreateOutcome> {
        error!(
            trace_id = %trace_id,
            type_id = %request.type_id,
            classification = err.classification(),
            error = %err,
            "Approval create failed before remote instance existed"
        );

        if let Err(hook_err) = handler.on_create_failure(request, &err).await {
            warn!(
                trace_id = %trace_id,
                type_id = %request.type_id,
                error = %hook_err,
                "on_create_failure hook failed; original error preserved"
            );
        }

        self.publish(
            names::CREATE_FAILED,
            json!({
                "trace_id": trace_id,
                "type_id": request.type_id.as_str(),
                "classification": err.classification(),
            }),
        )
        .await;

        Err(err)
    }

    async fn phase_completed(
        &self,
        trace_id: &str,
        request: &ApprovalRequest,
        phase: CreatePhase,
    ) {
        debug!(
            trace_id = %trace_id,
            type_id = %request.type_id,
            phase = phase.as_str(),
            "Create lifecycle phase completed"
        );
        self.publish(
            names::CREATE_PHASE_COMPLETED,
            json!({
                "trace_id": trace_id,
                "type_id": request.type_id.as_str(),
                "phase": phase.as_str(),
            }),
        )
        .await;
    }

    async fn publish(&self, event_name: &str, context: serde_json::Value) {
        if let Some(publisher) = &self.event_publisher {
            let _ = publisher.publish(event_name, context).await;
        }
    }
}
