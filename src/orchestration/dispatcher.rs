//! # Callback Dispatcher
//!
//! Maps a callback's status tag to exactly one handler hook and contains
//! every handler failure behind the business-exception hook.
//!
//! ## Containment Policy
//!
//! The remote platform's webhook retry semantics are outside this core's
//! control, so a business-logic bug inside a handler must never look like a
//! retryable endpoint failure. A hook error is caught and rerouted to
//! `on_business_exception` exactly once; if that hook also fails, the
//! dispatcher logs and suppresses. Dispatch is single-pass, at most once per
//! invocation, with no retries.

use crate::constants::CallbackStatus;
use crate::events::{names, EventPublisher};
use crate::orchestration::handler::ApprovalHandler;
use crate::orchestration::types::{ApprovalContext, CallbackEvent};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of one dispatch invocation
///
/// Reports whether dispatch itself ran, independent of business-logic
/// success: a contained handler failure still counts as dispatched.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Normalized status that selected the hook
    pub status: CallbackStatus,

    /// Correlation id of this dispatch
    pub trace_id: String,

    /// Contained business error, if the selected hook failed
    pub business_error: Option<String>,
}

/// Status state machine for inbound callbacks
#[derive(Clone, Default)]
pub struct CallbackDispatcher {
    event_publisher: Option<EventPublisher>,
}

impl CallbackDispatcher {
    pub fn new() -> Self {
        Self {
            event_publisher: None,
        }
    }

    /// Create a dispatcher that publishes dispatch outcome events
    pub fn with_event_publisher(event_publisher: EventPublisher) -> Self {
        Self {
            event_publisher: Some(event_publisher),
        }
    }

    /// Dispatch one callback event to the resolved handler
    ///
    /// The raw payload is decoded exactly once, before branching; a decode
    /// failure does not abort dispatch (hooks run with empty data and the
    /// error recorded in the context).
    pub async fn dispatch(
        &self,
        handler: Arc<dyn ApprovalHandler>,
        event: CallbackEvent,
    ) -> DispatchOutcome {
        let context = ApprovalContext::from_event(event);

        if let Some(decode_error) = &context.decode_error {
            warn!(
                trace_id = %context.trace_id,
                instance_id = %context.instance_id(),
                error = %decode_error,
                "Callback payload failed to decode; dispatching with empty data"
            );
        }

        let status = CallbackStatus::from_tag(&context.event.status);
        debug!(
            trace_id = %context.trace_id,
            instance_id = %context.instance_id(),
            status = status.as_str(),
            raw_status = %context.event.status,
            handler = handler.handler_name(),
            "Dispatching callback"
        );

        let hook_result = match status {
            CallbackStatus::Approved => handler.on_approved(&context).await,
            CallbackStatus::Rejected => handler.on_rejected(&context).await,
            CallbackStatus::Cancelled => handler.on_cancelled(&context).await,
            CallbackStatus::Unknown => handler.on_unknown_status(&context).await,
        };

        let business_error = match hook_result {
            Ok(()) => None,
            Err(cause) => {
                warn!(
                    trace_id = %context.trace_id,
                    instance_id = %context.instance_id(),
                    status = status.as_str(),
                    error = %cause,
                    "Handler raised a business exception during callback dispatch"
                );
                self.publish(
                    names::CALLBACK_BUSINESS_EXCEPTION,
                    json!({
                        "trace_id": context.trace_id,
                        "instance_id": context.instance_id(),
                        "status": status.as_str(),
                        "error": format!("{cause:#}"),
                    }),
                )
                .await;

                if let Err(hook_err) = handler.on_business_exception(&context, &cause).await {
                    error!(
                        trace_id = %context.trace_id,
                        instance_id = %context.instance_id(),
                        error = %hook_err,
                        "on_business_exception hook itself failed; suppressing"
                    );
                }

                Some(format!("{cause:#}"))
            }
        };

        info!(
            trace_id = %context.trace_id,
            instance_id = %context.instance_id(),
            status = status.as_str(),
            contained_error = business_error.is_some(),
            "Callback dispatched"
        );
        self.publish(
            names::CALLBACK_DISPATCHED,
            json!({
                "trace_id": context.trace_id,
                "instance_id": context.instance_id(),
                "status": status.as_str(),
                "contained_error": business_error.is_some(),
            }),
        )
        .await;

        DispatchOutcome {
            status,
            trace_id: context.trace_id.clone(),
            business_error,
        }
    }

    async fn publish(&self, event_name: &str, context: serde_json::Value) {
        if let Some(publisher) = &self.event_publisher {
            let _ = publisher.publish(event_name, context).await;
        }
    }
}
