//! # Callback Type Resolution
//!
//! Recovers a trustworthy approval type id from an inbound callback event
//! when the event's own type field is absent or cannot be used directly.
//!
//! ## Strategy Chain
//!
//! Strategies run in a fixed order; the first non-empty, registry-known
//! result wins:
//!
//! 1. **Direct field** - an explicit type tag on the event, accepted verbatim
//! 2. **Instance-id pattern** - synthesize a candidate from the first two
//!    segments of a `SEGMENT_SEGMENT_...` instance id
//! 3. **Payload scan** - parse the raw payload and look for a `type` or
//!    `approval_type` key
//! 4. **External lookup** - ask a persistence collaborator for a previously
//!    recorded instance-to-type mapping
//!
//! Strategies 2-4 are heuristics, so each candidate is filtered through the
//! authoritative registry: a heuristic must never invent a route to an
//! unintended handler. When no strategy succeeds, resolution returns `None`
//! and the caller must treat the event as unroutable.

use crate::config::ApprovalCoreConfig;
use crate::events::{names, EventPublisher};
use crate::orchestration::types::{ApprovalTypeId, CallbackEvent};
use crate::registry::HandlerRegistry;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Optional persistence collaborator for instance-to-type mappings
///
/// Implemented outside this core by whatever storage recorded the mapping
/// when the instance was created.
#[async_trait]
pub trait InstanceTypeLookup: Send + Sync {
    /// Find the approval type recorded for an instance id, if any
    async fn find_type_by_instance(&self, instance_id: &str) -> anyhow::Result<Option<String>>;
}

/// Which strategy produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    DirectField,
    InstanceIdPattern,
    PayloadScan,
    ExternalLookup,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectField => "direct_field",
            Self::InstanceIdPattern => "instance_id_pattern",
            Self::PayloadScan => "payload_scan",
            Self::ExternalLookup => "external_lookup",
        }
    }
}

/// Successful resolution outcome
#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub type_id: ApprovalTypeId,
    pub strategy: ResolutionStrategy,
}

/// Resolver recovering approval types from inbound callback events
#[derive(Clone)]
pub struct TypeResolver {
    registry: HandlerRegistry,
    lookup: Option<Arc<dyn InstanceTypeLookup>>,
    event_publisher: Option<EventPublisher>,
    instance_id_separator: String,
    resolve_via_payload: bool,
    resolve_via_lookup: bool,
}

impl TypeResolver {
    /// Create a resolver over the given registry with default settings
    pub fn new(registry: HandlerRegistry) -> Self {
        Self::with_config(registry, &ApprovalCoreConfig::default())
    }

    /// Create a resolver with explicit configuration
    pub fn with_config(registry: HandlerRegistry, config: &ApprovalCoreConfig) -> Self {
        Self {
            registry,
            lookup: None,
            event_publisher: None,
            instance_id_separator: config.instance_id_separator.clone(),
            resolve_via_payload: config.resolve_via_payload,
            resolve_via_lookup: config.resolve_via_lookup,
        }
    }

    /// Attach the optional persistence collaborator for strategy 4
    pub fn with_lookup(mut self, lookup: Arc<dyn InstanceTypeLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Attach an event publisher for resolution outcome events
    pub fn with_event_publisher(mut self, event_publisher: EventPublisher) -> Self {
        self.event_publisher = Some(event_publisher);
        self
    }

    /// Resolve the approval type for an inbound event
    ///
    /// Returns `None` when no strategy yields a usable type; the resolver
    /// never guesses.
    pub async fn resolve(&self, event: &CallbackEvent) -> Option<ResolvedType> {
        // Strategy 1: explicit type tag, accepted verbatim
        if let Some(type_id) = Self::direct_field(event) {
            return self.resolved(event, type_id, ResolutionStrategy::DirectField).await;
        }

        // Strategy 2: instance-id naming convention, registry-guarded
        if let Some(candidate) = self.instance_id_pattern(event) {
            if self.registry.is_registered(&candidate).await {
                return self
                    .resolved(event, candidate, ResolutionStrategy::InstanceIdPattern)
                    .await;
            }
            debug!(
                instance_id = %event.instance_id,
                candidate = %candidate,
                "Instance-id candidate is not a registered type; skipping"
            );
        }

        // Strategy 3: type key inside the raw payload, registry-guarded
        if self.resolve_via_payload {
            if let Some(candidate) = Self::payload_scan(event) {
                if self.registry.is_registered(&candidate).await {
                    return self
                        .resolved(event, candidate, ResolutionStrategy::PayloadScan)
                        .await;
                }
                debug!(
                    instance_id = %event.instance_id,
                    candidate = %candidate,
                    "Payload type candidate is not a registered type; skipping"
                );
            }
        }

        // Strategy 4: persisted mapping, registry-guarded
        if self.resolve_via_lookup {
            if let Some(candidate) = self.external_lookup(event).await {
                if self.registry.is_registered(&candidate).await {
                    return self
                        .resolved(event, candidate, ResolutionStrategy::ExternalLookup)
                        .await;
                }
            }
        }

        info!(
            instance_id = %event.instance_id,
            "No resolution strategy produced a registered approval type"
        );
        self.publish(names::TYPE_UNRESOLVED, json!({ "instance_id": event.instance_id }))
            .await;
        None
    }

    fn direct_field(event: &CallbackEvent) -> Option<String> {
        event
            .type_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// Candidate from the first two segments of the instance id naming
    /// convention, e.g. `leave_approval_20250801_0042` -> `leave_approval`
    fn instance_id_pattern(&self, event: &CallbackEvent) -> Option<String> {
        let sep = self.instance_id_separator.as_str();
        if sep.is_empty() {
            return None;
        }
        let segments: Vec<&str> = event.instance_id.split(sep).collect();
        if segments.len() < 2 || segments[0].is_empty() || segments[1].is_empty() {
            return None;
        }
        Some(format!("{}{}{}", segments[0], sep, segments[1]))
    }

    fn payload_scan(event: &CallbackEvent) -> Option<String> {
        let parsed: Value = serde_json::from_str(&event.payload).ok()?;
        ["type", "approval_type"]
            .iter()
            .find_map(|key| parsed.get(key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    async fn external_lookup(&self, event: &CallbackEvent) -> Option<String> {
        let lookup = self.lookup.as_ref()?;
        match lookup.find_type_by_instance(&event.instance_id).await {
            Ok(found) => found.filter(|id| !id.is_empty()),
            Err(err) => {
                warn!(
                    instance_id = %event.instance_id,
                    error = %err,
                    "Instance type lookup collaborator failed; continuing unresolved"
                );
                None
            }
        }
    }

    async fn resolved(
        &self,
        event: &CallbackEvent,
        type_id: String,
        strategy: ResolutionStrategy,
    ) -> Option<ResolvedType> {
        debug!(
            instance_id = %event.instance_id,
            type_id = %type_id,
            strategy = strategy.as_str(),
            "Resolved approval type for callback"
        );
        self.publish(
            names::TYPE_RESOLVED,
            json!({
                "instance_id": event.instance_id,
                "type_id": type_id,
                "strategy": strategy.as_str(),
            }),
        )
        .await;
        Some(ResolvedType {
            type_id: ApprovalTypeId::new(type_id),
            strategy,
        })
    }

    async fn publish(&self, event_name: &str, context: Value) {
        if let Some(publisher) = &self.event_publisher {
            let _ = publisher.publish(event_name, context).await;
        }
    }
}
