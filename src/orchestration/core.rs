//! # Approval Core Facade
//!
//! The exposed surface of the dispatch core: a single value owning the
//! registry, resolver, orchestrator, dispatcher, and event publisher. No
//! ambient globals; hosts construct one core (usually at startup) and pass
//! it wherever requests and webhooks arrive.
//!
//! ## Control Flow
//!
//! ```text
//! create(payload)           HandlerRegistry ──▶ ApprovalOrchestrator ──▶ RemoteApprovalClient
//! handle_callback(event)    TypeResolver ──▶ HandlerRegistry ──▶ CallbackDispatcher
//! ```
//!
//! `create` and `handle_callback` are independently and concurrently
//! callable; they share only the read-mostly registry.

use crate::client::RemoteApprovalClient;
use crate::config::ApprovalCoreConfig;
use crate::error::{ApprovalCoreError, Result};
use crate::events::{ApprovalEvent, EventPublisher};
use crate::orchestration::dispatcher::{CallbackDispatcher, DispatchOutcome};
use crate::orchestration::handler::ApprovalHandler;
use crate::orchestration::orchestrator::ApprovalOrchestrator;
use crate::orchestration::types::{
    ApprovalPayload, ApprovalRequest, ApprovalTypeId, CallbackEvent, CreateOutcome,
};
use crate::registry::HandlerRegistry;
use crate::resolver::{InstanceTypeLookup, TypeResolver};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// The approval dispatch core
///
/// Cheap to clone; clones share the registry and event channel.
#[derive(Clone)]
pub struct ApprovalCore {
    config: ApprovalCoreConfig,
    registry: HandlerRegistry,
    resolver: TypeResolver,
    orchestrator: ApprovalOrchestrator,
    dispatcher: CallbackDispatcher,
    event_publisher: EventPublisher,
}

impl ApprovalCore {
    /// Start building a core; the remote client is the only required piece
    pub fn builder() -> ApprovalCoreBuilder {
        ApprovalCoreBuilder::new()
    }

    /// Register a handler under the approval type its payload type names
    pub async fn register<T: ApprovalPayload>(
        &self,
        handler: Arc<dyn ApprovalHandler>,
    ) -> Result<()> {
        self.registry.register(T::approval_type(), handler).await
    }

    /// Register a handler under an explicit approval type id
    pub async fn register_handler(
        &self,
        type_id: impl Into<ApprovalTypeId>,
        handler: Arc<dyn ApprovalHandler>,
    ) -> Result<()> {
        self.registry.register(type_id, handler).await
    }

    /// Create one approval instance for a typed payload
    pub async fn create<T: ApprovalPayload>(&self, payload: &T) -> Result<CreateOutcome> {
        self.create_cancellable(payload, &CancellationToken::new())
            .await
    }

    /// Create one approval instance, honoring a caller-owned cancellation
    /// signal between lifecycle phases
    pub async fn create_cancellable<T: ApprovalPayload>(
        &self,
        payload: &T,
        cancel: &CancellationToken,
    ) -> Result<CreateOutcome> {
        let type_id = T::approval_type();
        let handler = self.registry.resolve(type_id.as_str()).await.ok_or_else(|| {
            ApprovalCoreError::UnregisteredHandler {
                type_id: type_id.to_string(),
            }
        })?;

        let request = ApprovalRequest::from_payload(payload).map_err(|err| {
            ApprovalCoreError::Validation {
                type_id: type_id.to_string(),
                error: anyhow::Error::new(err),
            }
        })?;

        self.orchestrator.create(handler, request, cancel).await
    }

    /// Route an inbound callback whose approval type must be resolved first
    ///
    /// Errors indicate dispatch could not be *routed* (unresolvable type,
    /// unregistered handler); business-logic failures inside the handler are
    /// contained and reported on the outcome instead.
    pub async fn handle_callback(&self, event: CallbackEvent) -> Result<DispatchOutcome> {
        let resolved = self.resolver.resolve(&event).await.ok_or_else(|| {
            ApprovalCoreError::UnresolvedCallbackType {
                instance_id: event.instance_id.clone(),
            }
        })?;
        self.handle_callback_for(resolved.type_id.as_str(), event)
            .await
    }

    /// Route an inbound callback for an explicitly known approval type
    pub async fn handle_callback_for(
        &self,
        type_id: &str,
        event: CallbackEvent,
    ) -> Result<DispatchOutcome> {
        let handler = self.registry.resolve(type_id).await.ok_or_else(|| {
            ApprovalCoreError::UnregisteredHandler {
                type_id: type_id.to_string(),
            }
        })?;
        Ok(self.dispatcher.dispatch(handler, event).await)
    }

    /// Check whether an approval type has a registered handler
    pub async fn is_supported(&self, type_id: &str) -> bool {
        self.registry.is_registered(type_id).await
    }

    /// List registered approval types, sorted; snapshot semantics
    pub async fn list_supported_types(&self) -> Vec<String> {
        self.registry.list_registered().await
    }

    /// Subscribe to the core's structured event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<ApprovalEvent> {
        self.event_publisher.subscribe()
    }

    /// The registry backing this core
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The configuration this core was built with
    pub fn config(&self) -> &ApprovalCoreConfig {
        &self.config
    }
}

/// Builder assembling an [`ApprovalCore`] from its collaborators
#[derive(Default)]
pub struct ApprovalCoreBuilder {
    client: Option<Arc<dyn RemoteApprovalClient>>,
    lookup: Option<Arc<dyn InstanceTypeLookup>>,
    config: Option<ApprovalCoreConfig>,
}

impl ApprovalCoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The remote platform client (required)
    pub fn client(mut self, client: Arc<dyn RemoteApprovalClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Optional persistence collaborator for instance-to-type resolution
    pub fn instance_type_lookup(mut self, lookup: Arc<dyn InstanceTypeLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Explicit configuration; defaults apply when omitted
    pub fn config(mut self, config: ApprovalCoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<ApprovalCore> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let client = self.client.ok_or_else(|| {
            ApprovalCoreError::Configuration(
                "a remote approval client is required to build the core".to_string(),
            )
        })?;

        let event_publisher = EventPublisher::new(config.event_channel_capacity);
        let registry = HandlerRegistry::with_event_publisher(event_publisher.clone());

        let mut resolver = TypeResolver::with_config(registry.clone(), &config)
            .with_event_publisher(event_publisher.clone());
        if let Some(lookup) = self.lookup {
            resolver = resolver.with_lookup(lookup);
        }

        let orchestrator =
            ApprovalOrchestrator::with_event_publisher(client, event_publisher.clone());
        let dispatcher = CallbackDispatcher::with_event_publisher(event_publisher.clone());

        info!(
            environment = %config.environment,
            "Approval dispatch core assembled"
        );

        Ok(ApprovalCore {
            config,
            registry,
            resolver,
            orchestrator,
            dispatcher,
            event_publisher,
        })
    }
}
