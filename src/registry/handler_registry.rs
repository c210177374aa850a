//! # Approval Handler Registry
//!
//! In-memory registry binding approval type identifiers to handler
//! implementations with thread-safe management.
//!
//! ## Overview
//!
//! The HandlerRegistry is the single authority for which handler serves which
//! approval type. It holds no business logic: registration and O(1) lookup
//! only. Absence is a value (`None`), never an error, so orchestration code
//! branches explicitly and raises its own typed error.
//!
//! ## Key Features
//!
//! - **Thread-safe registration** using RwLock for concurrent access
//! - **Last-wins semantics** for duplicate registration, with a diagnostic
//!   on every overwrite
//! - **Typed resolution** deriving the type id from the payload type's
//!   compile-time capability
//! - **Snapshot introspection** for tooling (`list_registered`, `stats`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use approval_core::registry::HandlerRegistry;
//! use approval_core::orchestration::handler::ApprovalHandler;
//! use std::sync::Arc;
//!
//! # async fn example(handler: Arc<dyn ApprovalHandler>) -> approval_core::error::Result<()> {
//! let registry = HandlerRegistry::new();
//! registry.register("leave_approval", handler).await?;
//!
//! assert!(registry.is_registered("leave_approval").await);
//! assert_eq!(registry.list_registered().await, vec!["leave_approval".to_string()]);
//! # Ok(())
//! # }
//! ```

use crate::error::{ApprovalCoreError, Result};
use crate::events::{names, EventPublisher};
use crate::orchestration::handler::ApprovalHandler;
use crate::orchestration::types::{ApprovalPayload, ApprovalTypeId};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Descriptor stored per registered approval type
#[derive(Clone)]
pub struct RegisteredHandler {
    /// The handler implementation serving this type
    pub handler: Arc<dyn ApprovalHandler>,
    /// When this registration happened
    pub registered_at: DateTime<Utc>,
}

/// Registry statistics snapshot
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_handlers: usize,
    pub type_ids: Vec<String>,
}

/// Registry binding approval types to handler implementations
///
/// Cheap to clone; clones share the same underlying table. Writes are
/// expected at startup, reads on every dispatch. A registration becomes
/// visible to subsequent lookups but never retroactively to in-flight
/// dispatches that already captured a handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Arc<RwLock<HashMap<ApprovalTypeId, RegisteredHandler>>>,
    event_publisher: Option<EventPublisher>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_publisher: None,
        }
    }

    /// Create a new registry that publishes registration events
    pub fn with_event_publisher(event_publisher: EventPublisher) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_publisher: Some(event_publisher),
        }
    }

    /// Register a handler for an approval type
    ///
    /// Idempotent with documented last-wins semantics: registering a second
    /// handler for the same type replaces the first and emits a diagnostic.
    pub async fn register(
        &self,
        type_id: impl Into<ApprovalTypeId>,
        handler: Arc<dyn ApprovalHandler>,
    ) -> Result<()> {
        let type_id = type_id.into();
        if type_id.is_empty() {
            return Err(ApprovalCoreError::Configuration(
                "handler registration requires a non-empty approval type id".to_string(),
            ));
        }

        let entry = RegisteredHandler {
            handler,
            registered_at: Utc::now(),
        };

        let previous = {
            let mut handlers = self.handlers.write().await;
            handlers.insert(type_id.clone(), entry)
        };

        if previous.is_some() {
            warn!(
                type_id = %type_id,
                "Overwriting existing handler registration (last-wins)"
            );
            self.publish(names::HANDLER_OVERWRITTEN, &type_id).await;
        } else {
            info!(type_id = %type_id, "Registered approval handler");
            self.publish(names::HANDLER_REGISTERED, &type_id).await;
        }

        Ok(())
    }

    /// Resolve the handler for an approval type
    ///
    /// Pure lookup: never errors, absence is a value. Callers raise
    /// [`ApprovalCoreError::UnregisteredHandler`] themselves when absence is
    /// fatal for them.
    pub async fn resolve(&self, type_id: &str) -> Option<Arc<dyn ApprovalHandler>> {
        let handlers = self.handlers.read().await;
        let found = handlers.get(type_id).map(|entry| entry.handler.clone());
        debug!(type_id = %type_id, found = found.is_some(), "Handler lookup");
        found
    }

    /// Resolve the handler for a payload type's associated approval type
    pub async fn resolve_typed<T: ApprovalPayload>(&self) -> Option<Arc<dyn ApprovalHandler>> {
        self.resolve(T::approval_type().as_str()).await
    }

    /// Check whether an approval type has a registered handler
    pub async fn is_registered(&self, type_id: &str) -> bool {
        let handlers = self.handlers.read().await;
        handlers.contains_key(type_id)
    }

    /// List registered approval type ids, sorted; snapshot semantics
    pub async fn list_registered(&self) -> Vec<String> {
        let handlers = self.handlers.read().await;
        let mut ids: Vec<String> = handlers.keys().map(|id| id.as_str().to_string()).collect();
        ids.sort();
        ids
    }

    /// Get registry statistics
    pub async fn stats(&self) -> RegistryStats {
        let type_ids = self.list_registered().await;
        RegistryStats {
            total_handlers: type_ids.len(),
            type_ids,
        }
    }

    async fn publish(&self, event_name: &str, type_id: &ApprovalTypeId) {
        if let Some(publisher) = &self.event_publisher {
            let _ = publisher
                .publish(event_name, json!({ "type_id": type_id.as_str() }))
                .await;
        }
    }
}
