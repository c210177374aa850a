//! # Event System Foundation
//!
//! Broadcast-channel publication of structured events for every registration,
//! resolution attempt, lifecycle transition, and dispatch outcome. Consumers
//! (metrics bridges, audit sinks) subscribe through [`EventPublisher`];
//! nothing in the core depends on anyone listening.

pub mod publisher;

pub use publisher::{ApprovalEvent, EventPublisher, PublishError};

/// Canonical event names published by the core
pub mod names {
    pub const HANDLER_REGISTERED: &str = "approval.handler.registered";
    pub const HANDLER_OVERWRITTEN: &str = "approval.handler.overwritten";
    pub const TYPE_RESOLVED: &str = "approval.type.resolved";
    pub const TYPE_UNRESOLVED: &str = "approval.type.unresolved";
    pub const CREATE_PHASE_COMPLETED: &str = "approval.create.phase_completed";
    pub const CREATE_FAILED: &str = "approval.create.failed";
    pub const CREATE_POSTPROCESS_WARNING: &str = "approval.create.postprocess_warning";
    pub const CALLBACK_DISPATCHED: &str = "approval.callback.dispatched";
    pub const CALLBACK_BUSINESS_EXCEPTION: &str = "approval.callback.business_exception";
}
