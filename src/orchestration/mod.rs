//! # Approval Orchestration
//!
//! The dispatch engine of the core: lifecycle orchestration for create calls
//! and the status state machine for inbound callbacks, both delegating every
//! step to the handler the registry resolved.
//!
//! ## Core Components
//!
//! - **ApprovalCore**: facade owning registry, resolver, and both engines
//! - **ApprovalOrchestrator**: validate -> preprocess -> remote create ->
//!   postprocess, with the documented pre/post-create failure asymmetry
//! - **CallbackDispatcher**: approved/rejected/cancelled/unknown routing with
//!   business-exception containment
//! - **ApprovalHandler**: the contract independent teams implement per type

pub mod core;
pub mod dispatcher;
pub mod handler;
pub mod lifecycle;
pub mod orchestrator;
pub mod types;

pub use self::core::{ApprovalCore, ApprovalCoreBuilder};
pub use dispatcher::{CallbackDispatcher, DispatchOutcome};
pub use handler::{ApprovalHandler, HookResult};
pub use lifecycle::CreatePhase;
pub use orchestrator::ApprovalOrchestrator;
pub use types::{
    ApprovalContext, ApprovalPayload, ApprovalRequest, ApprovalTypeId, CallbackEvent,
    CreateOutcome, CreateResult,
};
