#![allow(clippy::doc_markdown)] // Allow technical terms in docs without backticks
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Approval Core
//!
//! Type registry and dispatch core for integrating a third-party approval
//! workflow platform into a host application.
//!
//! ## Overview
//!
//! Independent teams plug business logic in per approval *type* without
//! touching the shared dispatch path. The core decides *which* handler runs
//! and *in what order* lifecycle steps execute; it performs no HTTP I/O and
//! persists nothing. The remote API client and any storage are collaborator
//! traits implemented by the host.
//!
//! ## Architecture
//!
//! - **Create path**: `create(payload)` resolves the payload type's handler,
//!   then drives validate -> preprocess -> remote create -> postprocess.
//!   Failures before the remote instance exists are fatal; postprocess
//!   failures degrade to a warning on the successful outcome.
//! - **Callback path**: an inbound webhook event is resolved to an approval
//!   type (explicit tag, instance-id convention, payload scan, or persisted
//!   mapping), then its status routes to exactly one handler hook. Handler
//!   failures are contained behind the business-exception hook so the
//!   webhook endpoint never reports a business bug as a retryable fault.
//!
//! ## Module Organization
//!
//! - [`registry`] - approval type to handler binding with last-wins semantics
//! - [`resolver`] - type recovery for inbound callbacks
//! - [`orchestration`] - create lifecycle, callback state machine, facade
//! - [`client`] - remote platform collaborator traits
//! - [`events`] - broadcast event stream for observability
//! - [`config`] - configuration management
//! - [`error`] - structured error handling
//! - [`logging`] - structured tracing initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use approval_core::client::{InstanceDetail, RemoteApprovalClient};
//! use approval_core::orchestration::{
//!     ApprovalContext, ApprovalCore, ApprovalHandler, ApprovalPayload, ApprovalRequest,
//!     ApprovalTypeId, CreateResult, HookResult,
//! };
//! use async_trait::async_trait;
//! use serde::Serialize;
//! use std::sync::Arc;
//!
//! #[derive(Serialize)]
//! struct LeaveRequest {
//!     employee: String,
//!     days: u32,
//! }
//!
//! impl ApprovalPayload for LeaveRequest {
//!     fn approval_type() -> ApprovalTypeId {
//!         ApprovalTypeId::new("leave_approval")
//!     }
//! }
//!
//! struct LeaveHandler;
//!
//! #[async_trait]
//! impl ApprovalHandler for LeaveHandler {
//!     async fn validate(&self, request: &ApprovalRequest) -> HookResult {
//!         let days = request.payload["days"].as_u64().unwrap_or(0);
//!         anyhow::ensure!(days > 0, "leave must cover at least one day");
//!         Ok(())
//!     }
//!     async fn on_approved(&self, _context: &ApprovalContext) -> HookResult {
//!         Ok(())
//!     }
//!     async fn on_rejected(&self, _context: &ApprovalContext) -> HookResult {
//!         Ok(())
//!     }
//!     async fn on_cancelled(&self, _context: &ApprovalContext) -> HookResult {
//!         Ok(())
//!     }
//!     async fn on_unknown_status(&self, _context: &ApprovalContext) -> HookResult {
//!         Ok(())
//!     }
//! }
//!
//! struct PlatformClient;
//!
//! #[async_trait]
//! impl RemoteApprovalClient for PlatformClient {
//!     async fn create_instance(&self, _request: &ApprovalRequest) -> anyhow::Result<CreateResult> {
//!         Ok(CreateResult::accepted("I-1"))
//!     }
//!     async fn get_instance(&self, instance_id: &str) -> anyhow::Result<InstanceDetail> {
//!         Ok(InstanceDetail {
//!             instance_id: instance_id.to_string(),
//!             status: "pending".to_string(),
//!             raw: None,
//!         })
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let core = ApprovalCore::builder()
//!     .client(Arc::new(PlatformClient))
//!     .build()?;
//! core.register::<LeaveRequest>(Arc::new(LeaveHandler)).await?;
//!
//! let outcome = core
//!     .create(&LeaveRequest { employee: "a.chen".to_string(), days: 3 })
//!     .await?;
//! println!("created instance {}", outcome.result.instance_id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod orchestration;
pub mod registry;
pub mod resolver;

pub use config::ApprovalCoreConfig;
pub use constants::CallbackStatus;
pub use error::{ApprovalCoreError, Result};
pub use events::{ApprovalEvent, EventPublisher};
pub use orchestration::{
    ApprovalContext, ApprovalCore, ApprovalCoreBuilder, ApprovalHandler, ApprovalOrchestrator,
    ApprovalPayload, ApprovalRequest, ApprovalTypeId, CallbackDispatcher, CallbackEvent,
    CreateOutcome, CreatePhase, CreateResult, DispatchOutcome, HookResult,
};
pub use registry::{HandlerRegistry, RegistryStats};
pub use resolver::{InstanceTypeLookup, ResolutionStrategy, ResolvedType, TypeResolver};
