//! # Registry Infrastructure
//!
//! The lookup table from approval type to handler implementation. This is
//! deliberately separate from orchestration: the registry decides *which*
//! handler serves a type, the orchestrator and dispatcher decide *when* its
//! hooks run.
//!
//! ## Architecture
//!
//! ```text
//! Registration (startup)          Dispatch (runtime)
//! ────────────────────────        ───────────────────────────
//! register(type_id, handler) ──▶  HandlerRegistry ◀── resolve(type_id)
//!                                  (RwLock<HashMap>)
//! ```

pub mod handler_registry;

pub use handler_registry::{HandlerRegistry, RegisteredHandler, RegistryStats};
