//! # Remote Platform Collaborator Traits
//!
//! Interfaces implemented outside this core by the HTTP client that talks to
//! the remote approval platform. The core never performs I/O itself; token
//! injection, retries, and request logging all live behind these traits.

use crate::orchestration::types::{ApprovalRequest, CreateResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Detail of one remote approval instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDetail {
    /// Remote-assigned instance identifier
    pub instance_id: String,

    /// Current status tag as reported by the platform
    pub status: String,

    /// Raw detail body, when the client preserves it
    #[serde(default)]
    pub raw: Option<Value>,
}

/// Client for the remote approval platform API
///
/// Implementations own transport concerns entirely; the orchestrator calls
/// `create_instance` exactly once per create invocation and applies no
/// retries of its own.
#[async_trait]
pub trait RemoteApprovalClient: Send + Sync {
    /// Submit a new approval instance to the remote platform
    ///
    /// # Returns
    ///
    /// * `Ok(CreateResult)` - The platform's answer, including refusals
    ///   (`success == false`)
    /// * `Err` - Transport or protocol failure
    async fn create_instance(&self, request: &ApprovalRequest) -> anyhow::Result<CreateResult>;

    /// Fetch the current detail of an existing instance
    async fn get_instance(&self, instance_id: &str) -> anyhow::Result<InstanceDetail>;
}
