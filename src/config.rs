//! # Configuration Management
//!
//! Core settings with environment-variable overrides. Defaults are embedded;
//! any field can be overridden via `APPROVAL_CORE__*` variables, e.g.
//! `APPROVAL_CORE__EVENT_CHANNEL_CAPACITY=4096` or
//! `APPROVAL_CORE__RESOLVE_VIA_LOOKUP=false`.

use crate::error::{ApprovalCoreError, Result};
use serde::{Deserialize, Serialize};

/// Settings for the approval dispatch core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalCoreConfig {
    /// Execution environment (development, test, production)
    pub environment: String,

    /// Capacity of the broadcast channel behind the event publisher
    pub event_channel_capacity: usize,

    /// Segment separator for the instance-id resolution heuristic
    pub instance_id_separator: String,

    /// Whether the resolver may scan callback payloads for a type key
    pub resolve_via_payload: bool,

    /// Whether the resolver may consult the persistence collaborator
    pub resolve_via_lookup: bool,
}

impl Default for ApprovalCoreConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            event_channel_capacity: 1000,
            instance_id_separator: "_".to_string(),
            resolve_via_payload: true,
            resolve_via_lookup: true,
        }
    }
}

impl ApprovalCoreConfig {
    /// Load configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(
                config::Environment::with_prefix("APPROVAL_CORE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate settings that have no sensible zero value
    pub fn validate(&self) -> Result<()> {
        if self.event_channel_capacity == 0 {
            return Err(ApprovalCoreError::Configuration(
                "event_channel_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
