//! # Create Lifecycle Phases
//!
//! Phase tracking for the strictly sequential create state machine:
//! `Start -> Validated -> PreProcessed -> Created -> PostProcessed`, with
//! `Failed` reachable from any pre-create phase. Used for transition logging
//! and for classifying where a cancellation or failure occurred.

use serde::{Deserialize, Serialize};

/// Phases of a single create invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatePhase {
    /// Request accepted, nothing executed yet
    Start,
    /// Handler validation passed
    Validated,
    /// Handler preprocessing completed (request may have been normalized)
    PreProcessed,
    /// Remote platform accepted the create call
    Created,
    /// Postprocess hook completed; terminal success
    PostProcessed,
    /// Terminal failure before the remote instance existed
    Failed,
}

impl CreatePhase {
    /// Get a string representation of the phase for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Validated => "validated",
            Self::PreProcessed => "pre_processed",
            Self::Created => "created",
            Self::PostProcessed => "post_processed",
            Self::Failed => "failed",
        }
    }

    /// Check if this phase is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PostProcessed | Self::Failed)
    }

    /// Check if the remote side effect has already happened by this phase
    pub fn is_post_create(&self) -> bool {
        matches!(self, Self::Created | Self::PostProcessed)
    }
}

impl std::fmt::Display for CreatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
