//! # Structured Error Handling
//!
//! Central error taxonomy for the approval dispatch core. Pre-create failures
//! (`Validation`, `PreProcess`, `CreationFailed`, `Cancelled`) always surface
//! to the caller of `create`; post-create failures never do (they degrade to
//! warnings on the successful outcome). Handler business errors are plain
//! `anyhow::Error` values and are wrapped into these variants at the point
//! where the core classifies them.

use crate::orchestration::lifecycle::CreatePhase;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApprovalCoreError {
    /// No handler descriptor exists for the requested approval type
    #[error("no handler registered for approval type '{type_id}'")]
    UnregisteredHandler { type_id: String },

    /// No resolution strategy produced a registry-known approval type.
    /// Terminal and non-retryable: the event cannot be routed.
    #[error("unable to resolve an approval type for callback instance '{instance_id}'")]
    UnresolvedCallbackType { instance_id: String },

    /// Handler validation rejected the request before any side effect
    #[error("validation failed for approval type '{type_id}': {error}")]
    Validation {
        type_id: String,
        error: anyhow::Error,
    },

    /// Handler preprocessing failed before the remote create call
    #[error("preprocessing failed for approval type '{type_id}': {error}")]
    PreProcess {
        type_id: String,
        error: anyhow::Error,
    },

    /// The remote platform refused or failed the create call
    #[error("remote creation failed for approval type '{type_id}': {error}")]
    CreationFailed {
        type_id: String,
        error: anyhow::Error,
    },

    /// The caller's cancellation signal fired before the remote instance
    /// existed; treated like any other pre-create failure
    #[error("approval create cancelled at phase {phase}")]
    Cancelled { phase: CreatePhase },

    /// Invalid core configuration or registration input
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApprovalCoreError {
    /// Stable classification label for logging and event payloads
    pub fn classification(&self) -> &'static str {
        match self {
            Self::UnregisteredHandler { .. } => "unregistered_handler",
            Self::UnresolvedCallbackType { .. } => "unresolved_callback_type",
            Self::Validation { .. } => "validation",
            Self::PreProcess { .. } => "pre_process",
            Self::CreationFailed { .. } => "creation_failed",
            Self::Cancelled { .. } => "cancelled",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Check if this error occurred before the remote instance was created
    pub fn is_pre_create(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::PreProcess { .. }
                | Self::CreationFailed { .. }
                | Self::Cancelled { .. }
        )
    }
}

impl From<config::ConfigError> for ApprovalCoreError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApprovalCoreError>;
