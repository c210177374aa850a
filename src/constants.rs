//! # Shared Constants and Status Tags
//!
//! Canonical status vocabulary for callback events received from the remote
//! approval platform, plus helpers for normalizing the open-ended tag set the
//! platform sends over the wire.

use serde::{Deserialize, Serialize};

/// Raw status tags as they appear in callback payloads
pub mod status_tags {
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
    pub const CANCELLED: &str = "cancelled";
    /// US spelling variant observed from some platform tenants
    pub const CANCELED: &str = "canceled";
}

/// Normalized callback status driving handler dispatch
///
/// The wire value is an open set of strings; anything outside the recognized
/// tags (including empty or missing values) normalizes to `Unknown` and is
/// routed to the handler's unknown-status hook rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackStatus {
    Approved,
    Rejected,
    Cancelled,
    Unknown,
}

impl CallbackStatus {
    /// Normalize a raw wire tag; matching is case-insensitive
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            status_tags::APPROVED => Self::Approved,
            status_tags::REJECTED => Self::Rejected,
            status_tags::CANCELLED | status_tags::CANCELED => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    /// Get a string representation of the status for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Check if this status represents a terminal decision on the instance
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for CallbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
