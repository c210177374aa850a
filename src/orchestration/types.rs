//! # Core Data Envelopes
//!
//! Shared types threading typed requests, raw callback data, and trace
//! metadata through the create lifecycle and callback dispatch. Contexts are
//! ephemeral: one per dispatch call, owned exclusively by that call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Identifier uniquely naming an approval type
///
/// Stable and case-sensitive; assigned once per handler. Distinct from the
/// instance identifiers the remote platform assigns to submitted requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApprovalTypeId(String);

impl ApprovalTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ApprovalTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ApprovalTypeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ApprovalTypeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::borrow::Borrow<str> for ApprovalTypeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Capability every request payload type exposes
///
/// Replaces runtime type discovery with a compile-time association: the
/// payload type itself names the approval type it belongs to.
pub trait ApprovalPayload: Serialize + Send + Sync {
    /// The approval type this payload belongs to
    fn approval_type() -> ApprovalTypeId
    where
        Self: Sized;
}

/// Erased request envelope submitted to the orchestrator
///
/// Built from any [`ApprovalPayload`]; immutable once submitted except that
/// a handler's preprocess hook may normalize the payload in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Approval type this request targets
    pub type_id: ApprovalTypeId,

    /// Serialized payload as submitted by the caller
    pub payload: Value,
}

impl ApprovalRequest {
    /// Build a request envelope from a typed payload
    pub fn from_payload<T: ApprovalPayload>(payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            type_id: T::approval_type(),
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Decode the envelope back into a typed payload
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Status-change notification received from the remote platform
///
/// Semi-structured and untrusted: the type tag is optional, the status is an
/// open string set, and the payload is an opaque form blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackEvent {
    /// Approval type tag, when the platform includes one
    #[serde(default)]
    pub type_id: Option<String>,

    /// Remote-assigned instance identifier
    pub instance_id: String,

    /// Raw status tag; open set, normalized at dispatch time
    #[serde(default)]
    pub status: String,

    /// Raw form/payload blob as received
    #[serde(default)]
    pub payload: String,
}

impl CallbackEvent {
    pub fn new(instance_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            type_id: None,
            instance_id: instance_id.into(),
            status: status.into(),
            payload: String::new(),
        }
    }

    pub fn with_type_id(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// Per-dispatch data envelope handed to callback hooks
///
/// Combines the raw event, the decoded payload, and trace metadata. Created
/// once per dispatch call and discarded afterwards; never shared across
/// concurrent callbacks.
#[derive(Debug, Clone)]
pub struct ApprovalContext {
    /// Correlation identifier for all log and event records of this dispatch
    pub trace_id: String,

    /// The raw callback event as received
    pub event: CallbackEvent,

    /// Payload decoded as structured data; `Value::Null` when the blob was
    /// empty or failed to parse
    pub data: Value,

    /// Decode failure detail, so handlers can distinguish a genuinely empty
    /// payload from a malformed one
    pub decode_error: Option<String>,

    /// When this dispatch call was constructed
    pub received_at: DateTime<Utc>,
}

impl ApprovalContext {
    /// Build a context from an inbound event, decoding the payload exactly
    /// once. Decode failure does not abort: hooks still run with `Null` data
    /// and the error recorded.
    pub fn from_event(event: CallbackEvent) -> Self {
        let (data, decode_error) = if event.payload.trim().is_empty() {
            (Value::Null, None)
        } else {
            match serde_json::from_str(&event.payload) {
                Ok(value) => (value, None),
                Err(err) => (Value::Null, Some(err.to_string())),
            }
        };

        Self {
            trace_id: Uuid::new_v4().to_string(),
            event,
            data,
            decode_error,
            received_at: Utc::now(),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.event.instance_id
    }
}

/// Result of the remote create call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResult {
    /// Remote-assigned instance identifier
    pub instance_id: String,

    /// Whether the remote platform accepted the request
    pub success: bool,

    /// Raw response body, when the client preserves it
    #[serde(default)]
    pub raw: Option<Value>,
}

impl CreateResult {
    pub fn accepted(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            success: true,
            raw: None,
        }
    }

    pub fn refused() -> Self {
        Self {
            instance_id: String::new(),
            success: false,
            raw: None,
        }
    }
}

/// Outcome returned to `create` callers
///
/// Success always carries the create result; a postprocess failure is
/// attached as a warning instead of failing the call, because the remote
/// side effect already happened.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// The successful remote create result
    pub result: CreateResult,

    /// Postprocess failure detail, if the handler's postprocess hook failed
    pub postprocess_warning: Option<String>,
}
