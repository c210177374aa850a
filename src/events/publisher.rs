use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::ApprovalCoreError;

/// High-throughput event publisher for lifecycle and dispatch events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<ApprovalEvent>,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct ApprovalEvent {
    pub name: String,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event with the given name and context
    ///
    /// Publishing is fire-and-forget: events are observability data, never
    /// load-bearing for correctness, so a send with zero subscribers is not
    /// an error.
    pub async fn publish(
        &self,
        event_name: impl Into<String>,
        context: Value,
    ) -> Result<(), PublishError> {
        let event = ApprovalEvent {
            name: event_name.into(),
            context,
            published_at: chrono::Utc::now(),
        };

        match self.sender.send(event) {
            Ok(_) => Ok(()),
            // No subscribers - acceptable, we publish regardless of listeners
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ApprovalEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Event channel is closed")]
    ChannelClosed,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<PublishError> for ApprovalCoreError {
    fn from(err: PublishError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000) // Default capacity of 1000 events
    }
}
