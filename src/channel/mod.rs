//! Delivery channel abstraction.
//!
//! Every delivery backend (pub/sub broker, email sender, SMS gateway) is
//! reached through the single [`ChannelAdapter`] capability trait. The
//! dispatch core only ever talks to this trait; concrete cloud providers
//! plug in behind it. Use [`create_channel_adapter`] to build the backend
//! selected by configuration.

mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ChannelConfig, SenderConfig};

pub use memory::{MemoryChannelAdapter, PublishedMessage};

/// Provider-assigned canonical topic identifier (e.g. an ARN).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicId(String);

impl TopicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical delivery channel for a transactional message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Sms,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Sms => "sms",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sender identity stamped onto outbound messages, drawn from configuration
#[derive(Debug, Clone, Serialize)]
pub struct SenderIdentity {
    pub address: String,
    pub display_name: String,
}

impl From<&SenderConfig> for SenderIdentity {
    fn from(config: &SenderConfig) -> Self {
        Self {
            address: config.address.clone(),
            display_name: config.display_name.clone(),
        }
    }
}

/// A fully rendered message handed to a delivery backend.
///
/// Constructed per request by the dispatch core and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    pub channel: ChannelKind,
    /// Email address or phone number, depending on the channel
    pub recipient: String,
    pub recipient_name: Option<String>,
    /// Subject line; email only
    pub subject: Option<String>,
    pub body: String,
    pub sender: SenderIdentity,
}

/// Status-bearing response from a delivery backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
}

impl ProviderResponse {
    pub fn new(status: u16) -> Self {
        Self { status }
    }

    /// HTTP-OK-equivalent: any 2xx status counts as success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors surfaced by delivery backends
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend processed the request and refused it
    #[error("provider rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The referenced topic does not exist in the backend
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    /// The backend could not be reached at all
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Uniform capability contract over the delivery backends.
///
/// One adapter instance serves all three delivery paths; credentials are
/// injected at construction time and no method reads process-wide state.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Look up the identifier of an existing topic by name.
    ///
    /// Returns `Ok(None)` when no topic with that name exists.
    async fn find_topic(&self, name: &str) -> Result<Option<TopicId>, ProviderError>;

    /// Provision a topic, returning its canonical identifier.
    ///
    /// MUST be idempotent per name: creating a topic that already exists
    /// returns the existing identifier instead of erroring or duplicating.
    /// Concurrent resolvers may both observe "not found" and both call this
    /// method; the topic-name-to-identifier invariant rests entirely on
    /// this guarantee, since [`crate::topic::TopicResolver`] takes no lock.
    async fn create_topic(&self, name: &str) -> Result<TopicId, ProviderError>;

    /// Publish a payload to a topic with the given subject line.
    async fn publish(
        &self,
        topic: &TopicId,
        subject: &str,
        payload: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Deliver an email. The response status carries the provider verdict.
    async fn send_email(&self, message: &OutboundMessage) -> Result<ProviderResponse, ProviderError>;

    /// Deliver an SMS. No status is available; an `Err` is the only failure
    /// signal. Transactional-grade delivery is backend policy, not carried
    /// on the message.
    async fn send_sms(&self, message: &OutboundMessage) -> Result<(), ProviderError>;
}

/// Create a channel adapter based on configuration.
///
/// Returns the backend selected by the `backend` setting:
/// - `"memory"` (default): an in-process [`MemoryChannelAdapter`]
///
/// Unknown backend names fall back to memory with a warning. Cloud-provider
/// adapters live outside this crate and are wired in by the embedding
/// application through [`crate::server::AppState::with_backends`].
pub fn create_channel_adapter(settings: &ChannelConfig) -> Arc<dyn ChannelAdapter> {
    match settings.backend.as_str() {
        "memory" => {
            tracing::info!(backend = "memory", "Creating in-memory channel adapter");
            Arc::new(MemoryChannelAdapter::new())
        }
        other => {
            tracing::warn!(
                backend = %other,
                "Unknown channel backend requested, falling back to memory"
            );
            Arc::new(MemoryChannelAdapter::new())
        }
    }
}
