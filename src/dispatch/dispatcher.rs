use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::channel::{ChannelAdapter, ChannelKind, OutboundMessage, ProviderError, SenderIdentity};
use crate::metrics::DispatchMetrics;
use crate::template::{TemplateRenderer, TemplateStore};
use crate::topic::TopicResolver;

use super::{DispatchError, DispatchOutcome, DomainEvent, MessageRequest};

/// Statistics for the dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Domain events published to a topic
    pub events_published: AtomicU64,
    /// Transactional messages sent (email + SMS)
    pub messages_sent: AtomicU64,
    /// Dispatch attempts that ended in a failure outcome
    pub failures: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            events_published: self.events_published.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub events_published: u64,
    pub messages_sent: u64,
    pub failures: u64,
}

/// Orchestrates the two dispatch paths.
///
/// Event publish: serialize → resolve topic → publish. Transactional
/// message: render template → build message → send via channel. Both paths
/// are a single synchronous attempt and always return a
/// [`DispatchOutcome`]; no backend failure escapes as an error.
pub struct Dispatcher {
    adapter: Arc<dyn ChannelAdapter>,
    topics: TopicResolver,
    renderer: TemplateRenderer,
    sender: SenderIdentity,
    stats: DispatcherStats,
}

impl Dispatcher {
    pub fn new(
        adapter: Arc<dyn ChannelAdapter>,
        template_store: Arc<dyn TemplateStore>,
        sender: SenderIdentity,
        topic_cache_ttl: Duration,
    ) -> Self {
        Self {
            topics: TopicResolver::new(adapter.clone(), topic_cache_ttl),
            renderer: TemplateRenderer::new(template_store),
            adapter,
            sender,
            stats: DispatcherStats::default(),
        }
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of topic identifiers currently cached
    pub fn cached_topics(&self) -> usize {
        self.topics.cached_topics()
    }

    /// Publish a domain event to the named topic.
    #[tracing::instrument(
        name = "dispatch.publish_event",
        skip(self, event),
        fields(event_id = event.id, topic = %topic_name)
    )]
    pub async fn publish_event(&self, event: &DomainEvent, topic_name: &str) -> DispatchOutcome {
        match self.try_publish(event, topic_name).await {
            Ok(status) => {
                self.stats.events_published.fetch_add(1, Ordering::Relaxed);
                DispatchMetrics::record_event_published();
                tracing::info!(status = status, "Event published");
                DispatchOutcome::delivered(Some(status))
            }
            Err(error) => self.failure_outcome(error),
        }
    }

    async fn try_publish(
        &self,
        event: &DomainEvent,
        topic_name: &str,
    ) -> Result<u16, DispatchError> {
        if topic_name.trim().is_empty() {
            return Err(DispatchError::ValidationFailed(
                "topic name is required".to_string(),
            ));
        }

        let payload = event.to_payload().map_err(|e| {
            DispatchError::ValidationFailed(format!("event is not serializable: {}", e))
        })?;

        let topic_id = self.topics.resolve_or_create(topic_name).await?;
        let subject = event.subject();

        tracing::info!(
            subject = %subject,
            payload = %payload,
            topic_id = %topic_id,
            "Publishing event"
        );

        match self.adapter.publish(&topic_id, &subject, &payload).await {
            Ok(response) if response.is_success() => Ok(response.status),
            Ok(response) => Err(DispatchError::ProviderRejected {
                status: response.status,
                detail: format!("publish to '{}' rejected", topic_name),
            }),
            Err(ProviderError::TopicNotFound(name)) => {
                // The topic vanished between resolution and publish; drop
                // the stale cache entry so the next dispatch re-resolves.
                self.topics.invalidate(topic_name);
                Err(ProviderError::TopicNotFound(name).into())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Send one transactional message through its channel.
    #[tracing::instrument(
        name = "dispatch.send_message",
        skip(self, request),
        fields(channel = %request.channel, template = %request.template_key)
    )]
    pub async fn send_message(&self, request: &MessageRequest) -> DispatchOutcome {
        match self.try_send(request).await {
            Ok(status) => {
                self.stats.messages_sent.fetch_add(1, Ordering::Relaxed);
                DispatchMetrics::record_message_sent(request.channel);
                tracing::info!(recipient = %request.recipient, "Message sent");
                DispatchOutcome::delivered(status)
            }
            Err(error) => self.failure_outcome(error),
        }
    }

    async fn try_send(&self, request: &MessageRequest) -> Result<Option<u16>, DispatchError> {
        request.validate()?;

        let body = self
            .renderer
            .render(&request.template_key, &request.substitutions)
            .await?;

        let message = OutboundMessage {
            channel: request.channel,
            recipient: request.recipient.clone(),
            recipient_name: request.recipient_name.clone(),
            subject: request.subject.clone(),
            body,
            sender: self.sender.clone(),
        };

        match request.channel {
            ChannelKind::Email => {
                let response = self.adapter.send_email(&message).await?;
                if response.is_success() {
                    Ok(Some(response.status))
                } else {
                    Err(DispatchError::ProviderRejected {
                        status: response.status,
                        detail: format!("email delivery to {} rejected", message.recipient),
                    })
                }
            }
            ChannelKind::Sms => {
                // No status comes back for SMS; an adapter error is the
                // only failure signal and its text is always preserved.
                self.adapter.send_sms(&message).await?;
                Ok(None)
            }
        }
    }

    fn failure_outcome(&self, error: DispatchError) -> DispatchOutcome {
        self.stats.failures.fetch_add(1, Ordering::Relaxed);
        DispatchMetrics::record_failure(error.kind());
        tracing::warn!(kind = error.kind(), error = %error, "Dispatch failed");
        DispatchOutcome::from(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannelAdapter;
    use crate::template::MemoryTemplateStore;
    use std::collections::BTreeMap;

    fn test_dispatcher() -> (Arc<MemoryChannelAdapter>, Arc<MemoryTemplateStore>, Dispatcher) {
        let adapter = Arc::new(MemoryChannelAdapter::new());
        let store = Arc::new(MemoryTemplateStore::new());
        let dispatcher = Dispatcher::new(
            adapter.clone(),
            store.clone(),
            SenderIdentity {
                address: "noreply@example.com".to_string(),
                display_name: "Courier".to_string(),
            },
            Duration::from_secs(300),
        );
        (adapter, store, dispatcher)
    }

    #[tokio::test]
    async fn test_publish_provisions_missing_topic() {
        let (adapter, _, dispatcher) = test_dispatcher();
        let event = DomainEvent::new(1, Some("Widget".to_string()), None);

        let outcome = dispatcher.publish_event(&event, "product-topic").await;

        assert!(outcome.success);
        assert_eq!(adapter.topic_count(), 1);
        assert_eq!(adapter.published().len(), 1);
        assert_eq!(adapter.published()[0].subject, "WidgetCreated");
    }

    #[tokio::test]
    async fn test_publish_rejects_empty_topic_name() {
        let (adapter, _, dispatcher) = test_dispatcher();
        let event = DomainEvent::new(1, None, None);

        let outcome = dispatcher.publish_event(&event, "  ").await;

        assert!(!outcome.success);
        // Validation short-circuits with no side effects
        assert_eq!(adapter.topic_count(), 0);
        assert_eq!(adapter.published().len(), 0);
    }

    #[tokio::test]
    async fn test_send_email_renders_template() {
        let (adapter, store, dispatcher) = test_dispatcher();
        store.insert("welcome", "Hello {FirstName}");

        let request = MessageRequest {
            channel: ChannelKind::Email,
            recipient: "ana@example.com".to_string(),
            recipient_name: Some("Ana".to_string()),
            subject: Some("Welcome".to_string()),
            template_key: "welcome".to_string(),
            substitutions: BTreeMap::from([("FirstName".to_string(), "Ana".to_string())]),
        };

        let outcome = dispatcher.send_message(&request).await;

        assert!(outcome.success);
        assert_eq!(outcome.provider_status, Some(200));
        let emails = adapter.sent_emails();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].body, "Hello Ana");
        assert_eq!(emails[0].sender.address, "noreply@example.com");
    }

    #[tokio::test]
    async fn test_send_missing_template_is_failure_outcome() {
        let (adapter, _, dispatcher) = test_dispatcher();

        let request = MessageRequest {
            channel: ChannelKind::Email,
            recipient: "ana@example.com".to_string(),
            recipient_name: None,
            subject: None,
            template_key: "missing".to_string(),
            substitutions: BTreeMap::new(),
        };

        let outcome = dispatcher.send_message(&request).await;

        assert!(!outcome.success);
        assert!(outcome.error_detail.unwrap().contains("missing"));
        assert!(adapter.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_sms_outcome_has_no_status() {
        let (adapter, store, dispatcher) = test_dispatcher();
        store.insert("new-key", "{Name}, your code is {Code}");

        let request = MessageRequest {
            channel: ChannelKind::Sms,
            recipient: "+15550100".to_string(),
            recipient_name: Some("Ana".to_string()),
            subject: None,
            template_key: "new-key".to_string(),
            substitutions: BTreeMap::from([
                ("Name".to_string(), "Ana".to_string()),
                ("Code".to_string(), "9917".to_string()),
            ]),
        };

        let outcome = dispatcher.send_message(&request).await;

        assert!(outcome.success);
        assert!(outcome.provider_status.is_none());
        assert_eq!(adapter.sent_sms()[0].body, "Ana, your code is 9917");
    }

    #[tokio::test]
    async fn test_stats_track_both_paths() {
        let (_, store, dispatcher) = test_dispatcher();
        store.insert("t", "{X}");

        let event = DomainEvent::new(1, Some("Widget".to_string()), None);
        dispatcher.publish_event(&event, "product-topic").await;

        let request = MessageRequest {
            channel: ChannelKind::Sms,
            recipient: "+15550100".to_string(),
            recipient_name: None,
            subject: None,
            template_key: "t".to_string(),
            substitutions: BTreeMap::new(),
        };
        dispatcher.send_message(&request).await;

        let failing = MessageRequest {
            template_key: "nope".to_string(),
            ..request
        };
        dispatcher.send_message(&failing).await;

        let stats = dispatcher.stats();
        assert_eq!(stats.events_published, 1);
        assert_eq!(stats.messages_sent, 1);
        assert_eq!(stats.failures, 1);
    }
}
