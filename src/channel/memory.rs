//! In-memory channel adapter.
//!
//! The default backend for local development, and the fake the integration
//! tests drive. Topics live in a `DashMap`; deliveries are recorded so
//! callers can inspect what reached the "provider".

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{ChannelAdapter, OutboundMessage, ProviderError, ProviderResponse, TopicId};

/// A payload that was published to a topic
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub topic: TopicId,
    pub subject: String,
    pub payload: String,
}

/// In-process delivery backend backed by concurrent maps.
pub struct MemoryChannelAdapter {
    topics: DashMap<String, TopicId>,
    create_calls: AtomicU64,
    published: Mutex<Vec<PublishedMessage>>,
    emails: Mutex<Vec<OutboundMessage>>,
    sms: Mutex<Vec<OutboundMessage>>,
}

impl Default for MemoryChannelAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChannelAdapter {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
            create_calls: AtomicU64::new(0),
            published: Mutex::new(Vec::new()),
            emails: Mutex::new(Vec::new()),
            sms: Mutex::new(Vec::new()),
        }
    }

    /// Number of topics that currently exist
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// How many times `create_topic` was invoked (idempotent calls included)
    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::Relaxed)
    }

    /// Everything published so far, in order
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }

    /// Emails handed to the backend, in order
    pub fn sent_emails(&self) -> Vec<OutboundMessage> {
        self.emails.lock().unwrap().clone()
    }

    /// SMS messages handed to the backend, in order
    pub fn sent_sms(&self) -> Vec<OutboundMessage> {
        self.sms.lock().unwrap().clone()
    }

    fn topic_exists(&self, topic: &TopicId) -> bool {
        self.topics.iter().any(|entry| entry.value() == topic)
    }
}

#[async_trait]
impl ChannelAdapter for MemoryChannelAdapter {
    async fn find_topic(&self, name: &str) -> Result<Option<TopicId>, ProviderError> {
        Ok(self.topics.get(name).map(|entry| entry.value().clone()))
    }

    async fn create_topic(&self, name: &str) -> Result<TopicId, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::Relaxed);

        // entry().or_insert_with keeps creation idempotent under races:
        // the second caller gets the identifier the first one inserted.
        let id = self
            .topics
            .entry(name.to_string())
            .or_insert_with(|| TopicId::new(format!("arn:mem:topic:{}", name)))
            .clone();

        Ok(id)
    }

    async fn publish(
        &self,
        topic: &TopicId,
        subject: &str,
        payload: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.topic_exists(topic) {
            return Err(ProviderError::TopicNotFound(topic.to_string()));
        }

        self.published.lock().unwrap().push(PublishedMessage {
            topic: topic.clone(),
            subject: subject.to_string(),
            payload: payload.to_string(),
        });

        Ok(ProviderResponse::new(200))
    }

    async fn send_email(
        &self,
        message: &OutboundMessage,
    ) -> Result<ProviderResponse, ProviderError> {
        self.emails.lock().unwrap().push(message.clone());
        Ok(ProviderResponse::new(200))
    }

    async fn send_sms(&self, message: &OutboundMessage) -> Result<(), ProviderError> {
        self.sms.lock().unwrap().push(message.clone());
        Ok(())
    }
}
