//! Topic resolution.
//!
//! Maps a stable logical topic name to the provider-assigned identifier,
//! provisioning the topic on first use. Resolved identifiers are cached
//! with a TTL so steady-state publishing avoids a lookup round-trip per
//! dispatch; the cache is dropped for a name whenever the backend reports
//! it gone, which covers out-of-band deletion.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::channel::{ChannelAdapter, ProviderError, TopicId};
use crate::dispatch::DispatchError;
use crate::metrics::TopicMetrics;

struct CachedTopic {
    id: TopicId,
    resolved_at: Instant,
}

impl CachedTopic {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.resolved_at.elapsed() >= ttl
    }
}

/// Resolves topic names to identifiers, creating missing topics.
///
/// Takes no lock of its own: under concurrent resolution of the same name
/// both callers may reach `create_topic`, and correctness rests on the
/// adapter's idempotent-create contract.
pub struct TopicResolver {
    adapter: Arc<dyn ChannelAdapter>,
    cache: DashMap<String, CachedTopic>,
    ttl: Duration,
}

impl TopicResolver {
    pub fn new(adapter: Arc<dyn ChannelAdapter>, ttl: Duration) -> Self {
        Self {
            adapter,
            cache: DashMap::new(),
            ttl,
        }
    }

    /// Find the identifier for `name`, provisioning the topic if needed.
    ///
    /// A single attempt per backend call; any adapter error surfaces
    /// immediately as `TopicResolutionFailed`.
    pub async fn resolve_or_create(&self, name: &str) -> Result<TopicId, DispatchError> {
        if let Some(entry) = self.cache.get(name) {
            if !entry.is_expired(self.ttl) {
                TopicMetrics::record_cache_hit();
                return Ok(entry.id.clone());
            }
        }
        TopicMetrics::record_cache_miss();

        let id = self
            .lookup_or_provision(name)
            .await
            .map_err(|e| DispatchError::TopicResolutionFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        self.cache.insert(
            name.to_string(),
            CachedTopic {
                id: id.clone(),
                resolved_at: Instant::now(),
            },
        );

        Ok(id)
    }

    async fn lookup_or_provision(&self, name: &str) -> Result<TopicId, ProviderError> {
        if let Some(existing) = self.adapter.find_topic(name).await? {
            return Ok(existing);
        }

        tracing::info!(topic = %name, "Topic not found, provisioning");
        self.adapter.create_topic(name).await
    }

    /// Drop the cached identifier for `name`.
    ///
    /// Called when a publish reports the topic missing; the next dispatch
    /// re-resolves from the backend.
    pub fn invalidate(&self, name: &str) {
        if self.cache.remove(name).is_some() {
            tracing::debug!(topic = %name, "Dropped cached topic identifier");
        }
    }

    /// Number of currently cached topic identifiers
    pub fn cached_topics(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannelAdapter;

    fn resolver_with_ttl(ttl: Duration) -> (Arc<MemoryChannelAdapter>, TopicResolver) {
        let adapter = Arc::new(MemoryChannelAdapter::new());
        let resolver = TopicResolver::new(adapter.clone(), ttl);
        (adapter, resolver)
    }

    #[tokio::test]
    async fn test_resolve_creates_then_reuses() {
        let (adapter, resolver) = resolver_with_ttl(Duration::from_secs(300));

        let first = resolver.resolve_or_create("product-topic").await.unwrap();
        let second = resolver.resolve_or_create("product-topic").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(adapter.topic_count(), 1);
        // Second resolution was served from cache
        assert_eq!(adapter.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_resolve_finds_existing_topic() {
        let (adapter, resolver) = resolver_with_ttl(Duration::from_secs(300));
        let existing = adapter.create_topic("orders").await.unwrap();

        let resolved = resolver.resolve_or_create("orders").await.unwrap();
        assert_eq!(resolved, existing);
        // Only the seeding call created anything
        assert_eq!(adapter.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_entry_re_resolves() {
        let (adapter, resolver) = resolver_with_ttl(Duration::from_secs(0));

        resolver.resolve_or_create("orders").await.unwrap();
        resolver.resolve_or_create("orders").await.unwrap();

        // TTL of zero: both resolutions went to the backend, but the
        // topic still exists exactly once.
        assert_eq!(adapter.topic_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_drops_entry() {
        let (_, resolver) = resolver_with_ttl(Duration::from_secs(300));

        resolver.resolve_or_create("orders").await.unwrap();
        assert_eq!(resolver.cached_topics(), 1);

        resolver.invalidate("orders");
        assert_eq!(resolver.cached_topics(), 0);

        // Unknown names are a no-op
        resolver.invalidate("never-seen");
    }
}
