//! Prometheus metrics for the dispatch service.
//!
//! Counters for published events, sent messages per channel, dispatch
//! failures per error kind, and topic cache effectiveness.

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

use crate::channel::ChannelKind;

/// Prefix for all metrics
const METRIC_PREFIX: &str = "courier";

lazy_static! {
    /// Total domain events published to a topic
    pub static ref EVENTS_PUBLISHED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_events_published_total", METRIC_PREFIX),
        "Total domain events published to a topic"
    ).unwrap();

    /// Total transactional messages sent, by channel
    pub static ref MESSAGES_SENT_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_messages_sent_total", METRIC_PREFIX),
        "Total transactional messages sent",
        &["channel"]
    ).unwrap();

    /// Total dispatch failures, by error kind
    pub static ref DISPATCH_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_dispatch_failures_total", METRIC_PREFIX),
        "Total dispatch failures",
        &["kind"]
    ).unwrap();

    /// Topic identifier cache hits
    pub static ref TOPIC_CACHE_HITS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_topic_cache_hits_total", METRIC_PREFIX),
        "Topic identifier cache hits"
    ).unwrap();

    /// Topic identifier cache misses (lookups that went to the backend)
    pub static ref TOPIC_CACHE_MISSES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_topic_cache_misses_total", METRIC_PREFIX),
        "Topic identifier cache misses"
    ).unwrap();
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record a published domain event
    pub fn record_event_published() {
        EVENTS_PUBLISHED_TOTAL.inc();
    }

    /// Record a sent transactional message
    pub fn record_message_sent(channel: ChannelKind) {
        MESSAGES_SENT_TOTAL.with_label_values(&[channel.as_str()]).inc();
    }

    /// Record a dispatch failure
    pub fn record_failure(kind: &str) {
        DISPATCH_FAILURES_TOTAL.with_label_values(&[kind]).inc();
    }
}

/// Helper struct for recording topic cache metrics
pub struct TopicMetrics;

impl TopicMetrics {
    pub fn record_cache_hit() {
        TOPIC_CACHE_HITS_TOTAL.inc();
    }

    pub fn record_cache_miss() {
        TOPIC_CACHE_MISSES_TOTAL.inc();
    }
}
