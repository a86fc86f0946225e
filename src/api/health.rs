//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub channel_backend: String,
    pub template_backend: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub dispatch: DispatchStats,
    pub topics: TopicStats,
}

#[derive(Debug, Serialize)]
pub struct DispatchStats {
    pub events_published: u64,
    pub messages_sent: u64,
    pub failures: u64,
}

#[derive(Debug, Serialize)]
pub struct TopicStats {
    pub cached: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        channel_backend: state.settings.channel.backend.clone(),
        template_backend: state.settings.templates.backend.clone(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let dispatcher_stats = state.dispatcher.stats();

    Json(StatsResponse {
        dispatch: DispatchStats {
            events_published: dispatcher_stats.events_published,
            messages_sent: dispatcher_stats.messages_sent,
            failures: dispatcher_stats.failures,
        },
        topics: TopicStats {
            cached: state.dispatcher.cached_topics(),
        },
    })
}
