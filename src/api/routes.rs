use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::handlers::{create_product, send_email, send_sms};
use super::health::{health, stats};
use super::metrics::prometheus_metrics;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Dispatch endpoints
        .nest(
            "/api/v1",
            Router::new()
                // Event publishing
                .route("/products", post(create_product))
                // Transactional messages
                .route("/notifications/email", post(send_email))
                .route("/notifications/sms", post(send_sms)),
        )
}
