//! API layer - HTTP endpoint handlers.

mod handlers;
mod health;
mod metrics;
mod models;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use handlers::{create_product, send_email, send_sms};
pub use health::{health, stats};
pub use metrics::prometheus_metrics;
pub use models::{CreateProductRequest, DispatchResponse, SendEmailRequest, SendSmsRequest};
pub use routes::api_routes;
