//! HTTP dispatch handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::dispatch::{DispatchOutcome, DomainEvent, MessageRequest};
use crate::server::AppState;

use super::models::{CreateProductRequest, DispatchResponse, SendEmailRequest, SendSmsRequest};

/// Topic that product lifecycle events are published to
const PRODUCT_TOPIC: &str = "product-topic";

/// Success maps to 200, any failure kind to 400; the serialized outcome is
/// the body either way.
fn outcome_response(outcome: DispatchOutcome) -> (StatusCode, Json<DispatchResponse>) {
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(DispatchResponse::from(outcome)))
}

/// Publish a product-created event
#[tracing::instrument(
    name = "http.create_product",
    skip(state, request),
    fields(product_id = request.id)
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> (StatusCode, Json<DispatchResponse>) {
    let event = DomainEvent::from(request);
    let outcome = state.dispatcher.publish_event(&event, PRODUCT_TOPIC).await;
    outcome_response(outcome)
}

/// Send a templated email
#[tracing::instrument(
    name = "http.send_email",
    skip(state, request),
    fields(template = %request.template_key)
)]
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> (StatusCode, Json<DispatchResponse>) {
    let message = MessageRequest::from(request);
    let outcome = state.dispatcher.send_message(&message).await;
    outcome_response(outcome)
}

/// Send a templated SMS
#[tracing::instrument(
    name = "http.send_sms",
    skip(state, request),
    fields(template = %request.template_key)
)]
pub async fn send_sms(
    State(state): State<AppState>,
    Json(request): Json<SendSmsRequest>,
) -> (StatusCode, Json<DispatchResponse>) {
    let message = MessageRequest::from(request);
    let outcome = state.dispatcher.send_message(&message).await;
    outcome_response(outcome)
}
