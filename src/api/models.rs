//! Request and response models for the HTTP API

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::ChannelKind;
use crate::dispatch::{DispatchOutcome, DomainEvent, MessageRequest};

/// Request to publish a product-created event
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Product identifier
    pub id: i64,
    /// Product name (optional)
    pub name: Option<String>,
    /// Product description (optional)
    pub description: Option<String>,
}

impl From<CreateProductRequest> for DomainEvent {
    fn from(req: CreateProductRequest) -> Self {
        DomainEvent::new(req.id, req.name, req.description)
    }
}

/// Request to send a templated email
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    /// Recipient email address
    pub recipient: String,
    /// Recipient display name (optional)
    pub recipient_name: Option<String>,
    /// Subject line (optional)
    pub subject: Option<String>,
    /// Key of the stored template to render
    pub template_key: String,
    /// Token values substituted into the template
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
}

impl From<SendEmailRequest> for MessageRequest {
    fn from(req: SendEmailRequest) -> Self {
        MessageRequest {
            channel: ChannelKind::Email,
            recipient: req.recipient,
            recipient_name: req.recipient_name,
            subject: req.subject,
            template_key: req.template_key,
            substitutions: req.substitutions,
        }
    }
}

/// Request to send a templated SMS
#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    /// Recipient phone number
    pub recipient: String,
    /// Recipient display name (optional)
    pub recipient_name: Option<String>,
    /// Key of the stored template to render
    pub template_key: String,
    /// Token values substituted into the template
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
}

impl From<SendSmsRequest> for MessageRequest {
    fn from(req: SendSmsRequest) -> Self {
        MessageRequest {
            channel: ChannelKind::Sms,
            recipient: req.recipient,
            recipient_name: req.recipient_name,
            subject: None,
            template_key: req.template_key,
            substitutions: req.substitutions,
        }
    }
}

/// Response for dispatch operations
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    /// Whether the dispatch attempt succeeded
    pub success: bool,
    /// Provider status code, when the backend reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<u16>,
    /// Human-readable failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<DispatchOutcome> for DispatchResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            success: outcome.success,
            provider_status: outcome.provider_status,
            error_detail: outcome.error_detail,
            timestamp: Utc::now(),
        }
    }
}
