//! Dispatch core input types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::channel::ChannelKind;

use super::DispatchError;

/// Immutable domain event published to a topic.
///
/// Created by the transport layer from an inbound request, serialized as
/// the publish payload, and discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl DomainEvent {
    pub fn new(id: i64, name: Option<String>, description: Option<String>) -> Self {
        Self {
            id,
            name,
            description,
        }
    }

    /// Publish subject line, `"<Name>Created"`
    pub fn subject(&self) -> String {
        format!("{}Created", self.name.as_deref().unwrap_or("Event"))
    }

    /// Canonical payload encoding.
    ///
    /// Field order is fixed by the struct declaration, so the same event
    /// always produces the same string and round-trips losslessly.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A request to send one transactional message through one channel.
#[derive(Debug, Clone)]
pub struct MessageRequest {
    pub channel: ChannelKind,
    /// Email address or phone number, depending on the channel
    pub recipient: String,
    pub recipient_name: Option<String>,
    /// Subject line; meaningful for email only
    pub subject: Option<String>,
    /// Key of the stored template to render
    pub template_key: String,
    /// Token values substituted into the template
    pub substitutions: BTreeMap<String, String>,
}

impl MessageRequest {
    /// Reject malformed requests before any backend call is attempted.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.recipient.trim().is_empty() {
            return Err(DispatchError::ValidationFailed(
                "recipient is required".to_string(),
            ));
        }

        if self.template_key.trim().is_empty() {
            return Err(DispatchError::ValidationFailed(
                "template key is required".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_from_name() {
        let event = DomainEvent::new(1, Some("Widget".to_string()), None);
        assert_eq!(event.subject(), "WidgetCreated");

        let unnamed = DomainEvent::new(2, None, None);
        assert_eq!(unnamed.subject(), "EventCreated");
    }

    #[test]
    fn test_payload_round_trip() {
        let event = DomainEvent::new(
            1,
            Some("Widget".to_string()),
            Some("A widget".to_string()),
        );

        let payload = event.to_payload().unwrap();
        let decoded: DomainEvent = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded, event);

        // Same event, same encoding
        assert_eq!(payload, event.to_payload().unwrap());
    }

    #[test]
    fn test_validate_rejects_missing_recipient() {
        let request = MessageRequest {
            channel: ChannelKind::Email,
            recipient: "  ".to_string(),
            recipient_name: None,
            subject: None,
            template_key: "welcome".to_string(),
            substitutions: BTreeMap::new(),
        };

        let err = request.validate().unwrap_err();
        assert!(matches!(err, DispatchError::ValidationFailed(_)));
    }

    #[test]
    fn test_validate_rejects_missing_template_key() {
        let request = MessageRequest {
            channel: ChannelKind::Sms,
            recipient: "+15550100".to_string(),
            recipient_name: None,
            subject: None,
            template_key: String::new(),
            substitutions: BTreeMap::new(),
        };

        assert!(request.validate().is_err());
    }
}
