//! Dispatch error taxonomy.

use thiserror::Error;

use crate::channel::ProviderError;
use crate::template::TemplateError;

/// Everything that can go wrong inside a single dispatch attempt.
///
/// These never cross the core boundary as errors; the core folds them into
/// a [`crate::dispatch::DispatchOutcome`] before returning.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("topic resolution failed for '{name}': {reason}")]
    TopicResolutionFailed { name: String, reason: String },

    /// The delivery backend returned a non-success status
    #[error("provider rejected the request with status {status}: {detail}")]
    ProviderRejected { status: u16, detail: String },

    /// Transport-level failure reaching the backend
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Malformed request; detected before any backend call
    #[error("invalid request: {0}")]
    ValidationFailed(String),
}

impl DispatchError {
    /// Stable discriminant used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::TemplateNotFound(_) => "template_not_found",
            DispatchError::TopicResolutionFailed { .. } => "topic_resolution_failed",
            DispatchError::ProviderRejected { .. } => "provider_rejected",
            DispatchError::ProviderUnavailable(_) => "provider_unavailable",
            DispatchError::ValidationFailed(_) => "validation_failed",
        }
    }

    /// Provider status code, when the failure carries one
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            DispatchError::ProviderRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<TemplateError> for DispatchError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::NotFound(key) => DispatchError::TemplateNotFound(key),
            TemplateError::InvalidKey(msg) => DispatchError::ValidationFailed(msg),
            TemplateError::Storage(msg) => {
                DispatchError::ProviderUnavailable(format!("template store: {}", msg))
            }
        }
    }
}

impl From<ProviderError> for DispatchError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Rejected { status, message } => DispatchError::ProviderRejected {
                status,
                detail: message,
            },
            ProviderError::TopicNotFound(name) => DispatchError::ProviderRejected {
                status: 404,
                detail: format!("topic not found: {}", name),
            },
            ProviderError::Unavailable(msg) => DispatchError::ProviderUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        let err = DispatchError::TemplateNotFound("welcome".to_string());
        assert_eq!(err.kind(), "template_not_found");

        let err = DispatchError::ProviderRejected {
            status: 503,
            detail: "overloaded".to_string(),
        };
        assert_eq!(err.kind(), "provider_rejected");
        assert_eq!(err.provider_status(), Some(503));
    }

    #[test]
    fn test_template_error_mapping() {
        let err: DispatchError = TemplateError::NotFound("welcome".to_string()).into();
        assert!(matches!(err, DispatchError::TemplateNotFound(_)));

        let err: DispatchError = TemplateError::InvalidKey("bad".to_string()).into();
        assert!(matches!(err, DispatchError::ValidationFailed(_)));
    }

    #[test]
    fn test_provider_error_mapping() {
        let err: DispatchError = ProviderError::Unavailable("timeout".to_string()).into();
        assert!(matches!(err, DispatchError::ProviderUnavailable(_)));

        let err: DispatchError = ProviderError::TopicNotFound("orders".to_string()).into();
        assert_eq!(err.provider_status(), Some(404));
    }
}
