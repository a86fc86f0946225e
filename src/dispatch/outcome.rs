//! Uniform dispatch result.

use serde::Serialize;

use super::DispatchError;

/// Terminal value of every dispatch attempt.
///
/// Returned to the transport layer for both success and failure; a dispatch
/// never surfaces a raw backend error past the core boundary and is never
/// retried internally.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub success: bool,
    /// Provider status code, when the backend reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<u16>,
    /// Human-readable failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl DispatchOutcome {
    /// Successful attempt, optionally carrying the provider status
    pub fn delivered(provider_status: Option<u16>) -> Self {
        Self {
            success: true,
            provider_status,
            error_detail: None,
        }
    }

    /// Failed attempt; the error's display text becomes the detail
    pub fn rejected(error: &DispatchError) -> Self {
        Self {
            success: false,
            provider_status: error.provider_status(),
            error_detail: Some(error.to_string()),
        }
    }
}

impl From<DispatchError> for DispatchOutcome {
    fn from(error: DispatchError) -> Self {
        Self::rejected(&error)
    }
}
