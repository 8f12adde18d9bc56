//! # Checkout Error Types
//!
//! Typed error handling for the checkout engine.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout payload failed validation; `issues` lists every violated
    /// constraint so the client can surface all of them at once
    #[error("Invalid checkout payload: {}", issues.join("; "))]
    Validation { issues: Vec<String> },

    /// Configuration errors (missing credentials, invalid config).
    /// Detected before any network call is attempted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    Network(String),

    /// PayPal capture returned a status other than COMPLETED
    #[error("Capture not completed: provider returned status {status}")]
    IncompleteCapture { status: String },

    /// Operation not supported by this provider (e.g. capture on Stripe,
    /// which settles inside its hosted flow)
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Build a validation error from a single issue
    pub fn validation(issue: impl Into<String>) -> Self {
        CheckoutError::Validation {
            issues: vec![issue.into()],
        }
    }

    /// Returns true if this error is retryable from the same cart state
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Network(_) | CheckoutError::Provider { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Validation { .. } => 400,
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Provider { .. } => 502,
            CheckoutError::Network(_) => 503,
            CheckoutError::IncompleteCapture { .. } => 502,
            CheckoutError::Unsupported(_) => 500,
            CheckoutError::Serialization(_) => 500,
            CheckoutError::Internal(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::Network("timeout".into()).is_retryable());
        assert!(CheckoutError::Provider {
            provider: "stripe".into(),
            message: "rate limited".into()
        }
        .is_retryable());
        assert!(!CheckoutError::validation("items list is empty").is_retryable());
        assert!(!CheckoutError::Configuration("STRIPE_SECRET_KEY not set".into()).is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::validation("bad").status_code(), 400);
        assert_eq!(
            CheckoutError::Configuration("missing key".into()).status_code(),
            500
        );
        assert_eq!(
            CheckoutError::IncompleteCapture {
                status: "PENDING".into()
            }
            .status_code(),
            502
        );
    }

    #[test]
    fn test_validation_message_lists_all_issues() {
        let err = CheckoutError::Validation {
            issues: vec!["items list is empty".into(), "invalid email".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("items list is empty"));
        assert!(msg.contains("invalid email"));
    }
}
