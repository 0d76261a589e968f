//! # dsc-error
//!
//! Unified error type for the dataspace connector.
//!
//! Every error carries:
//! - A stable numeric code (DSC-XXXX)
//! - Optional structured JSON context
//! - An optional hint for the caller

mod code;
mod context;
mod convert;

pub use code::{ErrorCategory, ErrorCode};
pub use context::ErrorContext;
pub use convert::suggest;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The error type shared by all connector crates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorError {
    /// Numeric error code (e.g., "DSC-2001")
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Structured context for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Suggestion for fixing the request or configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Correlation ID, usually the transfer process or request id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ConnectorError {
    /// Create a new error with code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
            trace_id: None,
        }
    }

    /// A required setting is absent.
    pub fn missing_setting(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::MissingSetting,
            format!("No setting found for key {}", key),
        )
        .with_context(ErrorContext::Setting { key, value: None })
    }

    /// An object could not be found in a store.
    pub fn not_found(object_type: impl Into<String>, id: impl Into<String>) -> Self {
        let object_type = object_type.into();
        let id = id.into();
        Self::new(
            ErrorCode::ObjectNotFound,
            format!("Object of type {} with ID={} was not found", object_type, id),
        )
        .with_context(ErrorContext::ObjectNotFound { object_type, id })
    }

    /// An object with the same id already exists.
    pub fn already_exists(object_type: impl Into<String>, id: impl Into<String>) -> Self {
        let object_type = object_type.into();
        let id = id.into();
        Self::new(
            ErrorCode::ObjectExists,
            format!("Object of type {} with ID={} already exists", object_type, id),
        )
        .with_context(ErrorContext::ObjectExists { object_type, id })
    }

    /// The request failed validation; `errors` lists every violation.
    pub fn invalid_request(errors: Vec<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, errors.join(", "))
            .with_context(ErrorContext::Validation { errors })
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Add structured context
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Add a hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Add trace ID for correlation
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Serialize to JSON for API responses
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize ConnectorError: {}", e);
            format!(
                r#"{{"code":"{}","message":"Serialization failed"}}"#,
                self.code
            )
        })
    }

    /// Serialize to pretty JSON for logging
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (Hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConnectorError {}

/// Result type alias for connector operations
pub type Result<T> = std::result::Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_error_builder() {
        let err = ConnectorError::new(ErrorCode::TransferFailed, "Copy failed")
            .with_hint("Check the destination address")
            .with_trace_id("process-1");

        assert_eq!(err.code, ErrorCode::TransferFailed);
        assert_eq!(err.message, "Copy failed");
        assert_eq!(err.hint, Some("Check the destination address".to_string()));
        assert_eq!(err.trace_id, Some("process-1".to_string()));
        assert!(err.context.is_none());
    }

    #[test]
    fn test_display_implementation() {
        let err = ConnectorError::missing_setting("web.http.port").with_hint("Set web.http.port");
        assert_eq!(
            err.to_string(),
            "[DSC-1001] No setting found for key web.http.port (Hint: Set web.http.port)"
        );

        let err_no_hint = ConnectorError::internal("Crash");
        assert_eq!(err_no_hint.to_string(), "[DSC-5001] Crash");
    }

    #[test]
    fn test_not_found_carries_context() {
        let err = ConnectorError::not_found("ContractDefinition", "def-1");
        assert_eq!(err.category(), ErrorCategory::Object);
        assert_eq!(
            err.message,
            "Object of type ContractDefinition with ID=def-1 was not found"
        );
        match err.context {
            Some(ErrorContext::ObjectNotFound { object_type, id }) => {
                assert_eq!(object_type, "ContractDefinition");
                assert_eq!(id, "def-1");
            }
            _ => panic!("Expected ObjectNotFound context"),
        }
    }

    #[test]
    fn test_invalid_request_joins_errors() {
        let err = ConnectorError::invalid_request(vec![
            "id must not be blank".to_string(),
            "accessPolicyId must not be blank".to_string(),
        ]);
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(
            err.message,
            "id must not be blank, accessPolicyId must not be blank"
        );
    }

    #[test]
    fn test_json_output() {
        let err = ConnectorError::new(ErrorCode::QueueFull, "Data plane queue is full");
        let json = err.to_json();

        assert!(json.contains("\"code\":\"DSC-3006\""));
        assert!(json.contains("\"message\":\"Data plane queue is full\""));
        assert!(!json.contains("hint"));
    }
}
