use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following the DSC-XXXX format.
///
/// ## Code Ranges
/// - **1000-1999**: Configuration errors
/// - **2000-2999**: Object/store errors
/// - **3000-3999**: Transfer and data plane errors
/// - **4000-4999**: Authentication/Authorization errors
/// - **5000-5999**: Internal/System errors
///
/// Codes are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Configuration Errors (1000-1999) ===
    /// DSC-1001: Required setting missing
    MissingSetting = 1001,
    /// DSC-1002: Setting present but cannot be parsed
    InvalidSetting = 1002,
    /// DSC-1003: Conflicting or malformed web port mapping
    InvalidPortMapping = 1003,
    /// DSC-1004: Configuration source could not be loaded
    ConfigLoadFailed = 1004,

    // === Object Errors (2000-2999) ===
    /// DSC-2001: Object not found in a store
    ObjectNotFound = 2001,
    /// DSC-2002: Object with the same id already exists
    ObjectExists = 2002,
    /// DSC-2003: Request payload or parameters are invalid
    InvalidRequest = 2003,
    /// DSC-2004: Backing store failed
    StoreFailure = 2004,

    // === Transfer Errors (3000-3999) ===
    /// DSC-3001: Transfer process not found
    TransferProcessNotFound = 3001,
    /// DSC-3002: No handler registered for a command type
    NoHandlerRegistered = 3002,
    /// DSC-3003: No reader/writer for a data address type
    UnsupportedDataType = 3003,
    /// DSC-3004: Data transfer failed
    TransferFailed = 3004,
    /// DSC-3005: Validation rule rejected a request
    ValidationFailed = 3005,
    /// DSC-3006: Work queue is full
    QueueFull = 3006,
    /// DSC-3007: No dispatcher for a protocol
    NoDispatcher = 3007,

    // === Auth Errors (4000-4999) ===
    /// DSC-4001: Authentication failed
    AuthenticationFailed = 4001,
    /// DSC-4002: Authorization not possible or failed
    AuthorizationFailed = 4002,
    /// DSC-4003: Token malformed or signature invalid
    InvalidToken = 4003,
    /// DSC-4004: Token expired
    TokenExpired = 4004,

    // === Internal Errors (5000-5999) ===
    /// DSC-5001: Unexpected internal state
    Internal = 5001,
    /// DSC-5002: Serialization/deserialization failed
    SerializationFailed = 5002,
    /// DSC-5003: I/O failure
    Io = 5003,
    /// DSC-5004: Feature not implemented
    NotImplemented = 5004,
    /// DSC-5005: Required feature not provided by any extension
    UnsatisfiedDependency = 5005,
    /// DSC-5006: Extension dependency graph contains a cycle
    DependencyCycle = 5006,
    /// DSC-5007: Service not registered in the context
    ServiceNotFound = 5007,
    /// DSC-5008: Web server failed to start
    WebServerFailed = 5008,

    /// DSC-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "DSC-2001")
    pub fn as_str(&self) -> String {
        format!("DSC-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            1000..=1999 => ErrorCategory::Config,
            2000..=2999 => ErrorCategory::Object,
            3000..=3999 => ErrorCategory::Transfer,
            4000..=4999 => ErrorCategory::Auth,
            _ => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> String {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        let num: u16 = s
            .strip_prefix("DSC-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            1001 => Ok(Self::MissingSetting),
            1002 => Ok(Self::InvalidSetting),
            1003 => Ok(Self::InvalidPortMapping),
            1004 => Ok(Self::ConfigLoadFailed),
            2001 => Ok(Self::ObjectNotFound),
            2002 => Ok(Self::ObjectExists),
            2003 => Ok(Self::InvalidRequest),
            2004 => Ok(Self::StoreFailure),
            3001 => Ok(Self::TransferProcessNotFound),
            3002 => Ok(Self::NoHandlerRegistered),
            3003 => Ok(Self::UnsupportedDataType),
            3004 => Ok(Self::TransferFailed),
            3005 => Ok(Self::ValidationFailed),
            3006 => Ok(Self::QueueFull),
            3007 => Ok(Self::NoDispatcher),
            4001 => Ok(Self::AuthenticationFailed),
            4002 => Ok(Self::AuthorizationFailed),
            4003 => Ok(Self::InvalidToken),
            4004 => Ok(Self::TokenExpired),
            5001 => Ok(Self::Internal),
            5002 => Ok(Self::SerializationFailed),
            5003 => Ok(Self::Io),
            5004 => Ok(Self::NotImplemented),
            5005 => Ok(Self::UnsatisfiedDependency),
            5006 => Ok(Self::DependencyCycle),
            5007 => Ok(Self::ServiceNotFound),
            5008 => Ok(Self::WebServerFailed),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category, used to pick HTTP status codes and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    Config,
    Object,
    Transfer,
    Auth,
    Internal,
}
