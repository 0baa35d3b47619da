use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following BVBRC-XXXX format.
///
/// ## Code Ranges
/// - **1000-1999**: Transport errors (retryable)
/// - **2000-2999**: Request errors
/// - **3000-3999**: Configuration errors
/// - **4000-4999**: Credential errors
/// - **5000-5999**: Internal/decoding errors
///
/// Codes are stable across versions (semver contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Transport Errors (1000-1999) ===
    /// BVBRC-1001: Connection could not be established or was dropped
    ConnectionFailed = 1001,
    /// BVBRC-1002: Request timed out
    Timeout = 1002,
    /// BVBRC-1003: Data service answered with a 5xx status
    ServerError = 1003,

    // === Request Errors (2000-2999) ===
    /// BVBRC-2001: Data service rejected the request (4xx)
    RemoteRejection = 2001,
    /// BVBRC-2002: Record or object type not found
    NotFound = 2002,
    /// BVBRC-2003: Query cancelled or deadline exceeded
    QueryCancelled = 2003,
    /// BVBRC-2004: Malformed `field,value` filter specification
    InvalidFilterSpec = 2004,

    // === Configuration Errors (3000-3999) ===
    /// BVBRC-3001: Client configuration is invalid
    InvalidConfig = 3001,
    /// BVBRC-3002: URL could not be parsed
    InvalidUrl = 3002,

    // === Credential Errors (4000-4999) ===
    /// BVBRC-4001: Token is empty or malformed
    InvalidToken = 4001,
    /// BVBRC-4002: Token expired
    TokenExpired = 4002,

    // === Internal Errors (5000-5999) ===
    /// BVBRC-5001: Response body could not be decoded
    DecodeFailed = 5001,
    /// BVBRC-5002: Stream producer task failed
    ProducerFailed = 5002,

    /// BVBRC-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "BVBRC-2001")
    pub fn as_str(&self) -> String {
        format!("BVBRC-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            1000..=1999 => ErrorCategory::Transport,
            2000..=2999 => ErrorCategory::Request,
            3000..=3999 => ErrorCategory::Config,
            4000..=4999 => ErrorCategory::Auth,
            _ => ErrorCategory::Internal,
        }
    }

    /// Whether a failure with this code may succeed when the request is repeated.
    ///
    /// Transport failures and undecodable bodies consume retry budget; everything
    /// else (4xx, cancellation, configuration) propagates unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed | Self::Timeout | Self::ServerError | Self::DecodeFailed
        )
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
            .strip_prefix("BVBRC-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            1001 => Ok(Self::ConnectionFailed),
            1002 => Ok(Self::Timeout),
            1003 => Ok(Self::ServerError),
            2001 => Ok(Self::RemoteRejection),
            2002 => Ok(Self::NotFound),
            2003 => Ok(Self::QueryCancelled),
            2004 => Ok(Self::InvalidFilterSpec),
            3001 => Ok(Self::InvalidConfig),
            3002 => Ok(Self::InvalidUrl),
            4001 => Ok(Self::InvalidToken),
            4002 => Ok(Self::TokenExpired),
            5001 => Ok(Self::DecodeFailed),
            5002 => Ok(Self::ProducerFailed),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    Transport,
    Request,
    Config,
    Auth,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_formatting() {
        assert_eq!(ErrorCode::ConnectionFailed.as_str(), "BVBRC-1001");
        assert_eq!(ErrorCode::RemoteRejection.as_str(), "BVBRC-2001");
        assert_eq!(ErrorCode::Unknown.as_str(), "BVBRC-9999");
    }

    #[test]
    fn test_error_code_parsing() {
        assert_eq!(
            ErrorCode::try_from("BVBRC-1003".to_string()).unwrap(),
            ErrorCode::ServerError
        );
        assert_eq!(
            ErrorCode::try_from("BVBRC-9999".to_string()).unwrap(),
            ErrorCode::Unknown
        );
    }

    #[test]
    fn test_error_code_parsing_errors() {
        assert!(ErrorCode::try_from("INVALID".to_string()).is_err());
        assert!(ErrorCode::try_from("BVBRC-0000".to_string()).is_err());
        assert!(ErrorCode::try_from("BVBRC-ABC".to_string()).is_err());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ErrorCode::Timeout.category(), ErrorCategory::Transport);
        assert_eq!(ErrorCode::QueryCancelled.category(), ErrorCategory::Request);
        assert_eq!(ErrorCode::InvalidUrl.category(), ErrorCategory::Config);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::DecodeFailed.category(), ErrorCategory::Internal);
        assert_eq!(ErrorCode::Unknown.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_retryable_codes() {
        assert!(ErrorCode::ConnectionFailed.is_retryable());
        assert!(ErrorCode::Timeout.is_retryable());
        assert!(ErrorCode::ServerError.is_retryable());
        assert!(ErrorCode::DecodeFailed.is_retryable());

        assert!(!ErrorCode::RemoteRejection.is_retryable());
        assert!(!ErrorCode::QueryCancelled.is_retryable());
        assert!(!ErrorCode::InvalidConfig.is_retryable());
    }
}
