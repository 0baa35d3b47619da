//! # bvbrc-error
//!
//! Unified error types for the BV-BRC data query engine.
//!
//! Every failure carries:
//! - A numeric error code (BVBRC-XXXX) that also decides retry eligibility
//! - Structured JSON context (HTTP status, response body, attempts)
//! - An optional actionable hint

mod code;
mod context;
mod convert;

pub use code::{ErrorCategory, ErrorCode};
pub use context::ErrorContext;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified error type for all data API operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Numeric error code (e.g., "BVBRC-2001")
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Structured context for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Actionable suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiError {
    /// Create a new error with code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
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

    /// The cancellation signal fired before the operation completed.
    pub fn cancelled() -> Self {
        Self::new(ErrorCode::QueryCancelled, "query cancelled")
    }

    /// A 4xx response. Never retried; the body text is kept for diagnosis.
    pub fn rejection(method: &str, url: &str, status: u16, reason: &str, body: String) -> Self {
        Self::new(
            ErrorCode::RemoteRejection,
            format!("API error: {} {} - {}", status, reason, body),
        )
        .with_context(ErrorContext::Http {
            method: method.to_string(),
            url: url.to_string(),
            status,
            body: Some(body),
        })
    }

    /// A 5xx response.
    pub fn server_error(method: &str, url: &str, status: u16, reason: &str) -> Self {
        Self::new(
            ErrorCode::ServerError,
            format!("server error: {} {}", status, reason),
        )
        .with_context(ErrorContext::Http {
            method: method.to_string(),
            url: url.to_string(),
            status,
            body: None,
        })
    }

    /// See [`ErrorCode::is_retryable`].
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    /// HTTP status of the failed exchange, when one was received.
    pub fn status(&self) -> Option<u16> {
        match &self.context {
            Some(ErrorContext::Http { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize ApiError: {}", e);
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

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (Hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Result type alias for data API operations
pub type Result<T> = std::result::Result<T, ApiError>;
