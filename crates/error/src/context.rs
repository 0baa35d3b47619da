//! # Error Contexts
//!
//! Structured metadata attached to errors for programmatic handling.

use serde::{Deserialize, Serialize};

/// Structured context for an [`ApiError`](crate::ApiError).
///
/// Each variant provides the fields relevant to that failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// An HTTP exchange that ended in a non-success status.
    Http {
        method: String,
        url: String,
        status: u16,
        /// Response body text, as returned by the service
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },

    /// Retry budget exhausted (BVBRC-1001..1003, 5001)
    Retry {
        attempts: u32,
        last_error: String,
    },

    /// Body or header could not be decoded (BVBRC-5001)
    Decode {
        url: Option<String>,
        detail: String,
    },

    /// Configuration errors (BVBRC-3001/3002)
    Config {
        field: Option<String>,
        file_path: Option<String>,
    },

    /// Generic key-value context for extensibility
    Generic {
        #[serde(flatten)]
        data: std::collections::HashMap<String, serde_json::Value>,
    },
}
