use crate::{ApiError, ErrorCode, ErrorContext};

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            return ApiError::new(ErrorCode::Timeout, format!("request timed out: {}", err));
        }
        if err.is_decode() {
            return ApiError::new(
                ErrorCode::DecodeFailed,
                format!("decoding response: {}", err),
            )
            .with_context(ErrorContext::Decode {
                url,
                detail: err.to_string(),
            });
        }
        if err.is_builder() {
            return ApiError::new(
                ErrorCode::InvalidConfig,
                format!("building request: {}", err),
            );
        }
        if let Some(status) = err.status() {
            let code = if status.is_server_error() {
                ErrorCode::ServerError
            } else {
                ErrorCode::RemoteRejection
            };
            return ApiError::new(code, format!("API error: {}", status)).with_context(
                ErrorContext::Http {
                    method: String::new(),
                    url: url.unwrap_or_default(),
                    status: status.as_u16(),
                    body: None,
                },
            );
        }

        // connect, request and body errors all mean the exchange never completed
        ApiError::new(
            ErrorCode::ConnectionFailed,
            format!("executing request: {}", err),
        )
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::new(ErrorCode::DecodeFailed, format!("decoding response: {}", err)).with_context(
            ErrorContext::Decode {
                url: None,
                detail: err.to_string(),
            },
        )
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::new(ErrorCode::InvalidUrl, format!("invalid URL: {}", err))
    }
}
