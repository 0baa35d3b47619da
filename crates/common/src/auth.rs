use bvbrc_error::{ApiError, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

static USER_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bun=([^|]+)").unwrap());

static EXPIRY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bexpiry=(\d+)").unwrap());

/// A BV-BRC authentication token with the metadata embedded in it.
///
/// The raw token is what goes into the `Authorization` header; [`fmt::Display`]
/// yields it unchanged. Acquiring a token (login, token files) happens elsewhere.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    raw: String,
    user_id: Option<String>,
    expiry: Option<SystemTime>,
    is_admin: bool,
}

impl Token {
    /// Parse a raw token without validating it.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();

        let user_id = USER_ID_REGEX
            .captures(&raw)
            .map(|caps| caps[1].to_string());

        let expiry = EXPIRY_REGEX
            .captures(&raw)
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .map(|secs| UNIX_EPOCH + Duration::from_secs(secs));

        let is_admin = raw.contains("|scope=user|") && raw.contains("|roles=admin|");

        Self {
            raw,
            user_id,
            expiry,
            is_admin,
        }
    }

    /// Parse and validate a token.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let token = Self::parse(raw);
        if token.raw.is_empty() || !token.raw.contains("un=") {
            return Err(ApiError::new(ErrorCode::InvalidToken, "token is empty or malformed")
                .with_hint("Log in again to obtain a fresh token"));
        }
        if token.is_expired() {
            return Err(ApiError::new(ErrorCode::TokenExpired, "token has expired")
                .with_hint("Log in again to obtain a fresh token"));
        }
        Ok(token)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn expiry(&self) -> Option<SystemTime> {
        self.expiry
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Tokens without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|exp| SystemTime::now() > exp)
    }

    pub fn is_valid(&self) -> bool {
        !self.raw.is_empty() && self.raw.contains("un=") && !self.is_expired()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// Keep the signature out of debug output and logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("user_id", &self.user_id)
            .field("expiry", &self.expiry)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAR_FUTURE: u64 = 4_102_444_800; // 2100-01-01

    fn raw_token(user: &str, expiry: u64, extra: &str) -> String {
        format!(
            "un={}|tokenid=abc-123|expiry={}|client_id={}|token_type=Bearer{}|sig=deadbeef",
            user, expiry, user, extra
        )
    }

    #[test]
    fn test_parse_metadata() {
        let token = Token::parse(raw_token("alice@patricbrc.org", FAR_FUTURE, ""));
        assert_eq!(token.user_id(), Some("alice@patricbrc.org"));
        assert_eq!(
            token.expiry(),
            Some(UNIX_EPOCH + Duration::from_secs(FAR_FUTURE))
        );
        assert!(!token.is_admin());
        assert!(token.is_valid());
    }

    #[test]
    fn test_display_is_raw_string() {
        let raw = raw_token("bob@patricbrc.org", FAR_FUTURE, "");
        let token = Token::new(raw.clone()).unwrap();
        assert_eq!(token.to_string(), raw);
        assert_eq!(token.as_str(), raw);
    }

    #[test]
    fn test_debug_hides_signature() {
        let token = Token::parse(raw_token("bob@patricbrc.org", FAR_FUTURE, ""));
        let debug = format!("{:?}", token);
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("bob@patricbrc.org"));
    }

    #[test]
    fn test_expired_token() {
        let token = Token::parse(raw_token("carol@patricbrc.org", 1_000, ""));
        assert!(token.is_expired());
        assert!(!token.is_valid());
        assert_eq!(
            Token::new(token.as_str()).unwrap_err().code,
            ErrorCode::TokenExpired
        );
    }

    #[test]
    fn test_admin_flag() {
        let token = Token::parse(raw_token(
            "root@patricbrc.org",
            FAR_FUTURE,
            "|scope=user|roles=admin|",
        ));
        assert!(token.is_admin());
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(Token::new("").unwrap_err().code, ErrorCode::InvalidToken);
        assert_eq!(
            Token::new("tokenid=abc|sig=1").unwrap_err().code,
            ErrorCode::InvalidToken
        );
    }

    #[test]
    fn test_token_without_expiry_never_expires() {
        let token = Token::parse("un=dave@patricbrc.org|sig=1");
        assert!(token.expiry().is_none());
        assert!(token.is_valid());
    }
}
