//! HTTP transport.
//!
//! One request/response cycle per call, wrapped in the retry policy from
//! `bvbrc_common::retry`. Status handling:
//! - 5xx, connection failures and undecodable bodies are retryable
//! - 4xx aborts immediately with the response body attached
//!
//! Pagination state travels in a `Content-Range: items <start>-<next>/<total>` header.

use bvbrc_common::cancel::CancelToken;
use bvbrc_common::config::RetrySettings;
use bvbrc_common::retry::retry_with_policy;
use bvbrc_error::{ApiError, ErrorCode, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE, RANGE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

/// A schema-less record. Values stay as dynamic JSON.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub const RQL_CONTENT_TYPE: &str = "application/rqlquery+x-www-form-urlencoded";
pub const JSON_ACCEPT: &str = "application/json";

static CONTENT_RANGE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"items\s+(\d+)-(\d+)/(\d+)").unwrap());

/// Pagination info derived from one response. Never persisted across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkInfo {
    pub start: usize,
    pub next: usize,
    pub total: usize,
    pub is_last: bool,
}

/// Parse a `Content-Range` value. Empty or malformed input yields a zero `ChunkInfo`.
pub fn parse_content_range(header: &str) -> ChunkInfo {
    let Some(caps) = CONTENT_RANGE_REGEX.captures(header) else {
        return ChunkInfo::default();
    };

    let parsed = (
        caps[1].parse::<usize>(),
        caps[2].parse::<usize>(),
        caps[3].parse::<usize>(),
    );
    match parsed {
        (Ok(start), Ok(next), Ok(total)) => ChunkInfo {
            start,
            next,
            total,
            is_last: next >= total,
        },
        _ => ChunkInfo::default(),
    }
}

/// One decoded page of results.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<Record>,
    pub chunk: ChunkInfo,
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    auth: Option<String>,
    retry: RetrySettings,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, retry: RetrySettings) -> Self {
        Self {
            http,
            auth: None,
            retry,
        }
    }

    pub(crate) fn set_auth(&mut self, token: String) {
        self.auth = (!token.is_empty()).then_some(token);
    }

    pub(crate) fn retry_mut(&mut self) -> &mut RetrySettings {
        &mut self.retry
    }

    pub(crate) fn retry(&self) -> RetrySettings {
        self.retry
    }

    /// POST an RQL body and decode one page, retrying per policy.
    pub(crate) async fn execute_query(
        &self,
        url: &str,
        body: &str,
        cancel: &CancelToken,
    ) -> Result<Page> {
        retry_with_policy("query", self.retry, cancel, || self.query_once(url, body)).await
    }

    /// POST an RQL body with a one-row range and read only the total.
    pub(crate) async fn execute_count(
        &self,
        url: &str,
        body: &str,
        cancel: &CancelToken,
    ) -> Result<usize> {
        retry_with_policy("count", self.retry, cancel, || self.count_once(url, body)).await
    }

    /// GET a JSON document. With `allow_not_found`, 404 yields `Ok(None)`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        allow_not_found: bool,
        cancel: &CancelToken,
    ) -> Result<Option<T>> {
        retry_with_policy("get", self.retry, cancel, || {
            self.get_once(url, allow_not_found)
        })
        .await
    }

    async fn query_once(&self, url: &str, body: &str) -> Result<Page> {
        let resp = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, RQL_CONTENT_TYPE)
            .body(body.to_string())
            .send()
            .await?;
        let resp = check_status(&Method::POST, url, resp).await?;

        let chunk = content_range(&resp);
        let bytes = resp.bytes().await?;
        let records: Vec<Record> =
            serde_json::from_slice(&bytes).map_err(|e| decode_error(url, e))?;

        Ok(Page { records, chunk })
    }

    async fn count_once(&self, url: &str, body: &str) -> Result<usize> {
        let resp = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, RQL_CONTENT_TYPE)
            .header(RANGE, "items=0-0")
            .body(body.to_string())
            .send()
            .await?;
        let resp = check_status(&Method::POST, url, resp).await?;

        Ok(content_range(&resp).total)
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        allow_not_found: bool,
    ) -> Result<Option<T>> {
        let resp = self.request(Method::GET, url).send().await?;

        if allow_not_found && resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_status(&Method::GET, url, resp).await?;

        let bytes = resp.bytes().await?;
        let value = serde_json::from_slice(&bytes).map_err(|e| decode_error(url, e))?;
        Ok(Some(value))
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let req = self.http.request(method, url).header(ACCEPT, JSON_ACCEPT);
        match &self.auth {
            Some(token) => req.header(AUTHORIZATION, token.as_str()),
            None => req,
        }
    }
}

fn content_range(resp: &reqwest::Response) -> ChunkInfo {
    resp.headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .map(parse_content_range)
        .unwrap_or_default()
}

async fn check_status(
    method: &Method,
    url: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = resp.status();
    let reason = status.canonical_reason().unwrap_or("");

    if status.is_server_error() {
        return Err(ApiError::server_error(
            method.as_str(),
            url,
            status.as_u16(),
            reason,
        ));
    }

    if status.is_client_error() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::rejection(
            method.as_str(),
            url,
            status.as_u16(),
            reason,
            body,
        ));
    }

    Ok(resp)
}

fn decode_error(url: &str, err: serde_json::Error) -> ApiError {
    ApiError::new(ErrorCode::DecodeFailed, format!("decoding response: {}", err)).with_context(
        ErrorContext::Decode {
            url: Some(url.to_string()),
            detail: err.to_string(),
        },
    )
}
