//! Paginated retrieval client.
//!
//! Every retrieval mode shares one page loop ([`Pager`]). The loop requests
//! `limit(page_size[,offset])` windows, trims each page to the remaining
//! limit, and stops on the first of:
//! - the `Content-Range` header reports the last page
//! - the page came back shorter than requested
//! - the limit has been reached
//!
//! Requests without filters get an `eq(<id column>,*)` clause because the
//! service rejects unfiltered queries.

use crate::query::Query;
use crate::registry;
use crate::rql;
use crate::stream::{self, RecordStream};
use crate::transport::{ChunkInfo, Page, Record, Transport};
use bvbrc_common::cancel::CancelToken;
use bvbrc_common::config::{ClientSettings, RetrySettings};
use bvbrc_error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, info};

const SCHEMA_QUERY: &str =
    "http_content-type=application/solrquery+x-www-form-urlencoded&http_accept=application/solr+json";

/// One field of a collection schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(rename = "multiValued", default)]
    pub multi_valued: bool,
}

#[derive(Deserialize)]
struct SchemaResponse {
    schema: SchemaFields,
}

#[derive(Deserialize)]
struct SchemaFields {
    #[serde(default)]
    fields: Vec<FieldInfo>,
}

/// Client for the BV-BRC Data API.
///
/// Configuration is fixed once built; clones share the underlying connection
/// pool and may run independent queries concurrently.
#[derive(Debug, Clone)]
pub struct DataClient {
    base_url: String,
    chunk_size: usize,
    transport: Transport,
}

impl DataClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        settings.check()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            chunk_size: settings.chunk_size,
            transport: Transport::new(http, settings.retry),
        })
    }

    /// Authenticate with a raw token. An empty token sends no `Authorization` header.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.transport.set_auth(token.into());
        self
    }

    /// Authenticate with any credential whose string form is the token.
    pub fn with_credential(self, credential: impl Display) -> Self {
        self.with_token(credential.to_string())
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.transport.retry_mut().max_retries = max_retries;
        self
    }

    pub fn with_retry_settings(mut self, retry: RetrySettings) -> Self {
        *self.transport.retry_mut() = retry;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn max_retries(&self) -> u32 {
        self.transport.retry().max_retries
    }

    /// Fetch every matching record, up to the query limit.
    ///
    /// Fails as a whole: records from earlier pages are discarded if a later page fails.
    pub async fn query_all(
        &self,
        object_type: &str,
        query: &Query,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>> {
        let mut pager = self.pager(object_type, query);
        let mut records = Vec::new();

        while let Some(page) = pager.next_page(&self.transport, cancel).await? {
            records.extend(page.records);
        }

        debug!(object_type, count = records.len(), "query complete");
        Ok(records)
    }

    /// Deliver results page by page. Returning `false` from `on_batch` stops
    /// the retrieval without issuing further requests.
    pub async fn query_callback<F>(
        &self,
        object_type: &str,
        query: &Query,
        cancel: &CancelToken,
        mut on_batch: F,
    ) -> Result<()>
    where
        F: FnMut(&[Record], &ChunkInfo) -> bool,
    {
        let mut pager = self.pager(object_type, query);

        while let Some(page) = pager.next_page(&self.transport, cancel).await? {
            if !on_batch(&page.records, &page.chunk) {
                debug!(object_type, "callback requested stop");
                break;
            }
        }

        Ok(())
    }

    /// Stream records one at a time from a spawned producer task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn query_stream(&self, object_type: &str, query: Query, cancel: CancelToken) -> RecordStream {
        let pager = self.pager(object_type, &query);
        info!(object_type, "starting record stream");
        stream::spawn(pager, self.transport.clone(), cancel)
    }

    /// Total number of matching records. Issues a single one-row request.
    pub async fn count(&self, object_type: &str, query: &Query, cancel: &CancelToken) -> Result<usize> {
        if cancel.is_cancelled() {
            return Err(ApiError::cancelled());
        }

        let (url, rql) = self.prepare(object_type, query);
        let body = rql::with_page(&rql, 1, 0);
        debug!(url = %url, body = %body, "count request");

        self.transport.execute_count(&url, &body, cancel).await
    }

    /// Fetch one record by its exact identifier. `Ok(None)` when the service answers 404.
    pub async fn get_by_id(
        &self,
        object_type: &str,
        id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<Record>> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            registry::object_type(object_type),
            rql::encode_path_segment(id)
        );
        debug!(url = %url, "lookup by id");

        self.transport.get_json(&url, true, cancel).await
    }

    /// Field definitions of the collection behind `object_type`.
    pub async fn get_schema(&self, object_type: &str, cancel: &CancelToken) -> Result<Vec<FieldInfo>> {
        let url = format!(
            "{}/{}/schema?{}",
            self.base_url,
            registry::object_type(object_type),
            SCHEMA_QUERY
        );
        debug!(url = %url, "schema request");

        let response: Option<SchemaResponse> = self.transport.get_json(&url, false, cancel).await?;
        Ok(response.map(|r| r.schema.fields).unwrap_or_default())
    }

    /// Resolve the collection URL and encode the query, injecting the
    /// wildcard ID filter when the query has no constraints of its own.
    fn prepare(&self, object_type: &str, query: &Query) -> (String, String) {
        let resolved = registry::object_type(object_type);
        let url = format!("{}/{}/", self.base_url, resolved);

        let rql = if query.has_filters() {
            query.build()
        } else {
            let id_column = wildcard_column(resolved);
            query.clone().eq(id_column, "*").build()
        };

        (url, rql)
    }

    fn pager(&self, object_type: &str, query: &Query) -> Pager {
        let (url, rql) = self.prepare(object_type, query);
        let limit = query.limit_opt();
        let page_size = match limit {
            Some(limit) => self.chunk_size.min(limit),
            None => self.chunk_size,
        };

        Pager {
            url,
            rql,
            page_size,
            limit,
            offset: 0,
            delivered: 0,
            done: false,
        }
    }
}

fn wildcard_column(resolved: &str) -> &'static str {
    match registry::id_column(resolved) {
        "" => "id",
        col => col,
    }
}

/// Cursor state for one retrieval. Owned by a single call, never shared.
#[derive(Debug)]
pub(crate) struct Pager {
    url: String,
    rql: String,
    page_size: usize,
    limit: Option<usize>,
    offset: usize,
    delivered: usize,
    done: bool,
}

impl Pager {
    /// Fetch the next page, or `None` once the retrieval has finished.
    pub(crate) async fn next_page(
        &mut self,
        transport: &Transport,
        cancel: &CancelToken,
    ) -> Result<Option<Page>> {
        if self.done {
            return Ok(None);
        }
        if cancel.is_cancelled() {
            return Err(ApiError::cancelled());
        }

        let body = rql::with_page(&self.rql, self.page_size, self.offset);
        debug!(
            url = %self.url,
            body = %body,
            page_size = self.page_size,
            offset = self.offset,
            "page request"
        );

        let mut page = transport.execute_query(&self.url, &body, cancel).await?;
        let received = page.records.len();

        if let Some(limit) = self.limit {
            page.records.truncate(limit.saturating_sub(self.delivered));
        }
        self.delivered += page.records.len();

        let limit_reached = self.limit.is_some_and(|limit| self.delivered >= limit);
        if page.chunk.is_last || received < self.page_size || limit_reached {
            self.done = true;
        } else if page.chunk.next > self.offset {
            self.offset = page.chunk.next;
        } else {
            // header missing or not advancing; step past what was received
            self.offset += received;
        }

        Ok(Some(page))
    }

    #[cfg(test)]
    fn page_size(&self) -> usize {
        self.page_size
    }
}
