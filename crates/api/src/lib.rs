//! Query engine for the BV-BRC Data API.
//!
//! - [`query`]: the query builder
//! - [`rql`]: its wire encoding
//! - [`registry`]: static object/type tables
//! - [`client`]: the paginated retrieval client (batch, callback, stream, count)
//!
//! ```no_run
//! use bvbrc_api::{DataClient, Query};
//! use bvbrc_common::{CancelToken, ClientSettings};
//!
//! # async fn run() -> bvbrc_error::Result<()> {
//! let client = DataClient::new(ClientSettings::default())?;
//! let query = Query::new()
//!     .select(["genome_id", "genome_name"])
//!     .eq("genus", "Streptomyces")
//!     .limit(10);
//! let genomes = client.query_all("genome", &query, &CancelToken::never()).await?;
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod query;
pub mod registry;
pub mod rql;
pub mod stream;
pub mod transport;

pub use client::{DataClient, FieldInfo};
pub use query::{parse_filter_spec, parse_in_filter_spec, Filter, FilterOp, Query, SortSpec};
pub use stream::RecordStream;
pub use transport::{parse_content_range, ChunkInfo, Page, Record};
