#![allow(dead_code)]

use bvbrc_api::DataClient;
use bvbrc_common::config::{ClientSettings, RetrySettings};
use serde_json::{json, Value};
use wiremock::MockServer;

/// Client pointed at the mock server with millisecond backoff.
pub fn test_client(server: &MockServer, chunk_size: usize, max_retries: u32) -> DataClient {
    bvbrc_common::telemetry::init_logging("bvbrc_api=debug,bvbrc_common=debug");
    let settings = ClientSettings {
        base_url: server.uri(),
        chunk_size,
        retry: RetrySettings {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
        ..Default::default()
    };
    DataClient::new(settings).expect("Failed to build client")
}

/// Genome records `start..end`, each with a distinct `genome_id`.
pub fn genome_records(start: usize, end: usize) -> Value {
    let rows: Vec<Value> = (start..end)
        .map(|i| json!({ "genome_id": format!("{}.1", i), "genome_length": i * 1000 }))
        .collect();
    Value::Array(rows)
}
