//! Channel-based record streaming.
//!
//! One producer task walks the page loop and sends records one at a time on a
//! bounded channel, so a slow consumer holds the producer back. A terminal
//! error goes on a separate one-slot channel. Both channels close when the
//! producer exits, whether it finished, hit the limit, failed or was cancelled.

use crate::client::Pager;
use crate::transport::{Record, Transport};
use bvbrc_common::cancel::CancelToken;
use bvbrc_error::{ApiError, ErrorCode, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const RECORD_CHANNEL_CAPACITY: usize = 100;

/// Receiving side of a streamed query.
///
/// Drain `records` until it closes, then check `errors` for a terminal error.
/// Dropping the stream stops the producer at its next send.
#[derive(Debug)]
pub struct RecordStream {
    pub records: mpsc::Receiver<Record>,
    pub errors: mpsc::Receiver<ApiError>,
    producer: JoinHandle<()>,
}

impl RecordStream {
    /// Drain the stream into memory, returning the terminal error if one occurred.
    pub async fn collect(self) -> Result<Vec<Record>> {
        let RecordStream {
            mut records,
            mut errors,
            producer,
        } = self;

        let mut out = Vec::new();
        while let Some(record) = records.recv().await {
            out.push(record);
        }

        if let Some(err) = errors.recv().await {
            return Err(err);
        }

        producer.await.map_err(|e| {
            ApiError::new(
                ErrorCode::ProducerFailed,
                format!("stream producer terminated abnormally: {}", e),
            )
        })?;

        Ok(out)
    }
}

pub(crate) fn spawn(mut pager: Pager, transport: Transport, cancel: CancelToken) -> RecordStream {
    let (record_tx, records) = mpsc::channel(RECORD_CHANNEL_CAPACITY);
    let (error_tx, errors) = mpsc::channel(1);

    let producer = tokio::spawn(async move {
        match produce(&mut pager, &transport, &cancel, &record_tx).await {
            Ok(sent) => info!(sent, "record stream finished"),
            Err(e) => {
                warn!("record stream failed: {}", e);
                // receiver may already be gone
                let _ = error_tx.send(e).await;
            }
        }
    });

    RecordStream {
        records,
        errors,
        producer,
    }
}

async fn produce(
    pager: &mut Pager,
    transport: &Transport,
    cancel: &CancelToken,
    tx: &mpsc::Sender<Record>,
) -> Result<usize> {
    let mut sent = 0;

    while let Some(page) = pager.next_page(transport, cancel).await? {
        for record in page.records {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ApiError::cancelled()),
                delivered = tx.send(record) => {
                    if delivered.is_err() {
                        debug!(sent, "record receiver dropped; stopping producer");
                        return Ok(sent);
                    }
                }
            }
            sent += 1;
        }
    }

    Ok(sent)
}
