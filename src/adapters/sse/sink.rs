//! Channel-backed sink feeding one SSE response body.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::ports::{EventSink, SinkError};

/// Pushes frames into a bounded queue that the response body drains.
///
/// Closing drops the sender so the body ends once queued frames are flushed.
pub struct ChannelSink {
    tx: Mutex<Option<mpsc::Sender<Bytes>>>,
}

impl ChannelSink {
    /// Create a sink and the receiver the response body reads from.
    pub fn new(buffer: usize) -> (Arc<Self>, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let sink = Arc::new(Self {
            tx: Mutex::new(Some(tx)),
        });
        (sink, rx)
    }

    fn sender(&self) -> Option<mpsc::Sender<Bytes>> {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn send(&self, frame: Bytes) -> Result<(), SinkError> {
        let tx = self.sender().ok_or(SinkError::Closed)?;
        let permit = tx.reserve().await.map_err(|_| SinkError::Closed)?;

        // A close that landed while we waited for capacity wins.
        let current = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_none() {
            return Err(SinkError::Closed);
        }
        permit.send(frame);
        Ok(())
    }

    fn close(&self) {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
