//! In-memory sinks for hub tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::ports::{EventSink, SinkError};

/// Records every frame it accepts.
#[derive(Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<Bytes>>,
    closes: AtomicUsize,
}

impl RecordingSink {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn frames(&self) -> Vec<Bytes> {
        self.frames.lock().unwrap().clone()
    }

    /// Frames decoded as UTF-8.
    pub fn texts(&self) -> Vec<String> {
        self.frames()
            .iter()
            .map(|f| String::from_utf8(f.to_vec()).unwrap())
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn send(&self, frame: Bytes) -> Result<(), SinkError> {
        if self.is_closed() {
            return Err(SinkError::Closed);
        }
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fails every send with a write error.
pub struct FailingSink {
    reason: String,
    closes: AtomicUsize,
}

impl FailingSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn shared(reason: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(reason))
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSink for FailingSink {
    async fn send(&self, _frame: Bytes) -> Result<(), SinkError> {
        Err(SinkError::Write(self.reason.clone()))
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Never completes a send.
#[derive(Default)]
pub struct StallingSink {
    closes: AtomicUsize,
}

impl StallingSink {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSink for StallingSink {
    async fn send(&self, _frame: Bytes) -> Result<(), SinkError> {
        std::future::pending::<()>().await;
        Ok(())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
