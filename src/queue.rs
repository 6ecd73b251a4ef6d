//! Bounded FIFO queues between pipeline stages.
//!
//! `tokio::sync::mpsc` already gives us bounded, FIFO, backpressured
//! channels: `send().await` blocks on a full channel, `recv().await`
//! blocks on an empty one. What it doesn't give us cheaply is an
//! `is_empty()` / `len()` the stage loops need to check queue occupancy
//! before deciding whether to keep producing, so both queue types pair
//! the channel with an `AtomicUsize` length counter kept in lockstep with
//! successful sends/receives.
//!
//! Each queue has exactly one producer and one consumer: `new()` hands back
//! the receiving half and a single sending handle, and does not retain a
//! sender of its own. Retaining one would keep the channel permanently
//! open even after the real producer's handle is dropped, defeating the
//! "take returns None once exhausted" signal the stage loops rely on.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::types::{ImageRecord, ScavengeResult};

pub struct ImageQueue {
    rx: mpsc::Receiver<ImageRecord>,
    len: Arc<AtomicUsize>,
}

pub struct ImageQueueHandle {
    tx: mpsc::Sender<ImageRecord>,
    len: Arc<AtomicUsize>,
}

impl ImageQueue {
    pub fn new(capacity: usize) -> (Self, ImageQueueHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let len = Arc::new(AtomicUsize::new(0));
        (
            Self { rx, len: len.clone() },
            ImageQueueHandle { tx, len },
        )
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocks (yields) while the channel is empty; `None` once the producer
    /// handle has been dropped, i.e. the image stage is gone.
    pub async fn take(&mut self) -> Option<ImageRecord> {
        let record = self.rx.recv().await;
        if record.is_some() {
            self.len.fetch_sub(1, Ordering::AcqRel);
        }
        record
    }
}

impl ImageQueueHandle {
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Blocks (yields) while the channel is full.
    pub async fn put(&self, record: ImageRecord) -> bool {
        if self.tx.send(record).await.is_err() {
            return false;
        }
        self.len.fetch_add(1, Ordering::AcqRel);
        true
    }
}

pub struct ResultQueue {
    rx: mpsc::Receiver<ScavengeResult>,
    len: Arc<AtomicUsize>,
}

pub struct ResultQueueHandle {
    tx: mpsc::Sender<ScavengeResult>,
    len: Arc<AtomicUsize>,
}

impl ResultQueue {
    pub fn new(capacity: usize) -> (Self, ResultQueueHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let len = Arc::new(AtomicUsize::new(0));
        (
            Self { rx, len: len.clone() },
            ResultQueueHandle { tx, len },
        )
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-blocking pop used by the client-facing `loadNextResult`.
    pub fn try_take(&mut self) -> Option<ScavengeResult> {
        match self.rx.try_recv() {
            Ok(result) => {
                self.len.fetch_sub(1, Ordering::AcqRel);
                Some(result)
            }
            Err(_) => None,
        }
    }

    /// Blocking pop used once, by the `Scavenger` constructor, to guarantee
    /// a valid initial result before construction returns. `None` once the
    /// hunting stage is gone and the queue has drained, which is how an
    /// initially-empty pipeline is detected.
    pub async fn take(&mut self) -> Option<ScavengeResult> {
        let result = self.rx.recv().await;
        if result.is_some() {
            self.len.fetch_sub(1, Ordering::AcqRel);
        }
        result
    }
}

impl ResultQueueHandle {
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub async fn put(&self, result: ScavengeResult) -> bool {
        if self.tx.send(result).await.is_err() {
            return false;
        }
        self.len.fetch_add(1, Ordering::AcqRel);
        true
    }
}
