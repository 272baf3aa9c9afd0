use std::num::NonZeroUsize;

use tracing::debug;

use crate::{error::Result, types::PageEvent};

/// Destination for bulk writes
pub trait EventSink {
    /// Write one batch, in order. The call completes only once the batch has
    /// been accepted or rejected.
    async fn insert_batch(&mut self, events: &[PageEvent]) -> Result<()>;
}

/// Reported after every successful flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Records written so far, including this batch
    pub inserted: u64,
    /// Size of the batch just written
    pub batch_len: usize,
    /// True for the flush that drained the stream
    pub last: bool,
}

/// Accumulates events and flushes them to a sink in fixed-size batches
pub struct BatchWriter<S> {
    sink: S,
    batch_size: NonZeroUsize,
    buffer: Vec<PageEvent>,
    inserted: u64,
}

impl<S: EventSink> BatchWriter<S> {
    pub fn new(sink: S, batch_size: NonZeroUsize) -> Self {
        Self {
            sink,
            batch_size,
            buffer: Vec::with_capacity(batch_size.get()),
            inserted: 0,
        }
    }

    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Drain `events` into the sink and return the number of records written.
    ///
    /// A failed write is returned as-is; nothing after it is attempted.
    pub async fn write_all<I, F>(&mut self, events: I, mut on_progress: F) -> Result<u64>
    where
        I: IntoIterator<Item = PageEvent>,
        F: FnMut(Progress),
    {
        let mut events = events.into_iter().peekable();

        while let Some(event) = events.next() {
            self.buffer.push(event);
            if self.buffer.len() >= self.batch_size.get() {
                let last = events.peek().is_none();
                on_progress(self.flush(last).await?);
            }
        }

        if !self.buffer.is_empty() {
            on_progress(self.flush(true).await?);
        }

        Ok(self.inserted)
    }

    async fn flush(&mut self, last: bool) -> Result<Progress> {
        self.sink.insert_batch(&self.buffer).await?;

        let batch_len = self.buffer.len();
        self.inserted += batch_len as u64;
        self.buffer.clear();
        debug!(batch_len, inserted = self.inserted, last, "flushed batch");

        Ok(Progress {
            inserted: self.inserted,
            batch_len,
            last,
        })
    }
}
