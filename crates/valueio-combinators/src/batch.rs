use std::mem;

use tracing::trace;
use valueio_core::{Context, Reader, Result, StreamError, Writer};

/// Batch size used when a caller asks for zero.
pub const DEFAULT_BATCH_SIZE: usize = 8;

fn effective_size(size: usize) -> usize {
    if size == 0 {
        DEFAULT_BATCH_SIZE
    } else {
        size
    }
}

/// Groups values from a reader into batches of up to `size`.
///
/// A failure hit part-way through a batch is held back: the partial batch is
/// returned first and the failure on the following call. A failure hit before
/// any value was collected is returned straight away. Batches are therefore
/// never empty.
#[derive(Debug)]
pub struct Batching<R> {
    inner: Option<R>,
    size: usize,
    deferred: Option<StreamError>,
}

/// Wrap `reader` so each read yields up to `size` values. A `size` of zero
/// means [`DEFAULT_BATCH_SIZE`]. `None` yields a reader that always ends.
pub fn batching<R>(reader: Option<R>, size: usize) -> Batching<R> {
    Batching {
        inner: reader,
        size: effective_size(size),
        deferred: None,
    }
}

impl<R> Batching<R> {
    /// Maximum values per batch.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get_ref(&self) -> Option<&R> {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Option<R> {
        self.inner
    }
}

impl<T, R: Reader<T>> Reader<Vec<T>> for Batching<R> {
    fn read(&mut self, ctx: &Context) -> Result<Vec<T>> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::EndOfStream);
        };

        let mut batch = Vec::with_capacity(self.size);
        while batch.len() < self.size {
            match inner.read(ctx) {
                Ok(value) => batch.push(value),
                Err(err) if batch.is_empty() => return Err(err),
                Err(err) => {
                    self.deferred = Some(err);
                    break;
                }
            }
        }
        Ok(batch)
    }
}

/// Accumulates written values and forwards them as batches of `size`.
///
/// Values are held in memory until the batch fills or [`flush`] is called;
/// anything still pending when the writer is dropped is lost.
///
/// [`flush`]: BatchingWriter::flush
#[derive(Debug)]
pub struct BatchingWriter<T, W> {
    inner: Option<W>,
    size: usize,
    buf: Vec<T>,
}

/// Wrap `writer` so every `size` values are written as one batch. A `size`
/// of zero means [`DEFAULT_BATCH_SIZE`]. `None` yields a writer that is
/// always closed.
pub fn batching_writer<T, W>(writer: Option<W>, size: usize) -> BatchingWriter<T, W> {
    let size = effective_size(size);
    BatchingWriter {
        inner: writer,
        size,
        buf: Vec::with_capacity(size),
    }
}

impl<T, W> BatchingWriter<T, W> {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Values accepted but not yet forwarded.
    pub fn pending(&self) -> &[T] {
        &self.buf
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    /// Consume the writer and return the wrapped one. Pending values are
    /// dropped; call [`flush`](Self::flush) first to keep them.
    pub fn into_inner(self) -> Option<W> {
        self.inner
    }
}

impl<T, W: Writer<Vec<T>>> BatchingWriter<T, W> {
    /// Forward pending values as a short batch. A no-op when none are pending.
    pub fn flush(&mut self, ctx: &Context) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::DestinationClosed);
        };
        let batch = mem::replace(&mut self.buf, Vec::with_capacity(self.size));
        trace!(len = batch.len(), "flushing partial batch");
        inner.write(ctx, batch)
    }
}

impl<T, W: Writer<Vec<T>>> Writer<T> for BatchingWriter<T, W> {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::DestinationClosed);
        };

        self.buf.push(value);
        if self.buf.len() < self.size {
            return Ok(());
        }

        let batch = mem::replace(&mut self.buf, Vec::with_capacity(self.size));
        trace!(len = batch.len(), "flushing batch");
        inner.write(ctx, batch)
    }
}
