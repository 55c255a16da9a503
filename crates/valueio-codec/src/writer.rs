use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;
use valueio_core::{Closer, Context, Result, StreamError, Writer};

use crate::codec::Encoder;
use crate::json::JsonCodec;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes encoded values to any `Write` byte sink.
///
/// Every value is encoded, written in full and flushed before `write`
/// returns, unless per-value flushing is turned off with
/// [`with_flush_each`](EncodeWriter::with_flush_each). A sink that accepts
/// zero bytes or reports a broken pipe surfaces as `DestinationClosed`.
///
/// The default value has no sink and always fails with `DestinationClosed`.
pub struct EncodeWriter<W, E = JsonCodec> {
    inner: Option<W>,
    codec: E,
    buf: BytesMut,
    flush_each: bool,
}

impl<W: Write> EncodeWriter<W> {
    /// Create a writer using the default JSON strategy.
    pub fn new(inner: W) -> Self {
        Self::with_codec(inner, JsonCodec)
    }
}

impl<W: Write, E> EncodeWriter<W, E> {
    /// Create a writer with an explicit encode strategy.
    pub fn with_codec(inner: W, codec: E) -> Self {
        Self {
            inner: Some(inner),
            codec,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            flush_each: true,
        }
    }

    /// Whether every `write` also flushes the sink. Turn it off when the sink
    /// buffers on its own and call [`flush`](Self::flush) or `close` at the end.
    pub fn with_flush_each(mut self, flush_each: bool) -> Self {
        self.flush_each = flush_each;
        self
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        match self.inner.as_mut() {
            Some(inner) => flush_sink(inner),
            None => Err(StreamError::DestinationClosed),
        }
    }
}

impl<W, E> EncodeWriter<W, E> {
    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.inner.as_mut()
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> Option<W> {
        self.inner
    }
}

impl<W, E: Default> Default for EncodeWriter<W, E> {
    fn default() -> Self {
        Self {
            inner: None,
            codec: E::default(),
            buf: BytesMut::new(),
            flush_each: true,
        }
    }
}

impl<T, W: Write, E: Encoder<T>> Writer<T> for EncodeWriter<W, E> {
    fn write(&mut self, _ctx: &Context, value: T) -> Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::DestinationClosed);
        };

        self.buf.clear();
        self.codec.encode(&value, &mut self.buf)?;
        trace!(bytes = self.buf.len(), "encoded value");

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(StreamError::DestinationClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(sink_error(err)),
            }
        }

        if self.flush_each {
            flush_sink(inner)?;
        }
        Ok(())
    }
}

/// Closing flushes and releases the sink; later writes fail with
/// `DestinationClosed`.
impl<W: Write, E> Closer for EncodeWriter<W, E> {
    fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(mut inner) => flush_sink(&mut inner),
            None => Ok(()),
        }
    }
}

fn flush_sink<W: Write + ?Sized>(inner: &mut W) -> Result<()> {
    loop {
        match inner.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(sink_error(err)),
        }
    }
}

fn sink_error(err: std::io::Error) -> StreamError {
    match StreamError::from_io(err) {
        StreamError::Io(io) if io.kind() == ErrorKind::BrokenPipe => {
            StreamError::DestinationClosed
        }
        other => other,
    }
}
