//! Byte-stream views over value capabilities.
//!
//! [`EncodedBytes`] turns a value reader into an `io::Read`; [`DecodingSink`]
//! turns a value writer into an `io::Write`. Each owns one scratch buffer that
//! is drained in place, so bytes not yet handed out survive across calls.

use std::io::{self, Read, Write};
use std::marker::PhantomData;

use bytes::{Buf, BytesMut};
use tracing::{debug, trace};
use valueio_core::{Closer, Context, Reader, Result, StreamError, Writer};

use crate::codec::{CodecConfig, Decoder, Encoder};
use crate::error::CodecError;
use crate::json::JsonCodec;

/// Exposes a value reader as a byte source.
///
/// Each time the buffer runs dry one value is pulled and encoded; reads then
/// drain it, possibly over several calls, before the next value is pulled.
/// The wrapped reader's `EndOfStream` becomes end-of-file (`Ok(0)`); any other
/// failure becomes an `io::Error` carrying the underlying [`StreamError`].
pub struct EncodedBytes<T, R, E = JsonCodec> {
    inner: Option<R>,
    codec: E,
    buf: BytesMut,
    ctx: Context,
    _marker: PhantomData<fn() -> T>,
}

impl<T, R: Reader<T>> EncodedBytes<T, R> {
    /// Create a byte source using the default JSON strategy.
    pub fn new(inner: R) -> Self {
        Self::with_codec(inner, JsonCodec)
    }
}

impl<T, R: Reader<T>, E> EncodedBytes<T, R, E> {
    /// Create a byte source with an explicit encode strategy.
    pub fn with_codec(inner: R, codec: E) -> Self {
        Self {
            inner: Some(inner),
            codec,
            buf: BytesMut::new(),
            ctx: Context::background(),
            _marker: PhantomData,
        }
    }
}

impl<T, R, E> EncodedBytes<T, R, E> {
    /// Use `ctx` for every pull from the wrapped reader.
    pub fn with_context(mut self, ctx: Context) -> Self {
        self.ctx = ctx;
        self
    }

    /// Encoded bytes not yet handed out.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the source and return the value reader.
    pub fn into_inner(self) -> Option<R> {
        self.inner
    }
}

impl<T, R, E: Default> Default for EncodedBytes<T, R, E> {
    fn default() -> Self {
        Self {
            inner: None,
            codec: E::default(),
            buf: BytesMut::new(),
            ctx: Context::background(),
            _marker: PhantomData,
        }
    }
}

impl<T, R: Reader<T>, E: Encoder<T>> Read for EncodedBytes<T, R, E> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        loop {
            if !self.buf.is_empty() {
                let n = out.len().min(self.buf.len());
                out[..n].copy_from_slice(&self.buf[..n]);
                self.buf.advance(n);
                return Ok(n);
            }

            let Some(inner) = self.inner.as_mut() else {
                return Ok(0);
            };

            match inner.read(&self.ctx) {
                Ok(value) => {
                    self.codec.encode(&value, &mut self.buf)?;
                    trace!(bytes = self.buf.len(), "encoded value");
                }
                Err(StreamError::EndOfStream) => return Ok(0),
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Exposes a value writer as a byte sink.
///
/// Bytes accumulate until they form a complete value, which is forwarded to
/// the wrapped writer. Several values in one `write` are forwarded in order
/// and the first failure stops forwarding. Bytes that were consumed are
/// reported as written, so a writer failure is held back and returned by the
/// next `write`, `flush` or [`finish`](DecodingSink::finish) as an
/// `io::Error` carrying the underlying [`StreamError`]; bytes after the failed
/// value stay buffered. Call `finish` at end of input to decode a trailing
/// value that needs end-of-stream to complete.
pub struct DecodingSink<T, W, D = JsonCodec> {
    inner: Option<W>,
    codec: D,
    buf: BytesMut,
    config: CodecConfig,
    ctx: Context,
    deferred: Option<StreamError>,
    _marker: PhantomData<fn(T)>,
}

impl<T, W: Writer<T>> DecodingSink<T, W> {
    /// Create a byte sink using the default JSON strategy.
    pub fn new(inner: W) -> Self {
        Self::with_codec(inner, JsonCodec)
    }
}

impl<T, W: Writer<T>, D> DecodingSink<T, W, D> {
    /// Create a byte sink with an explicit decode strategy.
    pub fn with_codec(inner: W, codec: D) -> Self {
        Self::with_config(inner, codec, CodecConfig::default())
    }

    /// Create a byte sink with an explicit strategy and configuration.
    pub fn with_config(inner: W, codec: D, config: CodecConfig) -> Self {
        Self {
            inner: Some(inner),
            codec,
            buf: BytesMut::new(),
            config,
            ctx: Context::background(),
            deferred: None,
            _marker: PhantomData,
        }
    }
}

impl<T, W, D> DecodingSink<T, W, D> {
    /// Use `ctx` for every value forwarded to the wrapped writer.
    pub fn with_context(mut self, ctx: Context) -> Self {
        self.ctx = ctx;
        self
    }

    /// Bytes received but not yet decoded.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Borrow the wrapped value writer.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    /// Consume the sink and return the value writer. Buffered bytes are lost.
    pub fn into_inner(self) -> Option<W> {
        self.inner
    }
}

impl<T, W: Writer<T>, D: Decoder<T>> DecodingSink<T, W, D> {
    /// Decode and forward whatever the buffer still holds, treating the input
    /// as complete.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        let Some(inner) = self.inner.as_mut() else {
            return if self.buf.is_empty() {
                Ok(())
            } else {
                Err(StreamError::DestinationClosed)
            };
        };

        while let Some(value) = self.codec.decode_eof(&mut self.buf)? {
            inner.write(&self.ctx, value)?;
        }
        Ok(())
    }
}

impl<T, W, D: Default> Default for DecodingSink<T, W, D> {
    fn default() -> Self {
        Self {
            inner: None,
            codec: D::default(),
            buf: BytesMut::new(),
            config: CodecConfig::default(),
            ctx: Context::background(),
            deferred: None,
            _marker: PhantomData,
        }
    }
}

impl<T, W: Writer<T>, D: Decoder<T>> Write for DecodingSink<T, W, D> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if let Some(err) = self.deferred.take() {
            return Err(err.into());
        }
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::DestinationClosed.into());
        };

        self.buf.extend_from_slice(bytes);
        let mut forwarded = 0usize;
        loop {
            match self.codec.decode(&mut self.buf) {
                Ok(Some(value)) => {
                    trace!(buffered = self.buf.len(), "decoded value");
                    if let Err(err) = inner.write(&self.ctx, value) {
                        // The value is gone from the buffer, so these bytes
                        // were consumed: report them written, fail next call.
                        self.deferred = Some(err);
                        return Ok(bytes.len());
                    }
                    forwarded += 1;
                }
                Ok(None) => break,
                Err(err) => return self.discard(err, forwarded, bytes.len()),
            }
        }

        if self.buf.len() > self.config.max_payload_size {
            let err = CodecError::PayloadTooLarge {
                size: self.buf.len(),
                max: self.config.max_payload_size,
            };
            return self.discard(err.into(), forwarded, bytes.len());
        }

        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.deferred.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl<T, W, D> DecodingSink<T, W, D> {
    /// Drop the undecodable buffer. With nothing forwarded in this call the
    /// input is rejected outright; otherwise the failure waits for the next.
    fn discard(&mut self, err: StreamError, forwarded: usize, len: usize) -> io::Result<usize> {
        debug!(buffered = self.buf.len(), "discarding undecodable input");
        self.buf.clear();
        if forwarded == 0 {
            return Err(err.into());
        }
        self.deferred = Some(err);
        Ok(len)
    }
}

/// Closing finishes the input and releases the wrapped writer.
impl<T, W: Writer<T>, D: Decoder<T>> Closer for DecodingSink<T, W, D> {
    fn close(&mut self) -> Result<()> {
        let finished = self.finish();
        self.inner = None;
        self.buf.clear();
        finished
    }
}
