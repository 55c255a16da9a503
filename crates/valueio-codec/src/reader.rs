use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::{debug, trace};
use valueio_core::{Closer, Context, Reader, Result, StreamError};

use crate::codec::{CodecConfig, Decoder};
use crate::error::CodecError;
use crate::json::JsonCodec;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads values decoded from any `Read` byte source.
///
/// Handles partial reads internally: each call decodes exactly one value,
/// pulling more bytes only when the buffer does not hold a complete one.
/// Once the byte source is exhausted and the buffer is drained, every read
/// fails with `EndOfStream`.
///
/// The default value has no byte source and always fails with `EndOfStream`.
pub struct DecodeReader<R, D = JsonCodec> {
    inner: Option<R>,
    codec: D,
    buf: BytesMut,
    config: CodecConfig,
    source_done: bool,
}

impl<R: Read> DecodeReader<R> {
    /// Create a reader using the default JSON strategy.
    pub fn new(inner: R) -> Self {
        Self::with_codec(inner, JsonCodec)
    }
}

impl<R: Read, D> DecodeReader<R, D> {
    /// Create a reader with an explicit decode strategy.
    pub fn with_codec(inner: R, codec: D) -> Self {
        Self::with_config(inner, codec, CodecConfig::default())
    }

    /// Create a reader with an explicit strategy and configuration.
    pub fn with_config(inner: R, codec: D, config: CodecConfig) -> Self {
        Self {
            inner: Some(inner),
            codec,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            source_done: false,
        }
    }
}

impl<R, D> DecodeReader<R, D> {
    /// Borrow the underlying byte source.
    pub fn get_ref(&self) -> Option<&R> {
        self.inner.as_ref()
    }

    /// Mutably borrow the underlying byte source.
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.inner.as_mut()
    }

    /// Consume the reader and return the byte source. Buffered bytes are lost.
    pub fn into_inner(self) -> Option<R> {
        self.inner
    }

    /// Bytes read from the source but not yet decoded.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Current reader configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl<R, D: Default> Default for DecodeReader<R, D> {
    fn default() -> Self {
        Self {
            inner: None,
            codec: D::default(),
            buf: BytesMut::new(),
            config: CodecConfig::default(),
            source_done: true,
        }
    }
}

impl<T, R: Read, D: Decoder<T>> Reader<T> for DecodeReader<R, D> {
    fn read(&mut self, _ctx: &Context) -> Result<T> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::EndOfStream);
        };

        loop {
            let before = self.buf.len();
            if let Some(value) = self.codec.decode(&mut self.buf)? {
                trace!(consumed = before - self.buf.len(), "decoded value");
                return Ok(value);
            }

            if self.source_done {
                return match self.codec.decode_eof(&mut self.buf) {
                    Ok(Some(value)) => Ok(value),
                    Ok(None) => Err(StreamError::EndOfStream),
                    Err(err) => {
                        debug!(buffered = self.buf.len(), "discarding undecodable suffix");
                        self.buf.clear();
                        Err(err)
                    }
                };
            }

            if self.buf.len() > self.config.max_payload_size {
                return Err(CodecError::PayloadTooLarge {
                    size: self.buf.len(),
                    max: self.config.max_payload_size,
                }
                .into());
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(StreamError::from_io(err)),
            };

            if read == 0 {
                self.source_done = true;
                continue;
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }
}

/// Closing drops the byte source; later reads end the stream.
impl<R, D> Closer for DecodeReader<R, D> {
    fn close(&mut self) -> Result<()> {
        self.inner = None;
        self.buf.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::Encoder;
    use crate::error::as_codec_error;
    use crate::json::LengthPrefixedJson;

    fn json_lines(values: &[&str]) -> Vec<u8> {
        let mut wire = BytesMut::new();
        for value in values {
            JsonCodec.encode(*value, &mut wire).unwrap();
        }
        wire.to_vec()
    }

    #[test]
    fn reads_values_then_ends() {
        let ctx = Context::background();
        let mut reader = DecodeReader::new(Cursor::new(json_lines(&["test1", "test2"])));

        let first: String = reader.read(&ctx).unwrap();
        let second: String = reader.read(&ctx).unwrap();
        let end: Result<String> = reader.read(&ctx);

        assert_eq!(first, "test1");
        assert_eq!(second, "test2");
        assert!(end.unwrap_err().is_end_of_stream());
    }

    #[test]
    fn end_of_stream_repeats() {
        let ctx = Context::background();
        let mut reader = DecodeReader::new(Cursor::new(Vec::<u8>::new()));

        for _ in 0..3 {
            let end: Result<i32> = reader.read(&ctx);
            assert!(end.unwrap_err().is_end_of_stream());
        }
    }

    #[test]
    fn absent_source_is_empty_reader() {
        let mut reader = DecodeReader::<Cursor<Vec<u8>>>::default();
        let end: Result<String> = reader.read(&Context::background());
        assert!(end.unwrap_err().is_end_of_stream());
    }

    #[test]
    fn partial_read_handling() {
        let reader = ByteByByteReader {
            bytes: json_lines(&["slow", "bytes"]),
            pos: 0,
        };
        let ctx = Context::background();
        let mut reader = DecodeReader::new(reader);

        let first: String = reader.read(&ctx).unwrap();
        let second: String = reader.read(&ctx).unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("slow", "bytes"));
    }

    #[test]
    fn explicit_strategy_is_used() {
        let mut wire = BytesMut::new();
        let mut codec = LengthPrefixedJson::default();
        codec.encode(&vec![1, 2], &mut wire).unwrap();
        codec.encode(&vec![3], &mut wire).unwrap();

        let ctx = Context::background();
        let mut reader = DecodeReader::with_codec(Cursor::new(wire.to_vec()), codec);

        let first: Vec<i32> = reader.read(&ctx).unwrap();
        let second: Vec<i32> = reader.read(&ctx).unwrap();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![3]);
    }

    #[test]
    fn truncated_value_fails_then_ends() {
        let ctx = Context::background();
        let mut reader = DecodeReader::new(Cursor::new(b"\"a\"\n[1, 2".to_vec()));

        let first: String = reader.read(&ctx).unwrap();
        assert_eq!(first, "a");

        let err = <DecodeReader<_> as Reader<Vec<i32>>>::read(&mut reader, &ctx).unwrap_err();
        assert!(matches!(
            as_codec_error(&err),
            Some(CodecError::Incomplete { .. })
        ));

        let end: Result<Vec<i32>> = reader.read(&ctx);
        assert!(end.unwrap_err().is_end_of_stream());
    }

    #[test]
    fn decode_failure_surfaces_verbatim() {
        let ctx = Context::background();
        let mut reader = DecodeReader::new(Cursor::new(b"not-json\n".to_vec()));

        let err = <DecodeReader<_> as Reader<String>>::read(&mut reader, &ctx).unwrap_err();
        assert!(matches!(as_codec_error(&err), Some(CodecError::Json(_))));
    }

    #[test]
    fn oversized_buffer_rejected() {
        let cfg = CodecConfig {
            max_payload_size: 16,
        };
        let mut wire = b"\"".to_vec();
        wire.extend(std::iter::repeat(b'x').take(64));

        let ctx = Context::background();
        let mut reader = DecodeReader::with_config(Cursor::new(wire), JsonCodec, cfg);
        let err = <DecodeReader<_> as Reader<String>>::read(&mut reader, &ctx).unwrap_err();
        assert!(matches!(
            as_codec_error(&err),
            Some(CodecError::PayloadTooLarge { max: 16, .. })
        ));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            state: 0,
            bytes: json_lines(&["ok"]),
            pos: 0,
        };
        let ctx = Context::background();
        let mut reader = DecodeReader::new(reader);

        let value: String = reader.read(&ctx).unwrap();
        assert_eq!(value, "ok");
    }

    #[test]
    fn other_io_errors_propagate() {
        let ctx = Context::background();
        let mut reader = DecodeReader::new(FailingReader);

        let err = <DecodeReader<_> as Reader<String>>::read(&mut reader, &ctx).unwrap_err();
        assert!(matches!(err, StreamError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn close_ends_the_stream() {
        let ctx = Context::background();
        let mut reader = DecodeReader::new(Cursor::new(json_lines(&["a", "b"])));

        let first: String = reader.read(&ctx).unwrap();
        assert_eq!(first, "a");

        reader.close().unwrap();
        assert!(reader.get_ref().is_none());
        let end: Result<String> = reader.read(&ctx);
        assert!(end.unwrap_err().is_end_of_stream());
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = DecodeReader::new(Cursor::new(Vec::<u8>::new()));

        assert!(reader.get_ref().is_some());
        assert!(reader.get_mut().is_some());
        assert!(reader.buffered().is_empty());
        assert_eq!(reader.config().max_payload_size, crate::DEFAULT_MAX_PAYLOAD);
        assert!(reader.into_inner().is_some());
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }
    }
}
