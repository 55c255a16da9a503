use std::fmt;

use bytes::BytesMut;
use valueio_core::{Result, StreamError};

use crate::error::CodecError;

/// Default maximum size of a single encoded value: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Turns one value into bytes appended to `dst`.
pub trait Encoder<T: ?Sized> {
    fn encode(&mut self, item: &T, dst: &mut BytesMut) -> Result<()>;
}

/// Turns bytes from `src` into one value.
///
/// `decode` returns `Ok(None)` while `src` does not yet hold a complete value,
/// and consumes exactly the bytes of the value it returns.
pub trait Decoder<T> {
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<T>>;

    /// Called once the byte source is exhausted.
    ///
    /// The default treats leftover bytes that do not form a value as
    /// [`CodecError::Incomplete`].
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        match self.decode(src)? {
            Some(item) => Ok(Some(item)),
            None if src.is_empty() => Ok(None),
            None => Err(CodecError::Incomplete {
                buffered: src.len(),
            }
            .into()),
        }
    }
}

impl<T: ?Sized, E: Encoder<T> + ?Sized> Encoder<T> for &mut E {
    fn encode(&mut self, item: &T, dst: &mut BytesMut) -> Result<()> {
        (**self).encode(item, dst)
    }
}

impl<T, D: Decoder<T> + ?Sized> Decoder<T> for &mut D {
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        (**self).decode(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        (**self).decode_eof(src)
    }
}

/// Implements [`Encoder`] with a closure. Without one, every encode fails
/// with `DestinationClosed`.
#[derive(Clone)]
pub struct EncoderFn<F> {
    pub encode: Option<F>,
}

impl<F> EncoderFn<F> {
    pub fn new(encode: F) -> Self {
        Self {
            encode: Some(encode),
        }
    }
}

impl<F> Default for EncoderFn<F> {
    fn default() -> Self {
        Self { encode: None }
    }
}

impl<T: ?Sized, F: FnMut(&T, &mut BytesMut) -> Result<()>> Encoder<T> for EncoderFn<F> {
    fn encode(&mut self, item: &T, dst: &mut BytesMut) -> Result<()> {
        match &mut self.encode {
            Some(encode) => encode(item, dst),
            None => Err(StreamError::DestinationClosed),
        }
    }
}

impl<F> fmt::Debug for EncoderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderFn")
            .field("encode", &self.encode.is_some())
            .finish()
    }
}

/// Implements [`Decoder`] with a closure. Without one, every decode fails
/// with `EndOfStream`.
#[derive(Clone)]
pub struct DecoderFn<F> {
    pub decode: Option<F>,
}

impl<F> DecoderFn<F> {
    pub fn new(decode: F) -> Self {
        Self {
            decode: Some(decode),
        }
    }
}

impl<F> Default for DecoderFn<F> {
    fn default() -> Self {
        Self { decode: None }
    }
}

impl<T, F: FnMut(&mut BytesMut) -> Result<Option<T>>> Decoder<T> for DecoderFn<F> {
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        match &mut self.decode {
            Some(decode) => decode(src),
            None => Err(StreamError::EndOfStream),
        }
    }
}

impl<F> fmt::Debug for DecoderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderFn")
            .field("decode", &self.decode.is_some())
            .finish()
    }
}

/// Configuration shared by the byte bridges.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Maximum bytes buffered while waiting for one value. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
