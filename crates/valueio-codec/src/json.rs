use bytes::{Buf, BufMut, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use valueio_core::Result;

use crate::codec::{Decoder, Encoder, DEFAULT_MAX_PAYLOAD};
use crate::error::CodecError;

/// Length prefix: 4-byte little-endian payload size.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// The default strategy: one JSON document per value, newline terminated.
///
/// Decoding tolerates values split across reads and any whitespace between
/// values, so it also reads concatenated or pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T: Serialize + ?Sized> Encoder<T> for JsonCodec {
    fn encode(&mut self, item: &T, dst: &mut BytesMut) -> Result<()> {
        let encoded = serde_json::to_vec(item).map_err(CodecError::from)?;
        dst.reserve(encoded.len() + 1);
        dst.put_slice(&encoded);
        dst.put_u8(b'\n');
        Ok(())
    }
}

impl<T: DeserializeOwned> Decoder<T> for JsonCodec {
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        decode_json(src, false)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        decode_json(src, true)
    }
}

fn decode_json<T: DeserializeOwned>(src: &mut BytesMut, at_eof: bool) -> Result<Option<T>> {
    let leading = src.iter().take_while(|b| b.is_ascii_whitespace()).count();
    src.advance(leading);
    if src.is_empty() {
        return Ok(None);
    }

    let (item, consumed) = {
        let mut stream = serde_json::Deserializer::from_slice(&src[..]).into_iter::<T>();
        let item = stream.next();
        (item, stream.byte_offset())
    };

    match item {
        Some(Ok(value)) => {
            // A number touching the end of the buffer may still be growing.
            if !at_eof && consumed == src.len() && src[consumed - 1].is_ascii_digit() {
                return Ok(None);
            }
            src.advance(consumed);
            Ok(Some(value))
        }
        Some(Err(err)) if err.is_eof() => {
            if at_eof {
                Err(CodecError::Incomplete {
                    buffered: src.len(),
                }
                .into())
            } else {
                Ok(None)
            }
        }
        Some(Err(err)) => Err(CodecError::Json(err).into()),
        None => Ok(None),
    }
}

/// Length-prefixed JSON: a 4-byte little-endian size, then the JSON payload.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────────┐
/// │ Length (4B)  │ JSON payload     │
/// │ LE u32       │ (Length bytes)   │
/// └──────────────┴──────────────────┘
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LengthPrefixedJson {
    max_payload_size: usize,
}

impl LengthPrefixedJson {
    pub fn new(max_payload_size: usize) -> Self {
        Self { max_payload_size }
    }

    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}

impl Default for LengthPrefixedJson {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD)
    }
}

impl<T: Serialize + ?Sized> Encoder<T> for LengthPrefixedJson {
    fn encode(&mut self, item: &T, dst: &mut BytesMut) -> Result<()> {
        let payload = serde_json::to_vec(item).map_err(CodecError::from)?;
        let max = self.max_payload_size.min(u32::MAX as usize);
        if payload.len() > max {
            return Err(CodecError::PayloadTooLarge {
                size: payload.len(),
                max,
            }
            .into());
        }

        dst.reserve(LENGTH_PREFIX_SIZE + payload.len());
        dst.put_u32_le(payload.len() as u32);
        dst.put_slice(&payload);
        Ok(())
    }
}

impl<T: DeserializeOwned> Decoder<T> for LengthPrefixedJson {
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        if src.len() < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }

        let payload_len = u32::from_le_bytes([src[0], src[1], src[2], src[3]]) as usize;
        if payload_len > self.max_payload_size {
            return Err(CodecError::PayloadTooLarge {
                size: payload_len,
                max: self.max_payload_size,
            }
            .into());
        }

        if src.len() < LENGTH_PREFIX_SIZE + payload_len {
            return Ok(None);
        }

        src.advance(LENGTH_PREFIX_SIZE);
        let payload = src.split_to(payload_len);
        let value = serde_json::from_slice(&payload).map_err(CodecError::from)?;
        Ok(Some(value))
    }
}
