//! Byte-stream bridges for valueio.
//!
//! Connects typed [`Reader`](valueio_core::Reader) / [`Writer`](valueio_core::Writer)
//! capabilities to `std::io` byte streams through a pluggable strategy:
//!
//! - [`DecodeReader`]: bytes in, values out
//! - [`EncodeWriter`]: values in, bytes out
//! - [`EncodedBytes`]: a value reader viewed as `io::Read`
//! - [`DecodingSink`]: a value writer viewed as `io::Write`
//!
//! Strategies implement [`Encoder`] / [`Decoder`]. The default is
//! [`JsonCodec`] (newline-terminated JSON); [`LengthPrefixedJson`] frames each
//! value with a 4-byte little-endian length.

pub mod bridge;
pub mod codec;
pub mod error;
pub mod json;
pub mod reader;
pub mod writer;

pub use bytes::BytesMut;

pub use bridge::{DecodingSink, EncodedBytes};
pub use codec::{CodecConfig, Decoder, DecoderFn, Encoder, EncoderFn, DEFAULT_MAX_PAYLOAD};
pub use error::{as_codec_error, CodecError};
pub use json::{JsonCodec, LengthPrefixedJson, LENGTH_PREFIX_SIZE};
pub use reader::DecodeReader;
pub use writer::EncodeWriter;
