use std::io::{Read, Write};

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::Serialize;
use valueio::capability::Result;
use valueio::codec::{
    BytesMut, DecodeReader, Decoder, EncodeWriter, Encoder, JsonCodec, LengthPrefixedJson,
};

/// How values are laid out on stdin/stdout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Framing {
    /// Whitespace-separated JSON documents, one per line on output.
    #[default]
    Json,
    /// 4-byte little-endian length followed by a JSON payload.
    LengthPrefixed,
}

impl Framing {
    pub fn codec(self) -> FramingCodec {
        match self {
            Framing::Json => FramingCodec::Json(JsonCodec),
            Framing::LengthPrefixed => FramingCodec::LengthPrefixed(LengthPrefixedJson::default()),
        }
    }
}

/// Dispatches to the strategy selected on the command line.
#[derive(Copy, Clone, Debug)]
pub enum FramingCodec {
    Json(JsonCodec),
    LengthPrefixed(LengthPrefixedJson),
}

impl<T: Serialize> Encoder<T> for FramingCodec {
    fn encode(&mut self, item: &T, dst: &mut BytesMut) -> Result<()> {
        match self {
            FramingCodec::Json(codec) => codec.encode(item, dst),
            FramingCodec::LengthPrefixed(codec) => codec.encode(item, dst),
        }
    }
}

impl<T: DeserializeOwned> Decoder<T> for FramingCodec {
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        match self {
            FramingCodec::Json(codec) => codec.decode(src),
            FramingCodec::LengthPrefixed(codec) => codec.decode(src),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<T>> {
        match self {
            FramingCodec::Json(codec) => codec.decode_eof(src),
            FramingCodec::LengthPrefixed(codec) => codec.decode_eof(src),
        }
    }
}

/// Input and output framing for one invocation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Framings {
    pub input: Framing,
    pub output: Framing,
}

impl Framings {
    pub fn reader<R: Read>(&self, src: R) -> DecodeReader<R, FramingCodec> {
        DecodeReader::with_codec(src, self.input.codec())
    }

    /// Values are not flushed one by one; callers flush once at the end.
    pub fn writer<W: Write>(&self, dst: W) -> EncodeWriter<W, FramingCodec> {
        EncodeWriter::with_codec(dst, self.output.codec()).with_flush_each(false)
    }
}
