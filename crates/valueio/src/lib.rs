//! Typed value readers and writers.
//!
//! valueio extends the byte-oriented `Read`/`Write` idea to arbitrary values:
//! a [`Reader<T>`](capability::Reader) produces one `T` per call, a
//! [`Writer<T>`](capability::Writer) accepts one. Two sentinel errors,
//! `EndOfStream` and `DestinationClosed`, carry all flow control.
//!
//! # Crate Structure
//!
//! - [`capability`] — Reader/Writer/Closer traits, closure adapters, context
//! - [`codec`] — Encode/decode strategies and byte-stream bridges
//! - [`combinators`] — Batching, unbatching, filtering and mapping
//!
//! ```
//! use valueio::prelude::*;
//!
//! let ctx = Context::background();
//! let mut reader = from_values(1..=5).filter(|v: &i32| v % 2 == 1).batching(2);
//!
//! let first: Vec<i32> = reader.read(&ctx).unwrap();
//! assert_eq!(first, vec![1, 3]);
//! ```

/// Re-export capability types.
pub mod capability {
    pub use valueio_core::*;
}

/// Re-export codec types.
pub mod codec {
    pub use valueio_codec::*;
}

/// Re-export combinator types.
pub mod combinators {
    pub use valueio_combinators::*;
}

/// The traits and constructors most programs need.
pub mod prelude {
    pub use valueio_codec::{DecodeReader, DecodingSink, EncodeWriter, EncodedBytes};
    pub use valueio_combinators::{ReaderExt, WriterExt};
    pub use valueio_core::{copy, from_values, Closer, Context, Reader, StreamError, Writer};
}
