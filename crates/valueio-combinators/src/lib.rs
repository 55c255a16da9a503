//! Combinators over valueio readers and writers.
//!
//! Each combinator wraps one capability and returns another of the same
//! shape:
//!
//! | reader side | writer side | effect |
//! |---|---|---|
//! | [`batching`] | [`batching_writer`] | group values into `Vec`s of up to `size` |
//! | [`unbatching`] | [`unbatching_writer`] | flatten `Vec`s back into values |
//! | [`filter`] | [`filter_writer`] | drop values failing a predicate |
//! | [`map`] | [`map_writer`] | transform each value |
//!
//! The free functions take every input as an `Option`; a missing reader
//! always ends, a missing writer is always closed. [`ReaderExt`] and
//! [`WriterExt`] offer the same combinators as methods.
//!
//! Combinators never retry, log or swallow a failure from the wrapped
//! capability. Batching readers defer a mid-batch failure by exactly one call.
//! Nothing here checks the [`Context`](valueio_core::Context); it is passed
//! through untouched.

pub mod batch;
pub mod ext;
pub mod filter;
pub mod map;
pub mod unbatch;

pub use batch::{batching, batching_writer, Batching, BatchingWriter, DEFAULT_BATCH_SIZE};
pub use ext::{ReaderExt, WriterExt};
pub use filter::{filter, filter_writer, Filter, FilterWriter};
pub use map::{map, map_writer, Map, MapWriter};
pub use unbatch::{unbatching, unbatching_writer, Unbatching, UnbatchingWriter};
