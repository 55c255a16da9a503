//! Typed value capabilities: read one `T`, write one `T`.
//!
//! This is the lowest layer of valueio. It defines:
//! - [`Reader`] / [`Writer`] / [`Closer`] and their groupings
//! - Closure-backed adapters ([`ReaderFn`], [`WriterFn`], ...)
//! - The [`Context`] threaded through every call
//! - [`StreamError`], whose `EndOfStream` and `DestinationClosed` variants are
//!   the only flow-control signals the rest of the workspace relies on
//!
//! Nothing here is synchronized. A reader or writer instance expects at most
//! one call in flight at a time.

pub mod context;
pub mod error;
pub mod func;
pub mod source;
pub mod traits;

pub use context::{Cancellation, Context};
pub use error::{Result, StreamError};
pub use func::{ReadCloserFn, ReadWriteCloserFn, ReadWriterFn, ReaderFn, WriteCloserFn, WriterFn};
pub use source::{copy, from_values, values, Values, ValuesReader};
pub use traits::{Closer, ReadCloser, ReadWriteCloser, ReadWriter, Reader, WriteCloser, Writer};
