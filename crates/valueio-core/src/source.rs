use std::iter::Fuse;

use crate::context::Context;
use crate::error::{Result, StreamError};
use crate::traits::{Reader, Writer};

/// A reader yielding a fixed sequence of values, in order, exactly once.
#[derive(Debug, Clone)]
pub struct ValuesReader<I: Iterator> {
    values: Fuse<I>,
}

impl<I: Iterator> Reader<I::Item> for ValuesReader<I> {
    fn read(&mut self, _ctx: &Context) -> Result<I::Item> {
        self.values.next().ok_or(StreamError::EndOfStream)
    }
}

/// Build a reader that yields each value once, then `EndOfStream` forever.
pub fn from_values<V>(values: V) -> ValuesReader<V::IntoIter>
where
    V: IntoIterator,
{
    ValuesReader {
        values: values.into_iter().fuse(),
    }
}

/// Pump values from `reader` into `writer` until the reader ends.
///
/// Returns the number of values moved. `EndOfStream` from the reader ends the
/// copy successfully; every other failure, including `DestinationClosed` from
/// the writer, is returned as-is.
pub fn copy<T, R, W>(ctx: &Context, reader: &mut R, writer: &mut W) -> Result<u64>
where
    R: Reader<T> + ?Sized,
    W: Writer<T> + ?Sized,
{
    let mut copied = 0u64;
    loop {
        let value = match reader.read(ctx) {
            Ok(value) => value,
            Err(StreamError::EndOfStream) => return Ok(copied),
            Err(err) => return Err(err),
        };
        writer.write(ctx, value)?;
        copied += 1;
    }
}

/// Iterator over a reader's values. Stops at `EndOfStream` and after the first
/// failure, which is yielded once.
pub struct Values<'a, R, T> {
    reader: R,
    ctx: &'a Context,
    done: bool,
    _marker: std::marker::PhantomData<fn() -> T>,
}

/// Iterate `reader` with `ctx` until it ends.
pub fn values<T, R: Reader<T>>(reader: R, ctx: &Context) -> Values<'_, R, T> {
    Values {
        reader,
        ctx,
        done: false,
        _marker: std::marker::PhantomData,
    }
}

impl<T, R: Reader<T>> Iterator for Values<'_, R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read(self.ctx) {
            Ok(value) => Some(Ok(value)),
            Err(StreamError::EndOfStream) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
