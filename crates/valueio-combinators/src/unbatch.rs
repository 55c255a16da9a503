use std::vec;

use valueio_core::{Context, Reader, Result, StreamError, Writer};

#[derive(Debug)]
enum State<T> {
    /// Nothing pending; the next read pulls a batch.
    Fresh,
    /// Elements of the last batch still to be handed out. Never empty.
    Draining(vec::IntoIter<T>),
    /// The wrapped reader ended or failed. Absorbing.
    Exhausted,
}

/// Flattens a reader of batches into a reader of their elements.
///
/// Every element of every batch is returned, in order, before the next batch
/// is pulled. An empty batch or a failure from the wrapped reader ends the
/// stream: that call returns the failure (`EndOfStream` for an empty batch)
/// and every later call returns `EndOfStream` without touching the wrapped
/// reader again.
#[derive(Debug)]
pub struct Unbatching<R, T> {
    inner: Option<R>,
    state: State<T>,
}

/// Wrap a reader of `Vec<T>` so each read yields one `T`. `None` yields a
/// reader that always ends.
pub fn unbatching<R, T>(reader: Option<R>) -> Unbatching<R, T> {
    Unbatching {
        inner: reader,
        state: State::Fresh,
    }
}

impl<R, T> Unbatching<R, T> {
    /// Elements of the current batch not yet returned.
    pub fn pending(&self) -> &[T] {
        match &self.state {
            State::Draining(rest) => rest.as_slice(),
            _ => &[],
        }
    }

    /// True once the wrapped reader has ended or failed.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }
}

impl<T, R: Reader<Vec<T>>> Reader<T> for Unbatching<R, T> {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        match &mut self.state {
            State::Draining(rest) => {
                if let Some(value) = rest.next() {
                    if rest.as_slice().is_empty() {
                        self.state = State::Fresh;
                    }
                    return Ok(value);
                }
                self.state = State::Fresh;
            }
            State::Exhausted => return Err(StreamError::EndOfStream),
            State::Fresh => {}
        }

        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::EndOfStream);
        };

        let mut rest = match inner.read(ctx) {
            Ok(batch) => batch.into_iter(),
            Err(err) => {
                self.state = State::Exhausted;
                return Err(err);
            }
        };

        match rest.next() {
            Some(value) => {
                if !rest.as_slice().is_empty() {
                    self.state = State::Draining(rest);
                }
                Ok(value)
            }
            None => {
                self.state = State::Exhausted;
                Err(StreamError::EndOfStream)
            }
        }
    }
}

/// Writes each element of a batch to the wrapped writer, in order.
#[derive(Debug)]
pub struct UnbatchingWriter<W> {
    inner: Option<W>,
}

/// Wrap a writer of `T` so it accepts `Vec<T>`. Writing stops at the first
/// failure, which is returned; later elements of that batch are not written.
/// `None` yields a writer that is always closed.
pub fn unbatching_writer<W>(writer: Option<W>) -> UnbatchingWriter<W> {
    UnbatchingWriter { inner: writer }
}

impl<W> UnbatchingWriter<W> {
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Option<W> {
        self.inner
    }
}

impl<T, W: Writer<T>> Writer<Vec<T>> for UnbatchingWriter<W> {
    fn write(&mut self, ctx: &Context, batch: Vec<T>) -> Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::DestinationClosed);
        };
        for value in batch {
            inner.write(ctx, value)?;
        }
        Ok(())
    }
}
