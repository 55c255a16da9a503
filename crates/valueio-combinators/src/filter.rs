use std::fmt;

use valueio_core::{Context, Reader, Result, StreamError, Writer};

/// Skips values that do not satisfy a predicate.
///
/// Without a predicate every value passes through unchanged.
pub struct Filter<R, F> {
    inner: Option<R>,
    predicate: Option<F>,
}

/// Wrap `reader` so reads return only values for which `predicate` holds.
///
/// A read keeps pulling until a value matches or the wrapped reader fails;
/// the failure is returned as-is. `None` for the reader yields a reader that
/// always ends; `None` for the predicate passes every value through.
pub fn filter<R, F>(reader: Option<R>, predicate: Option<F>) -> Filter<R, F> {
    Filter {
        inner: reader,
        predicate,
    }
}

impl<R, F> Filter<R, F> {
    pub fn get_ref(&self) -> Option<&R> {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Option<R> {
        self.inner
    }
}

impl<R: fmt::Debug, F> fmt::Debug for Filter<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("inner", &self.inner)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl<T, R: Reader<T>, F: FnMut(&T) -> bool> Reader<T> for Filter<R, F> {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::EndOfStream);
        };
        let Some(predicate) = self.predicate.as_mut() else {
            return inner.read(ctx);
        };

        loop {
            let value = inner.read(ctx)?;
            if predicate(&value) {
                return Ok(value);
            }
        }
    }
}

/// Silently drops values that do not satisfy a predicate.
pub struct FilterWriter<W, F> {
    inner: Option<W>,
    predicate: Option<F>,
}

/// Wrap `writer` so only values for which `predicate` holds are forwarded.
/// Dropped values still succeed. `None` for the writer yields a writer that
/// is always closed; `None` for the predicate forwards every value.
pub fn filter_writer<W, F>(writer: Option<W>, predicate: Option<F>) -> FilterWriter<W, F> {
    FilterWriter {
        inner: writer,
        predicate,
    }
}

impl<W, F> FilterWriter<W, F> {
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Option<W> {
        self.inner
    }
}

impl<W: fmt::Debug, F> fmt::Debug for FilterWriter<W, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterWriter")
            .field("inner", &self.inner)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl<T, W: Writer<T>, F: FnMut(&T) -> bool> Writer<T> for FilterWriter<W, F> {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(StreamError::DestinationClosed);
        };
        if let Some(predicate) = self.predicate.as_mut() {
            if !predicate(&value) {
                return Ok(());
            }
        }
        inner.write(ctx, value)
    }
}
