use crate::context::Context;
use crate::error::{Result, StreamError};

/// Reads one `T` at a time. The typed counterpart of `std::io::Read`.
///
/// Returns `Err(StreamError::EndOfStream)` once no more values are available.
pub trait Reader<T> {
    fn read(&mut self, ctx: &Context) -> Result<T>;
}

/// Writes one `T` at a time. The typed counterpart of `std::io::Write`.
///
/// Returns `Err(StreamError::DestinationClosed)` once no more values are
/// accepted.
pub trait Writer<T> {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()>;
}

/// Releases whatever a reader or writer holds.
pub trait Closer {
    fn close(&mut self) -> Result<()>;
}

/// Groups [`Reader`] with [`Closer`].
pub trait ReadCloser<T>: Reader<T> + Closer {}

impl<T, X: Reader<T> + Closer + ?Sized> ReadCloser<T> for X {}

/// Groups [`Writer`] with [`Closer`].
pub trait WriteCloser<T>: Writer<T> + Closer {}

impl<T, X: Writer<T> + Closer + ?Sized> WriteCloser<T> for X {}

/// Groups `Reader<T>` and `Writer<U>`.
pub trait ReadWriter<T, U>: Reader<T> + Writer<U> {}

impl<T, U, X: Reader<T> + Writer<U> + ?Sized> ReadWriter<T, U> for X {}

/// Groups `Reader<T>` and `Writer<U>` with [`Closer`].
pub trait ReadWriteCloser<T, U>: Reader<T> + Writer<U> + Closer {}

impl<T, U, X: Reader<T> + Writer<U> + Closer + ?Sized> ReadWriteCloser<T, U> for X {}

impl<T, R: Reader<T> + ?Sized> Reader<T> for &mut R {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        (**self).read(ctx)
    }
}

impl<T, R: Reader<T> + ?Sized> Reader<T> for Box<R> {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        (**self).read(ctx)
    }
}

/// An absent reader: `None` always fails with `EndOfStream`.
impl<T, R: Reader<T>> Reader<T> for Option<R> {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        match self {
            Some(inner) => inner.read(ctx),
            None => Err(StreamError::EndOfStream),
        }
    }
}

impl<T, W: Writer<T> + ?Sized> Writer<T> for &mut W {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()> {
        (**self).write(ctx, value)
    }
}

impl<T, W: Writer<T> + ?Sized> Writer<T> for Box<W> {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()> {
        (**self).write(ctx, value)
    }
}

/// An absent writer: `None` always fails with `DestinationClosed`.
impl<T, W: Writer<T>> Writer<T> for Option<W> {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()> {
        match self {
            Some(inner) => inner.write(ctx, value),
            None => Err(StreamError::DestinationClosed),
        }
    }
}

/// Appends every written value. Never closes.
impl<T> Writer<T> for Vec<T> {
    fn write(&mut self, _ctx: &Context, value: T) -> Result<()> {
        self.push(value);
        Ok(())
    }
}

impl<C: Closer + ?Sized> Closer for &mut C {
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<C: Closer + ?Sized> Closer for Box<C> {
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Closing an absent capability is a no-op.
impl<C: Closer> Closer for Option<C> {
    fn close(&mut self) -> Result<()> {
        match self {
            Some(inner) => inner.close(),
            None => Ok(()),
        }
    }
}
