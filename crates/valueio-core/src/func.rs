//! Closure-backed implementations of the capability traits.
//!
//! Each adapter stores optional closures and defers to them. An adapter with a
//! missing closure still behaves: reads fail with `EndOfStream`, writes fail
//! with `DestinationClosed`, closes succeed.

use std::fmt;

use crate::context::Context;
use crate::error::{Result, StreamError};
use crate::traits::{Closer, Reader, Writer};

fn read_with<T, F>(read: &mut Option<F>, ctx: &Context) -> Result<T>
where
    F: FnMut(&Context) -> Result<T>,
{
    match read {
        Some(read) => read(ctx),
        None => Err(StreamError::EndOfStream),
    }
}

fn write_with<T, F>(write: &mut Option<F>, ctx: &Context, value: T) -> Result<()>
where
    F: FnMut(&Context, T) -> Result<()>,
{
    match write {
        Some(write) => write(ctx, value),
        None => Err(StreamError::DestinationClosed),
    }
}

fn close_with<F>(close: &mut Option<F>) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    match close {
        Some(close) => close(),
        None => Ok(()),
    }
}

/// Implements [`Reader`] with a closure.
#[derive(Clone)]
pub struct ReaderFn<F> {
    pub read: Option<F>,
}

impl<F> ReaderFn<F> {
    pub fn new(read: F) -> Self {
        Self { read: Some(read) }
    }
}

impl<F> Default for ReaderFn<F> {
    fn default() -> Self {
        Self { read: None }
    }
}

impl<T, F: FnMut(&Context) -> Result<T>> Reader<T> for ReaderFn<F> {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        read_with(&mut self.read, ctx)
    }
}

impl<F> fmt::Debug for ReaderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderFn")
            .field("read", &self.read.is_some())
            .finish()
    }
}

/// Implements [`Writer`] with a closure.
#[derive(Clone)]
pub struct WriterFn<F> {
    pub write: Option<F>,
}

impl<F> WriterFn<F> {
    pub fn new(write: F) -> Self {
        Self { write: Some(write) }
    }
}

impl<F> Default for WriterFn<F> {
    fn default() -> Self {
        Self { write: None }
    }
}

impl<T, F: FnMut(&Context, T) -> Result<()>> Writer<T> for WriterFn<F> {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()> {
        write_with(&mut self.write, ctx, value)
    }
}

impl<F> fmt::Debug for WriterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterFn")
            .field("write", &self.write.is_some())
            .finish()
    }
}

/// Implements [`Reader`] and [`Closer`] with closures.
#[derive(Clone)]
pub struct ReadCloserFn<R, C> {
    pub read: Option<R>,
    pub close: Option<C>,
}

impl<R, C> ReadCloserFn<R, C> {
    pub fn new(read: R, close: C) -> Self {
        Self {
            read: Some(read),
            close: Some(close),
        }
    }
}

impl<R, C> Default for ReadCloserFn<R, C> {
    fn default() -> Self {
        Self {
            read: None,
            close: None,
        }
    }
}

impl<T, R: FnMut(&Context) -> Result<T>, C> Reader<T> for ReadCloserFn<R, C> {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        read_with(&mut self.read, ctx)
    }
}

impl<R, C: FnMut() -> Result<()>> Closer for ReadCloserFn<R, C> {
    fn close(&mut self) -> Result<()> {
        close_with(&mut self.close)
    }
}

/// Implements [`Writer`] and [`Closer`] with closures.
#[derive(Clone)]
pub struct WriteCloserFn<W, C> {
    pub write: Option<W>,
    pub close: Option<C>,
}

impl<W, C> WriteCloserFn<W, C> {
    pub fn new(write: W, close: C) -> Self {
        Self {
            write: Some(write),
            close: Some(close),
        }
    }
}

impl<W, C> Default for WriteCloserFn<W, C> {
    fn default() -> Self {
        Self {
            write: None,
            close: None,
        }
    }
}

impl<T, W: FnMut(&Context, T) -> Result<()>, C> Writer<T> for WriteCloserFn<W, C> {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()> {
        write_with(&mut self.write, ctx, value)
    }
}

impl<W, C: FnMut() -> Result<()>> Closer for WriteCloserFn<W, C> {
    fn close(&mut self) -> Result<()> {
        close_with(&mut self.close)
    }
}

/// Implements `Reader<T>` and `Writer<U>` with closures.
#[derive(Clone)]
pub struct ReadWriterFn<R, W> {
    pub read: Option<R>,
    pub write: Option<W>,
}

impl<R, W> ReadWriterFn<R, W> {
    pub fn new(read: R, write: W) -> Self {
        Self {
            read: Some(read),
            write: Some(write),
        }
    }
}

impl<R, W> Default for ReadWriterFn<R, W> {
    fn default() -> Self {
        Self {
            read: None,
            write: None,
        }
    }
}

impl<T, R: FnMut(&Context) -> Result<T>, W> Reader<T> for ReadWriterFn<R, W> {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        read_with(&mut self.read, ctx)
    }
}

impl<U, R, W: FnMut(&Context, U) -> Result<()>> Writer<U> for ReadWriterFn<R, W> {
    fn write(&mut self, ctx: &Context, value: U) -> Result<()> {
        write_with(&mut self.write, ctx, value)
    }
}

/// Implements `Reader<T>`, `Writer<U>` and [`Closer`] with closures.
#[derive(Clone)]
pub struct ReadWriteCloserFn<R, W, C> {
    pub read: Option<R>,
    pub write: Option<W>,
    pub close: Option<C>,
}

impl<R, W, C> ReadWriteCloserFn<R, W, C> {
    pub fn new(read: R, write: W, close: C) -> Self {
        Self {
            read: Some(read),
            write: Some(write),
            close: Some(close),
        }
    }
}

impl<R, W, C> Default for ReadWriteCloserFn<R, W, C> {
    fn default() -> Self {
        Self {
            read: None,
            write: None,
            close: None,
        }
    }
}

impl<T, R: FnMut(&Context) -> Result<T>, W, C> Reader<T> for ReadWriteCloserFn<R, W, C> {
    fn read(&mut self, ctx: &Context) -> Result<T> {
        read_with(&mut self.read, ctx)
    }
}

impl<U, R, W: FnMut(&Context, U) -> Result<()>, C> Writer<U> for ReadWriteCloserFn<R, W, C> {
    fn write(&mut self, ctx: &Context, value: U) -> Result<()> {
        write_with(&mut self.write, ctx, value)
    }
}

impl<R, W, C: FnMut() -> Result<()>> Closer for ReadWriteCloserFn<R, W, C> {
    fn close(&mut self) -> Result<()> {
        close_with(&mut self.close)
    }
}
