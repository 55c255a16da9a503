use std::fmt;
use std::marker::PhantomData;

use valueio_core::{Context, Reader, Result, StreamError, Writer};

/// Transforms each value pulled from a reader.
pub struct Map<R, F, T> {
    inner: Option<R>,
    f: Option<F>,
    _marker: PhantomData<fn() -> T>,
}

/// Wrap a reader of `T` so each read returns `f(value)`.
///
/// Failures from the wrapped reader are returned without calling `f`. If
/// either the reader or `f` is `None` the result is a reader that always
/// ends and never calls `f`.
pub fn map<R, F, T>(reader: Option<R>, f: Option<F>) -> Map<R, F, T> {
    Map {
        inner: reader,
        f,
        _marker: PhantomData,
    }
}

impl<R, F, T> Map<R, F, T> {
    pub fn get_ref(&self) -> Option<&R> {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Option<R> {
        self.inner
    }
}

impl<R: fmt::Debug, F, T> fmt::Debug for Map<R, F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("inner", &self.inner)
            .field("f", &self.f.is_some())
            .finish()
    }
}

impl<T, U, R: Reader<T>, F: FnMut(T) -> U> Reader<U> for Map<R, F, T> {
    fn read(&mut self, ctx: &Context) -> Result<U> {
        let (Some(inner), Some(f)) = (self.inner.as_mut(), self.f.as_mut()) else {
            return Err(StreamError::EndOfStream);
        };
        inner.read(ctx).map(f)
    }
}

/// Transforms each value before forwarding it to a writer.
pub struct MapWriter<W, F> {
    inner: Option<W>,
    f: Option<F>,
}

/// Wrap a writer of `U` so it accepts `T`, forwarding `f(value)`. If either
/// the writer or `f` is `None` the result is a writer that is always closed.
pub fn map_writer<W, F>(writer: Option<W>, f: Option<F>) -> MapWriter<W, F> {
    MapWriter { inner: writer, f }
}

impl<W, F> MapWriter<W, F> {
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Option<W> {
        self.inner
    }
}

impl<W: fmt::Debug, F> fmt::Debug for MapWriter<W, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapWriter")
            .field("inner", &self.inner)
            .field("f", &self.f.is_some())
            .finish()
    }
}

impl<T, U, W: Writer<U>, F: FnMut(T) -> U> Writer<T> for MapWriter<W, F> {
    fn write(&mut self, ctx: &Context, value: T) -> Result<()> {
        let (Some(inner), Some(f)) = (self.inner.as_mut(), self.f.as_mut()) else {
            return Err(StreamError::DestinationClosed);
        };
        inner.write(ctx, f(value))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use valueio_core::{from_values, ReaderFn};

    type Negate = fn(i32) -> i32;

    #[test]
    fn maps_each_value() {
        let ctx = Context::background();
        let mut reader = map(Some(from_values([1, 2])), Some(|v: i32| -v));

        assert_eq!(reader.read(&ctx).unwrap(), -1);
        assert_eq!(reader.read(&ctx).unwrap(), -2);
        assert!(reader.read(&ctx).unwrap_err().is_end_of_stream());
    }

    #[test]
    fn changes_value_type() {
        let ctx = Context::background();
        let mut reader = map(Some(from_values(["a", "bcd"])), Some(str::len));

        assert_eq!(reader.read(&ctx).unwrap(), 1);
        assert_eq!(reader.read(&ctx).unwrap(), 3);
    }

    #[test]
    fn failure_never_reaches_mapper() {
        let ctx = Context::background();
        let calls = Cell::new(0);
        let source =
            ReaderFn::new(|_: &Context| -> Result<i32> { Err(StreamError::EndOfStream) });
        let mut reader = map(
            Some(source),
            Some(|v: i32| {
                calls.set(calls.get() + 1);
                -v
            }),
        );

        assert!(reader.read(&ctx).unwrap_err().is_end_of_stream());
        assert!(reader.read(&ctx).unwrap_err().is_end_of_stream());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn absent_mapper_ends_without_pulling() {
        let ctx = Context::background();
        let pulls = Cell::new(0);
        let source = ReaderFn::new(|_: &Context| -> Result<i32> {
            pulls.set(pulls.get() + 1);
            Ok(1)
        });
        let mut reader = map::<_, Negate, i32>(Some(source), None);

        assert!(reader.read(&ctx).unwrap_err().is_end_of_stream());
        assert_eq!(pulls.get(), 0);
    }

    #[test]
    fn absent_reader_ends() {
        let ctx = Context::background();
        let mut reader =
            map::<ReaderFn<fn(&Context) -> Result<i32>>, _, i32>(None, Some(|v: i32| -v));

        assert!(reader.read(&ctx).unwrap_err().is_end_of_stream());
    }

    #[test]
    fn writer_maps_before_forwarding() {
        let ctx = Context::background();
        let mut writer = map_writer(Some(Vec::new()), Some(|v: i32| v + 1));

        for v in 1..=3 {
            writer.write(&ctx, v).unwrap();
        }

        assert_eq!(writer.into_inner().unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn writer_absent_mapper_is_closed() {
        let mut writer = map_writer::<_, Negate>(Some(Vec::<i32>::new()), None);

        let err = writer.write(&Context::background(), 1).unwrap_err();
        assert!(err.is_destination_closed());
        assert!(writer.get_ref().unwrap().is_empty());
    }

    #[test]
    fn debug_reports_mapper_presence() {
        let writer = map_writer::<_, Negate>(Some(Vec::<i32>::new()), None);
        assert_eq!(format!("{writer:?}"), "MapWriter { inner: Some([]), f: false }");

        let reader = map::<_, _, i32>(Some(from_values([1])), Some(|v: i32| -v));
        assert!(format!("{reader:?}").ends_with("f: true }"));
    }

    #[test]
    fn writer_absent_writer_is_closed() {
        let mut writer = map_writer::<Vec<i32>, _>(None, Some(|v: i32| v + 1));
        let err = writer.write(&Context::background(), 1).unwrap_err();
        assert!(err.is_destination_closed());
    }
}
