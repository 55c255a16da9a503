use valueio_core::{values, Context, Reader, Values, Writer};

use crate::batch::{batching, batching_writer, Batching, BatchingWriter};
use crate::filter::{filter, filter_writer, Filter, FilterWriter};
use crate::map::{map, map_writer, Map, MapWriter};
use crate::unbatch::{unbatching, unbatching_writer, Unbatching, UnbatchingWriter};

/// Combinator methods for any [`Reader`].
///
/// Method forms of the free functions for the common case where every input
/// is present.
pub trait ReaderExt<T>: Reader<T> + Sized {
    /// See [`batching`].
    fn batching(self, size: usize) -> Batching<Self> {
        batching(Some(self), size)
    }

    /// See [`unbatching`].
    fn unbatching<U>(self) -> Unbatching<Self, U>
    where
        Self: Reader<Vec<U>>,
    {
        unbatching(Some(self))
    }

    /// See [`filter`].
    fn filter<F: FnMut(&T) -> bool>(self, predicate: F) -> Filter<Self, F> {
        filter(Some(self), Some(predicate))
    }

    /// See [`map`].
    fn map<U, F: FnMut(T) -> U>(self, f: F) -> Map<Self, F, T> {
        map(Some(self), Some(f))
    }

    /// Iterate values until the reader ends.
    fn values(self, ctx: &Context) -> Values<'_, Self, T> {
        values(self, ctx)
    }
}

impl<T, R: Reader<T>> ReaderExt<T> for R {}

/// Combinator methods for any [`Writer`].
///
/// Named `with_*` so a type that is both a reader and a writer can use both
/// extension traits without ambiguity.
pub trait WriterExt<T>: Writer<T> + Sized {
    /// Accept single values, forwarding them to this writer of batches.
    /// See [`batching_writer`].
    fn with_batching<U>(self, size: usize) -> BatchingWriter<U, Self>
    where
        Self: Writer<Vec<U>>,
    {
        batching_writer(Some(self), size)
    }

    /// Accept batches, forwarding each element. See [`unbatching_writer`].
    fn with_unbatching(self) -> UnbatchingWriter<Self> {
        unbatching_writer(Some(self))
    }

    /// See [`filter_writer`].
    fn with_filter<F: FnMut(&T) -> bool>(self, predicate: F) -> FilterWriter<Self, F> {
        filter_writer(Some(self), Some(predicate))
    }

    /// Accept `S`, forwarding `f(value)`. See [`map_writer`].
    fn with_map<S, F: FnMut(S) -> T>(self, f: F) -> MapWriter<Self, F> {
        map_writer(Some(self), Some(f))
    }
}

impl<T, W: Writer<T>> WriterExt<T> for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use valueio_core::{copy, from_values, StreamError};

    #[test]
    fn reader_pipeline() {
        let ctx = Context::background();
        let out: Vec<i32> = from_values(1..=10)
            .filter(|v: &i32| v % 3 != 0)
            .map(|v: i32| v * 10)
            .batching(4)
            .unbatching()
            .values(&ctx)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(out, vec![10, 20, 40, 50, 70, 80, 100]);
    }

    #[test]
    fn values_yields_first_failure_once() {
        let ctx = Context::background();
        let mut calls = 0;
        let source = valueio_core::ReaderFn::new(|_: &Context| -> valueio_core::Result<i32> {
            calls += 1;
            match calls {
                1 => Ok(5),
                _ => Err(StreamError::Cancelled),
            }
        });

        let items: Vec<_> = source.values(&ctx).collect();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Ok(5)));
        assert!(matches!(items[1], Err(StreamError::Cancelled)));
    }

    #[test]
    fn writer_pipeline() {
        let ctx = Context::background();
        let mut batches: Vec<Vec<String>> = Vec::new();

        let mut writer = (&mut batches)
            .with_batching(2)
            .with_map(|v: i32| format!("#{v}"))
            .with_filter(|v: &i32| *v > 0);

        for v in [-1, 1, 2, -3, 3, 4] {
            writer.write(&ctx, v).unwrap();
        }
        drop(writer);

        assert_eq!(batches, vec![vec!["#1", "#2"], vec!["#3", "#4"]]);
    }

    #[test]
    fn copy_through_unbatching_writer() {
        let ctx = Context::background();
        let mut out: Vec<i32> = Vec::new();

        let mut source = from_values(vec![vec![1, 2], vec![3]]);
        let mut sink = (&mut out).with_unbatching();
        let copied = copy(&ctx, &mut source, &mut sink).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(out, vec![1, 2, 3]);
    }
}
