//! Property tests for batching and unbatching.

use proptest::prelude::*;
use valueio_combinators::{batching, batching_writer, unbatching, ReaderExt, WriterExt};
use valueio_core::{from_values, Context, Reader, Result, Writer};

fn read_all<T, R: Reader<T>>(reader: &mut R, ctx: &Context) -> (Vec<T>, usize) {
    let mut out = Vec::new();
    let mut calls = 0;
    loop {
        calls += 1;
        match reader.read(ctx) {
            Ok(value) => out.push(value),
            Err(err) => {
                assert!(err.is_end_of_stream(), "unexpected failure: {err}");
                return (out, calls);
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_batches_reproduce_input(seq in prop::collection::vec(any::<i64>(), 0..64), size in 1usize..12) {
        let ctx = Context::background();
        let mut reader = batching(Some(from_values(seq.clone())), size);

        let (batches, calls) = read_all(&mut reader, &ctx);

        prop_assert_eq!(batches.len(), seq.len().div_ceil(size));
        prop_assert_eq!(calls, batches.len() + 1);
        prop_assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= size));
        prop_assert!(batches.iter().rev().skip(1).all(|b| b.len() == size));
        prop_assert_eq!(batches.concat(), seq);
    }

    #[test]
    fn prop_unbatching_inverts_batching(seq in prop::collection::vec(".{0,8}", 0..48), size in 1usize..10) {
        let ctx = Context::background();
        let mut reader = unbatching(Some(batching(Some(from_values(seq.clone())), size)));

        let (out, _) = read_all(&mut reader, &ctx);
        prop_assert_eq!(&out, &seq);

        let again: Result<String> = reader.read(&ctx);
        prop_assert!(again.unwrap_err().is_end_of_stream());
    }

    #[test]
    fn prop_batching_writer_matches_batching_reader(seq in prop::collection::vec(any::<u16>(), 0..64), size in 1usize..12) {
        let ctx = Context::background();

        let mut written: Vec<Vec<u16>> = Vec::new();
        let mut writer = batching_writer(Some(&mut written), size);
        for value in &seq {
            writer.write(&ctx, *value).unwrap();
        }
        writer.flush(&ctx).unwrap();
        drop(writer);

        let (read, _) = read_all(&mut from_values(seq.clone()).batching(size), &ctx);
        prop_assert_eq!(written, read);
    }

    #[test]
    fn prop_unbatching_writer_flattens(batches in prop::collection::vec(prop::collection::vec(any::<i32>(), 0..6), 0..16)) {
        let ctx = Context::background();
        let mut flat: Vec<i32> = Vec::new();
        let mut writer = (&mut flat).with_unbatching();

        for batch in &batches {
            writer.write(&ctx, batch.clone()).unwrap();
        }
        drop(writer);

        prop_assert_eq!(flat, batches.concat());
    }
}
