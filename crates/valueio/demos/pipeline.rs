//! Reader and writer pipelines over in-memory values and bytes.
//!
//! Run with `cargo run -p valueio --example pipeline`.

use std::io;

use valueio::combinators::batching_writer;
use valueio::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::background();

    // Pull side: odd squares, three per batch.
    let mut batches = from_values(1..=12)
        .filter(|v: &u32| v % 2 == 1)
        .map(|v: u32| v * v)
        .batching(3);
    loop {
        match Reader::<Vec<u32>>::read(&mut batches, &ctx) {
            Ok(batch) => println!("batch: {batch:?}"),
            Err(err) if err.is_end_of_stream() => break,
            Err(err) => return Err(err.into()),
        }
    }

    // Push side: the same shape built from writers, ending in JSON lines.
    let encoder = EncodeWriter::new(Vec::new());
    let mut sink = batching_writer::<u32, _>(Some(encoder), 3)
        .with_map(|v: u32| v * v)
        .with_filter(|v: &u32| v % 2 == 1);
    for v in 1..=12u32 {
        sink.write(&ctx, v)?;
    }
    let mut batching = sink
        .into_inner()
        .and_then(|mapped| mapped.into_inner())
        .ok_or("writer chain lost its sink")?;
    batching.flush(&ctx)?;
    let json = batching
        .into_inner()
        .and_then(|encoder| encoder.into_inner())
        .ok_or("writer chain lost its sink")?;
    print!("{}", String::from_utf8(json)?);

    // Bytes in both directions: values -> io::Read -> io::Write -> values.
    let mut bytes = EncodedBytes::new(from_values(["alpha", "beta"].map(String::from)));
    let mut decoded: Vec<String> = Vec::new();
    let mut sink = DecodingSink::new(&mut decoded);
    io::copy(&mut bytes, &mut sink)?;
    sink.finish()?;
    drop(sink);
    println!("round trip: {decoded:?}");

    let mut reader = DecodeReader::new(io::Cursor::new(b"[1,2] [3]".to_vec()));
    let total: u32 = ReaderExt::<Vec<u32>>::unbatching::<u32>(&mut reader)
        .values(&ctx)
        .sum::<Result<u32, StreamError>>()?;
    println!("sum: {total}");

    Ok(())
}
