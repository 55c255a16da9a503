use std::io::{Read, Write};

use serde_json::Value;
use tracing::debug;
use valueio::capability::{copy, Context};
use valueio::combinators::batching;

use crate::cmd::{stdio, BatchArgs};
use crate::exit::{stream_error, CliResult, SUCCESS};
use crate::framing::Framings;

pub fn run(args: BatchArgs, framings: Framings) -> CliResult<i32> {
    let (stdin, stdout) = stdio();
    let batches = transform(&args, framings, stdin, stdout)?;
    debug!(batches, size = args.size, "batch finished");
    Ok(SUCCESS)
}

/// Re-emit the values read from `src` as arrays on `dst`. Returns the number
/// of batches written.
pub(crate) fn transform<R: Read, W: Write>(
    args: &BatchArgs,
    framings: Framings,
    src: R,
    dst: W,
) -> CliResult<u64> {
    let ctx = Context::background();
    let mut reader = batching(Some(framings.reader(src)), args.size);
    let mut writer = framings.writer(dst);

    let written = copy::<Vec<Value>, _, _>(&ctx, &mut reader, &mut writer)
        .map_err(|err| stream_error("batch failed", err))?;
    writer
        .flush()
        .map_err(|err| stream_error("flush failed", err))?;
    Ok(written)
}
