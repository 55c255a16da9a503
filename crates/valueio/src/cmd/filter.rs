use std::io::{Read, Write};

use serde_json::Value;
use tracing::debug;
use valueio::capability::{copy, Context};
use valueio::combinators::WriterExt;

use crate::cmd::{stdio, FilterArgs};
use crate::exit::{stream_error, CliResult, SUCCESS};
use crate::framing::Framings;
use crate::output::Kind;

pub fn run(args: FilterArgs, framings: Framings) -> CliResult<i32> {
    let (stdin, stdout) = stdio();
    let seen = transform(&args, framings, stdin, stdout)?;
    debug!(seen, kind = args.kind.name(), "filter finished");
    Ok(SUCCESS)
}

/// Copy values of the selected kind from `src` to `dst`. The filter sits on
/// the writer side, so the returned count includes dropped values.
pub(crate) fn transform<R: Read, W: Write>(
    args: &FilterArgs,
    framings: Framings,
    src: R,
    dst: W,
) -> CliResult<u64> {
    let ctx = Context::background();
    let (kind, invert) = (args.kind, args.invert);
    let mut reader = framings.reader(src);
    let mut writer = framings
        .writer(dst)
        .with_filter(move |value: &Value| (Kind::of(value) == kind) != invert);

    let seen = copy::<Value, _, _>(&ctx, &mut reader, &mut writer)
        .map_err(|err| stream_error("filter failed", err))?;
    if let Some(mut inner) = writer.into_inner() {
        inner
            .flush()
            .map_err(|err| stream_error("flush failed", err))?;
    }
    Ok(seen)
}
