use std::io::{Read, Write};

use serde_json::Value;
use tracing::debug;
use valueio::capability::{copy, Context};
use valueio::combinators::ReaderExt;

use crate::cmd::{stdio, PluckArgs};
use crate::exit::{stream_error, CliError, CliResult, SUCCESS, USAGE};
use crate::framing::Framings;

pub fn run(args: PluckArgs, framings: Framings) -> CliResult<i32> {
    let (stdin, stdout) = stdio();
    let values = transform(&args, framings, stdin, stdout)?;
    debug!(values, pointer = %args.pointer, "pluck finished");
    Ok(SUCCESS)
}

fn validate_pointer(pointer: &str) -> CliResult<()> {
    if pointer.is_empty() || pointer.starts_with('/') {
        Ok(())
    } else {
        Err(CliError::new(
            USAGE,
            format!("pointer must be empty or start with '/': {pointer:?}"),
        ))
    }
}

/// Write the member of each input value found at the pointer, or `null`
/// where it is missing.
pub(crate) fn transform<R: Read, W: Write>(
    args: &PluckArgs,
    framings: Framings,
    src: R,
    dst: W,
) -> CliResult<u64> {
    validate_pointer(&args.pointer)?;

    let ctx = Context::background();
    let pointer = args.pointer.as_str();
    let mut reader = framings.reader(src).map(|mut value: Value| {
        value
            .pointer_mut(pointer)
            .map(Value::take)
            .unwrap_or(Value::Null)
    });
    let mut writer = framings.writer(dst);

    let written = copy::<Value, _, _>(&ctx, &mut reader, &mut writer)
        .map_err(|err| stream_error("pluck failed", err))?;
    writer
        .flush()
        .map_err(|err| stream_error("flush failed", err))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run_pluck(pointer: &str, input: &str) -> CliResult<String> {
        let mut out = Vec::new();
        transform(
            &PluckArgs {
                pointer: pointer.to_string(),
            },
            Framings::default(),
            Cursor::new(input.as_bytes().to_vec()),
            &mut out,
        )?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn extracts_nested_members() {
        let out = run_pluck("/user/name", "{\"user\":{\"name\":\"ada\"}} {\"user\":{}}").unwrap();
        assert_eq!(out, "\"ada\"\nnull\n");
    }

    #[test]
    fn indexes_into_arrays() {
        let out = run_pluck("/1", "[10,20] [30]").unwrap();
        assert_eq!(out, "20\nnull\n");
    }

    #[test]
    fn empty_pointer_is_identity() {
        let out = run_pluck("", "{\"a\":1}").unwrap();
        assert_eq!(out, "{\"a\":1}\n");
    }

    #[test]
    fn relative_pointer_is_a_usage_error() {
        let err = run_pluck("user", "{}").unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
