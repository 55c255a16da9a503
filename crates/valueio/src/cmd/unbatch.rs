use std::io::{Read, Write};

use serde_json::Value;
use tracing::debug;
use valueio::capability::{copy, Context};
use valueio::combinators::unbatching;

use crate::cmd::{stdio, UnbatchArgs};
use crate::exit::{stream_error, CliResult, SUCCESS};
use crate::framing::Framings;

pub fn run(_args: UnbatchArgs, framings: Framings) -> CliResult<i32> {
    let (stdin, stdout) = stdio();
    let values = transform(framings, stdin, stdout)?;
    debug!(values, "unbatch finished");
    Ok(SUCCESS)
}

/// Read arrays from `src` and write their elements to `dst`. Input that is
/// not an array fails; an empty array stops the copy.
pub(crate) fn transform<R: Read, W: Write>(framings: Framings, src: R, dst: W) -> CliResult<u64> {
    let ctx = Context::background();
    let mut reader = unbatching::<_, Value>(Some(framings.reader(src)));
    let mut writer = framings.writer(dst);

    let written = copy::<Value, _, _>(&ctx, &mut reader, &mut writer)
        .map_err(|err| stream_error("unbatch failed", err))?;
    writer
        .flush()
        .map_err(|err| stream_error("flush failed", err))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::exit::DATA_INVALID;

    fn run_unbatch(input: &str) -> (CliResult<u64>, String) {
        let mut out = Vec::new();
        let result = transform(
            Framings::default(),
            Cursor::new(input.as_bytes().to_vec()),
            &mut out,
        );
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn flattens_arrays() {
        let (result, out) = run_unbatch("[1,2]\n[\"x\"]\n");
        assert_eq!(result.unwrap(), 3);
        assert_eq!(out, "1\n2\n\"x\"\n");
    }

    #[test]
    fn empty_array_ends_the_stream() {
        let (result, out) = run_unbatch("[1] [] [2]");
        assert_eq!(result.unwrap(), 1);
        assert_eq!(out, "1\n");
    }

    #[test]
    fn non_array_input_is_invalid() {
        let (result, out) = run_unbatch("[1] {\"a\":1}");
        assert_eq!(result.unwrap_err().code, DATA_INVALID);
        assert_eq!(out, "1\n");
    }
}
