use std::io::Read;

use serde_json::Value;
use tracing::debug;
use valueio::capability::{values, Context};

use crate::cmd::StatsArgs;
use crate::exit::{stream_error, CliResult, SUCCESS};
use crate::framing::Framings;
use crate::output::{print_stats, OutputFormat, Stats};

pub fn run(_args: StatsArgs, framings: Framings, format: OutputFormat) -> CliResult<i32> {
    let stats = collect(framings, std::io::stdin().lock())?;
    debug!(total = stats.total, "stats finished");
    print_stats(&stats, format);
    Ok(SUCCESS)
}

pub(crate) fn collect<R: Read>(framings: Framings, src: R) -> CliResult<Stats> {
    let ctx = Context::background();
    let mut stats = Stats::default();
    for item in values::<Value, _>(framings.reader(src), &ctx) {
        let value = item.map_err(|err| stream_error("stats failed", err))?;
        stats.record(&value);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::exit::DATA_INVALID;
    use crate::framing::Framing;

    #[test]
    fn counts_every_value() {
        let stats = collect(
            Framings::default(),
            Cursor::new(b"1 {\"a\":[]} [] \"s\" true false".to_vec()),
        )
        .unwrap();

        assert_eq!(stats.total, 6);
        assert_eq!(stats.bool, 2);
        assert_eq!(stats.object, 1);
        assert_eq!(stats.array, 1);
    }

    #[test]
    fn reads_length_prefixed_input() {
        let mut wire = 4u32.to_le_bytes().to_vec();
        wire.extend_from_slice(b"null");
        let framings = Framings {
            input: Framing::LengthPrefixed,
            output: Framing::Json,
        };

        let stats = collect(framings, Cursor::new(wire)).unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.null, 1);
    }

    #[test]
    fn truncated_input_is_invalid() {
        let err = collect(Framings::default(), Cursor::new(b"[1, 2".to_vec())).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
