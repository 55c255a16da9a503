mod cmd;
mod exit;
mod framing;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::framing::{Framing, Framings};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "valueio", version, about = "Typed value stream CLI")]
struct Cli {
    /// Output format for reports (stats).
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Framing of values read from stdin.
    #[arg(long, value_name = "FRAMING", default_value = "json", global = true)]
    input_framing: Framing,

    /// Framing of values written to stdout.
    #[arg(long, value_name = "FRAMING", default_value = "json", global = true)]
    output_framing: Framing,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let framings = Framings {
        input: cli.input_framing,
        output: cli.output_framing,
    };
    let result = cmd::run(cli.command, framings, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batch_subcommand() {
        let cli = Cli::try_parse_from(["valueio", "batch", "--size", "3"])
            .expect("batch args should parse");

        match cli.command {
            Command::Batch(args) => assert_eq!(args.size, 3),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.input_framing, Framing::Json);
    }

    #[test]
    fn framing_flags_are_global() {
        let cli = Cli::try_parse_from([
            "valueio",
            "unbatch",
            "--input-framing",
            "length-prefixed",
        ])
        .expect("global flag after subcommand should parse");

        assert_eq!(cli.input_framing, Framing::LengthPrefixed);
        assert_eq!(cli.output_framing, Framing::Json);
    }

    #[test]
    fn filter_requires_kind() {
        let err = Cli::try_parse_from(["valueio", "filter"]).expect_err("missing --kind");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = Cli::try_parse_from(["valueio", "filter", "--kind", "integer"])
            .expect_err("unknown kind should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn parses_pluck_pointer() {
        let cli = Cli::try_parse_from([
            "valueio",
            "--format",
            "json",
            "pluck",
            "--pointer",
            "/a/0",
        ])
        .expect("pluck args should parse");
        assert!(matches!(cli.command, Command::Pluck(ref args) if args.pointer == "/a/0"));
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }
}
