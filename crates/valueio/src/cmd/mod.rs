use std::io::{self, BufWriter, StdinLock, StdoutLock};

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::framing::Framings;
use crate::output::{Kind, OutputFormat};

pub mod batch;
pub mod filter;
pub mod pluck;
pub mod stats;
pub mod unbatch;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Group values into arrays of up to --size elements.
    Batch(BatchArgs),
    /// Flatten arrays into their elements; an empty array ends the stream.
    Unbatch(UnbatchArgs),
    /// Keep only values of one JSON kind.
    Filter(FilterArgs),
    /// Replace each value with the member found at a JSON pointer.
    Pluck(PluckArgs),
    /// Count values by kind.
    Stats(StatsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, framings: Framings, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Batch(args) => batch::run(args, framings),
        Command::Unbatch(args) => unbatch::run(args, framings),
        Command::Filter(args) => filter::run(args, framings),
        Command::Pluck(args) => pluck::run(args, framings),
        Command::Stats(args) => stats::run(args, framings, format),
        Command::Version(args) => version::run(args),
    }
}

/// Locked stdin and buffered stdout for the streaming commands.
pub(crate) fn stdio() -> (StdinLock<'static>, BufWriter<StdoutLock<'static>>) {
    (io::stdin().lock(), BufWriter::new(io::stdout().lock()))
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Values per batch; 0 selects the library default.
    #[arg(long, short = 'n', default_value_t = 8)]
    pub size: usize,
}

#[derive(Args, Debug, Default)]
pub struct UnbatchArgs {}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Kind of value to keep.
    #[arg(long, short = 'k', value_name = "KIND")]
    pub kind: Kind,
    /// Keep every value except those of --kind.
    #[arg(long)]
    pub invert: bool,
}

#[derive(Args, Debug)]
pub struct PluckArgs {
    /// RFC 6901 pointer, e.g. /user/name. Missing members become null.
    #[arg(long, short = 'p', value_name = "POINTER", allow_hyphen_values = true)]
    pub pointer: String,
}

#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
