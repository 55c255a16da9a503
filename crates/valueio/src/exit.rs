use std::fmt;
use std::io;

use valueio::capability::StreamError;
use valueio::codec::{as_codec_error, CodecError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::BrokenPipe | io::ErrorKind::Interrupted => FAILURE,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn stream_error(context: &str, err: StreamError) -> CliError {
    if let Some(codec) = as_codec_error(&err) {
        let code = match codec {
            CodecError::Json(_) | CodecError::Incomplete { .. } => DATA_INVALID,
            CodecError::PayloadTooLarge { .. } => DATA_INVALID,
            CodecError::Custom(_) => FAILURE,
        };
        return CliError::new(code, format!("{context}: {codec}"));
    }

    match err {
        StreamError::Io(source) => io_error(context, source),
        StreamError::Codec(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        StreamError::DestinationClosed | StreamError::Cancelled | StreamError::DeadlineExceeded => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        StreamError::EndOfStream => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}
