use std::io;

/// Errors returned by value readers and writers.
///
/// `EndOfStream` and `DestinationClosed` are the flow-control sentinels every
/// combinator understands. Everything else is an ordinary failure that is
/// passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// No further values can be produced by this reader.
    #[error("end of stream")]
    EndOfStream,

    /// This writer will accept no more values.
    #[error("destination closed")]
    DestinationClosed,

    /// The caller's context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's context deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// An I/O error from an underlying byte stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] io::Error),

    /// An encode/decode strategy failed.
    #[error("codec error: {0}")]
    Codec(Box<dyn std::error::Error + Send + Sync>),
}

impl StreamError {
    /// Wrap an arbitrary strategy failure.
    pub fn codec<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Codec(err.into())
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    pub fn is_destination_closed(&self) -> bool {
        matches!(self, Self::DestinationClosed)
    }

    /// Returns true for either flow-control sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.is_end_of_stream() || self.is_destination_closed()
    }

    /// Recover a `StreamError` carried inside an `io::Error` (as produced by
    /// the `From` impl below); any other I/O error becomes `Io`.
    pub fn from_io(err: io::Error) -> Self {
        if !err.get_ref().is_some_and(|inner| inner.is::<StreamError>()) {
            return Self::Io(err);
        }
        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<StreamError>()) {
            Some(Ok(stream)) => *stream,
            Some(Err(other)) => Self::Io(io::Error::new(kind, other)),
            None => Self::Io(io::Error::from(kind)),
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io(io) => io,
            StreamError::EndOfStream => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            StreamError::DestinationClosed => io::Error::new(io::ErrorKind::BrokenPipe, err),
            StreamError::DeadlineExceeded => io::Error::new(io::ErrorKind::TimedOut, err),
            other => io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
