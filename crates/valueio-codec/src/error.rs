use valueio_core::StreamError;

/// Errors raised by the built-in encode/decode strategies.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value could not be serialized or deserialized as JSON.
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// An encoded value exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The byte stream ended part-way through a value.
    #[error("byte stream ended mid-value ({buffered} bytes buffered)")]
    Incomplete { buffered: usize },

    /// A caller-supplied strategy rejected its input.
    #[error("codec error: {0}")]
    Custom(String),
}

impl CodecError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

impl From<CodecError> for StreamError {
    fn from(err: CodecError) -> Self {
        StreamError::Codec(Box::new(err))
    }
}

/// Borrow the [`CodecError`] inside a [`StreamError::Codec`], if there is one.
pub fn as_codec_error(err: &StreamError) -> Option<&CodecError> {
    match err {
        StreamError::Codec(inner) => inner.downcast_ref::<CodecError>(),
        _ => None,
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
