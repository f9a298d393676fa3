use thiserror::Error;

/// Raw transport-level failure from the generation stream.
///
/// This is the input to classification; callers of the chat layer never
/// see these directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("generation exceeded {elapsed_secs}s")]
    Timeout { elapsed_secs: u64 },
}

pub type Result<T> = std::result::Result<T, TransportError>;
