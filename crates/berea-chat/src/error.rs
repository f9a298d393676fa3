use berea_llm::TransportError;
use thiserror::Error;

/// Caller-facing failure taxonomy.
///
/// Closed set: every transport failure classifies into exactly one
/// variant, so no raw error ever reaches the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("network unavailable")]
    NetworkUnavailable,

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("AI service unavailable")]
    AiServiceUnavailable,

    #[error("invalid response from service")]
    InvalidResponse,

    #[error("{0}")]
    Unknown(String),
}

impl ChatError {
    /// Map a raw transport failure into the taxonomy.
    ///
    /// Total and deterministic: connectivity loss is
    /// `NetworkUnavailable`, HTTP 429 is `RateLimitExceeded`, 5xx and
    /// timeouts are `AiServiceUnavailable`, malformed payloads are
    /// `InvalidResponse`, and everything else carries its description as
    /// `Unknown`.
    pub fn classify(raw: &TransportError) -> Self {
        match raw {
            TransportError::Network(_) => ChatError::NetworkUnavailable,
            TransportError::Api { status: 429, .. } => ChatError::RateLimitExceeded,
            TransportError::Api { status, .. } if *status >= 500 => ChatError::AiServiceUnavailable,
            TransportError::Timeout { .. } => ChatError::AiServiceUnavailable,
            TransportError::Decode(_) => ChatError::InvalidResponse,
            other => ChatError::Unknown(other.to_string()),
        }
    }
}
