use std::time::{Duration, Instant};

use crate::error::ChatError;

/// Lifecycle of one streaming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    /// Created, stream not yet open
    Requested,
    /// Stream open, chunks arriving
    Streaming,
    Completed,
    Cancelled,
    Failed(ChatError),
}

impl GenerationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Requested | Self::Streaming)
    }
}

/// Transient per-request bookkeeping, owned by the generation task and
/// dropped when it reaches a terminal state or is superseded.
#[derive(Debug)]
pub struct Generation {
    pub query: String,
    pub started_at: Instant,
    pub buffer: String,
    pub state: GenerationState,
}

impl Generation {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            started_at: Instant::now(),
            buffer: String::new(),
            state: GenerationState::Requested,
        }
    }

    /// Wall-clock time since the stream was opened
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn push_chunk(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generation_is_requested() {
        let generation = Generation::new("What is grace?");
        assert_eq!(generation.state, GenerationState::Requested);
        assert!(generation.buffer.is_empty());
        assert!(!generation.state.is_terminal());
    }

    #[test]
    fn test_buffer_grows_monotonically() {
        let mut generation = Generation::new("q");
        generation.push_chunk("Grace ");
        generation.push_chunk("abounds");
        assert_eq!(generation.buffer, "Grace abounds");
    }

    #[test]
    fn test_terminal_states() {
        assert!(GenerationState::Completed.is_terminal());
        assert!(GenerationState::Cancelled.is_terminal());
        assert!(GenerationState::Failed(ChatError::InvalidResponse).is_terminal());
        assert!(!GenerationState::Streaming.is_terminal());
    }
}
