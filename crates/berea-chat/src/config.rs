use std::time::Duration;

/// Coordinator configuration. Fixed for the lifetime of a request; there
/// is no mid-stream reconfiguration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Maximum number of messages sent as outbound context.
    pub history_window_limit: usize,
    /// Wall-clock budget for a single generation, checked at chunk
    /// boundaries.
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window_limit: 10,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_window_limit(mut self, limit: usize) -> Self {
        self.history_window_limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
