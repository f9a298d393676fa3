use berea_core::Message;

use crate::error::ChatError;

/// Events emitted by one generation, in delivery order.
///
/// A generation emits zero or more `Chunk`s followed by exactly one
/// terminal event, except when cancelled: a cancelled generation closes
/// its channel without a terminal event.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// Incremental text fragment, in arrival order
    Chunk(String),
    /// Generation finished; carries the finalized assistant message
    Complete(Message),
    /// Generation failed with a classified error
    Failed(ChatError),
}

impl ChatEvent {
    /// Check if this is a terminal event
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Failed(_))
    }
}
