use async_trait::async_trait;
use berea_core::Message;
use futures::Stream;
use std::pin::Pin;

use crate::error::TransportError;

/// Type alias for a stream of generated text chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// Remote generation service seam.
///
/// Implementations own the wire protocol (HTTP/SSE or otherwise) and may
/// fail at open time or mid-stream with a [`TransportError`]. Dropping
/// the returned stream tears the transport down.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Open a streaming generation over the given context window.
    async fn open_stream(&self, context: &[Message]) -> Result<ChunkStream, TransportError>;
}
