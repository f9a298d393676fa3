//! Remote generation stream interface.
//!
//! The chat core talks to the generation service only through
//! [`GenerationProvider`]; concrete transports live outside this
//! workspace.

pub mod error;
pub mod provider;

pub use error::{Result, TransportError};
pub use provider::{ChunkStream, GenerationProvider};
