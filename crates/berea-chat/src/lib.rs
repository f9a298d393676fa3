//! Streaming generation coordination for the berea chat client.
//!
//! One [`ChatCoordinator`] per conversation: it owns the session log,
//! enforces the single-active-generation invariant, delivers chunk and
//! terminal events per generation, and maps every transport failure
//! into the closed [`ChatError`] taxonomy.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod gate;
pub mod generation;

pub use config::ChatConfig;
pub use coordinator::ChatCoordinator;
pub use error::ChatError;
pub use event::ChatEvent;
pub use gate::{Unmetered, UsageGate};
pub use generation::{Generation, GenerationState};
