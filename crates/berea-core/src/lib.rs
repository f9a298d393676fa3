pub mod session;
pub mod types;

pub use session::Session;
pub use types::{Message, MessageId, Role};
