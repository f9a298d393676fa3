//! In-memory message store for a single conversation.
//!
//! The session is the only shared mutable resource in the core: the
//! caller appends the user/placeholder turns synchronously and the
//! active generation appends chunks and finalizes. The single-writer
//! discipline is enforced by the coordinator, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Message, MessageId};

/// Ordered, append-only conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create an empty session with a known id
    pub fn with_id(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message, returning its id
    pub fn add_message(&mut self, message: Message) -> MessageId {
        let id = message.id.clone();
        self.messages.push(message);
        self.updated_at = Utc::now();
        id
    }

    /// Append streamed text to the identified message's content.
    /// Returns false if no message with that id exists.
    pub fn append_content(&mut self, id: &str, delta: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.content.push_str(delta);
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Attach the extracted citations to the identified message.
    /// Returns false if no message with that id exists.
    pub fn set_citations(&mut self, id: &str, citations: Vec<String>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.citations = citations;
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Look up a message by id
    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// The most recently appended message
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The last `limit` messages in original order; all of them when the
    /// log is shorter than `limit`.
    pub fn history_window(&self, limit: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }

    /// Drop every message, keeping the session id
    pub fn clear(&mut self) {
        self.messages.clear();
        self.updated_at = Utc::now();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn session_with(n: usize) -> Session {
        let mut session = Session::new();
        for i in 0..n {
            session.add_message(Message::user(format!("message {i}")));
        }
        session
    }

    #[test]
    fn test_add_and_lookup() {
        let mut session = Session::new();
        let id = session.add_message(Message::user("hello"));
        assert_eq!(session.len(), 1);
        assert_eq!(session.message(&id).unwrap().content, "hello");
    }

    #[test]
    fn test_append_content() {
        let mut session = Session::new();
        let id = session.add_message(Message::assistant_placeholder());
        assert!(session.append_content(&id, "Grace "));
        assert!(session.append_content(&id, "abounds"));
        assert_eq!(session.message(&id).unwrap().content, "Grace abounds");
        assert!(!session.append_content("no-such-id", "x"));
    }

    #[test]
    fn test_set_citations() {
        let mut session = Session::new();
        let id = session.add_message(Message::assistant("John 3:16"));
        assert!(session.set_citations(&id, vec!["John 3:16".into()]));
        assert_eq!(session.message(&id).unwrap().citations, vec!["John 3:16"]);
    }

    #[test]
    fn test_window_shorter_than_limit() {
        let session = session_with(4);
        let window = session.history_window(10);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].content, "message 0");
        assert_eq!(window[3].content, "message 3");
    }

    #[test]
    fn test_window_caps_at_limit() {
        let session = session_with(25);
        let window = session.history_window(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "message 15");
        assert_eq!(window[9].content, "message 24");
    }

    #[test]
    fn test_window_of_empty_session() {
        let session = Session::new();
        assert!(session.history_window(10).is_empty());
    }

    #[test]
    fn test_clear_keeps_id() {
        let mut session = session_with(3);
        let id = session.id.clone();
        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.id, id);
    }

    #[test]
    fn test_last_message() {
        let mut session = session_with(2);
        session.add_message(Message::assistant("reply"));
        let last = session.last_message().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "reply");
    }
}
