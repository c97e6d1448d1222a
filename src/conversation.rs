use serde::{Deserialize, Serialize};

/// Default assistant greeting seeded as the first message.
pub const DEFAULT_GREETING: &str =
    "Hi! I'm your AI Project Manager powered by Chief. How can I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only message history plus the open/closed flag.
///
/// The flag controls visibility only. Closing and reopening never touches
/// the messages, and nothing here reorders or deletes history.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    is_open: bool,
}

impl Conversation {
    pub fn new(greeting: &str) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
            is_open: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append one user/assistant pair.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(Message::user(user));
        self.messages.push(Message::assistant(assistant));
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }
}
