use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest message body accepted, in characters.
pub const MAX_MESSAGE_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account.
///
/// `id` is `None` until the store has assigned a key, and goes back to `None`
/// once the row is deleted. The hash is skipped when serializing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<UserId>,
    pub username: String,
    #[serde(skip)]
    pub hashed_password: String,
}

impl User {
    /// An unsaved user. `hashed_password` must already be the output of the
    /// credential hasher.
    pub fn new(username: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            hashed_password: hashed_password.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

// Keep the hash out of logs and panics.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("hashed_password", &"[REDACTED]")
            .finish()
    }
}

/// A stored message. Messages are never edited once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub from_id: UserId,
    pub to_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A received message together with the sender's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxEntry {
    pub from_username: String,
    #[serde(flatten)]
    pub message: Message,
}
