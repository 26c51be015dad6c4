/// Entity types shared by the store, the application layer and the CLI.
pub mod models;

pub use models::{InboxEntry, MAX_MESSAGE_LEN, Message, MessageId, User, UserId};
