use courier_db::{Database, DbError};
use courier_types::{InboxEntry, MAX_MESSAGE_LEN, Message, User};

use crate::{AppError, Result};

/// Send `text` from an authenticated user to the user named `recipient`.
pub fn send_message(db: &Database, sender: &User, recipient: &str, text: &str) -> Result<Message> {
    let len = text.chars().count();
    if len > MAX_MESSAGE_LEN {
        return Err(AppError::validation(format!(
            "message is too long ({} characters, limit {})",
            len, MAX_MESSAGE_LEN
        )));
    }

    let from_id = sender.id.ok_or(DbError::NotPersisted)?;
    let to = db
        .users()
        .find_by_username(recipient)?
        .ok_or_else(|| AppError::NotFound(format!("recipient {:?}", recipient)))?;
    let to_id = to.id.ok_or(DbError::NotPersisted)?;

    Ok(db.messages().send(from_id, to_id, text)?)
}

/// Messages received by `user`, oldest first, with sender names.
pub fn list_messages(db: &Database, user: &User) -> Result<Vec<InboxEntry>> {
    let id = user.id.ok_or(DbError::NotPersisted)?;
    Ok(db.messages().inbox(id)?)
}
