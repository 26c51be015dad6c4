//! Row mapping between SQLite and the courier-types entities.
use chrono::{DateTime, NaiveDateTime, Utc};
use courier_types::{InboxEntry, Message, MessageId, User, UserId};
use rusqlite::Row;
use tracing::warn;

use crate::{DbError, Result};

/// Format written by the `creation_date` column default.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub(crate) const USER_COLUMNS: &str = "id, username, hashed_password";
pub(crate) const MESSAGE_COLUMNS: &str = "id, from_id, to_id, text, creation_date";

/// Expects `USER_COLUMNS` order.
pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(UserId(row.get(0)?)),
        username: row.get(1)?,
        hashed_password: row.get(2)?,
    })
}

/// Expects `MESSAGE_COLUMNS` order.
pub(crate) fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    let id: i64 = row.get(0)?;
    let created_at: String = row.get(4)?;
    Ok(Message {
        id: MessageId(id),
        from_id: UserId(row.get(1)?),
        to_id: UserId(row.get(2)?),
        text: row.get(3)?,
        created_at: parse_timestamp(&created_at, id),
    })
}

/// `MESSAGE_COLUMNS` followed by the sender's username.
pub(crate) fn inbox_entry_from_row(row: &Row<'_>) -> rusqlite::Result<InboxEntry> {
    Ok(InboxEntry {
        message: message_from_row(row)?,
        from_username: row.get(5)?,
    })
}

pub(crate) fn parse_timestamp(raw: &str, message_id: i64) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|ndt| ndt.and_utc())
        .unwrap_or_else(|e| {
            warn!("Corrupt creation_date '{}' on message {}: {}", raw, message_id, e);
            DateTime::default()
        })
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }
}
