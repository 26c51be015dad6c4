use courier_types::{InboxEntry, MAX_MESSAGE_LEN, Message, UserId};
use rusqlite::Connection;
use tracing::debug;

use crate::models::{MESSAGE_COLUMNS, inbox_entry_from_row, message_from_row};
use crate::{Database, DbError, Result};

/// Access to the `messages` table.
pub struct Messages<'a> {
    db: &'a Database,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Store a message from `from_id` to `to_id`. Over-long text is rejected
    /// before the store is touched.
    pub fn send(&self, from_id: UserId, to_id: UserId, text: &str) -> Result<Message> {
        let len = text.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(DbError::MessageTooLong {
                len,
                max: MAX_MESSAGE_LEN,
            });
        }

        let message = self.db.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO messages (from_id, to_id, text) VALUES (?1, ?2, ?3) RETURNING {}",
                MESSAGE_COLUMNS
            );
            Ok(conn.query_row(&sql, (from_id.0, to_id.0, text), message_from_row)?)
        })?;

        debug!("Stored message {} from {} to {}", message.id, from_id, to_id);
        Ok(message)
    }

    /// Messages addressed to `user_id`, oldest first.
    pub fn list_for_recipient(&self, user_id: UserId) -> Result<Vec<Message>> {
        self.db
            .with_conn(|conn| query_messages(conn, Some(("to_id", user_id))))
    }

    /// Messages written by `user_id`, oldest first.
    pub fn list_from_sender(&self, user_id: UserId) -> Result<Vec<Message>> {
        self.db
            .with_conn(|conn| query_messages(conn, Some(("from_id", user_id))))
    }

    /// Every stored message, oldest first.
    pub fn list_all(&self) -> Result<Vec<Message>> {
        self.db.with_conn(|conn| query_messages(conn, None))
    }

    /// Messages addressed to `user_id` with each sender's username.
    pub fn inbox(&self, user_id: UserId) -> Result<Vec<InboxEntry>> {
        self.db.with_conn(|conn| {
            // JOIN users so the caller does not look up each sender separately
            let mut stmt = conn.prepare(
                "SELECT m.id, m.from_id, m.to_id, m.text, m.creation_date, u.username
                 FROM messages m
                 JOIN users u ON m.from_id = u.id
                 WHERE m.to_id = ?1
                 ORDER BY m.creation_date, m.id",
            )?;

            let rows = stmt
                .query_map([user_id.0], inbox_entry_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

/// `filter` is a trusted column name paired with the id to match.
fn query_messages(conn: &Connection, filter: Option<(&str, UserId)>) -> Result<Vec<Message>> {
    let sql = match filter {
        Some((column, _)) => format!(
            "SELECT {} FROM messages WHERE {} = ?1 ORDER BY creation_date, id",
            MESSAGE_COLUMNS, column
        ),
        None => format!(
            "SELECT {} FROM messages ORDER BY creation_date, id",
            MESSAGE_COLUMNS
        ),
    };
    let params: Vec<i64> = filter.map(|(_, id)| id.0).into_iter().collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), message_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
