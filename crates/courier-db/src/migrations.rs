use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

use crate::Result;

/// Bring the schema up to date. The version check and the migrations run in
/// one IMMEDIATE transaction, so two processes opening a fresh file take turns
/// instead of both applying v1.
pub fn run(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = tx.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, messages)");
        tx.execute_batch(
            "
            CREATE TABLE users (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                username         TEXT NOT NULL UNIQUE CHECK (length(username) > 0),
                hashed_password  VARCHAR(80) NOT NULL
            );

            CREATE TABLE messages (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                from_id        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                to_id          INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                text           VARCHAR(255) NOT NULL,
                creation_date  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE INDEX idx_messages_recipient ON messages(to_id, creation_date);
            CREATE INDEX idx_messages_sender ON messages(from_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    tx.commit()?;

    info!("Database migrations complete");
    Ok(())
}
