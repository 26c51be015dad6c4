use courier_types::{User, UserId};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::is_unique_violation;
use crate::models::{OptionalExt, USER_COLUMNS, user_from_row};
use crate::{Database, DbError, Result};

/// Access to the `users` table.
pub struct Users<'a> {
    db: &'a Database,
}

impl<'a> Users<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Hash `password` and insert a new user.
    ///
    /// Uniqueness is left to the store: a concurrent insert of the same name
    /// loses with [`DbError::DuplicateUser`].
    pub fn create(&self, username: &str, password: &str) -> Result<User> {
        if username.is_empty() {
            return Err(DbError::EmptyUsername);
        }

        let hashed = self.db.credentials().hash(password)?;
        let user = User::new(username, hashed);

        let id = self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, hashed_password) VALUES (?1, ?2)",
                (&user.username, &user.hashed_password),
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::DuplicateUser(username.to_string())
                } else {
                    e.into()
                }
            })?;
            Ok(conn.last_insert_rowid())
        })?;

        info!("Created user {} ({})", user.username, id);
        Ok(User {
            id: Some(UserId(id)),
            ..user
        })
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.db
            .with_conn(|conn| query_user(conn, "username = ?1", username))
    }

    pub fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        self.db.with_conn(|conn| query_user(conn, "id = ?1", id.0))
    }

    /// Every user, ordered by id.
    pub fn list_all(&self) -> Result<Vec<User>> {
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Re-hash and store a new password. Returns the updated user; `user`
    /// itself is left untouched.
    pub fn update_credential(&self, user: &User, new_password: &str) -> Result<User> {
        let id = user.id.ok_or(DbError::NotPersisted)?;
        let hashed = self.db.credentials().hash(new_password)?;

        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE users SET hashed_password = ?1 WHERE id = ?2",
                (&hashed, id.0),
            )?)
        })?;
        if changed == 0 {
            return Err(DbError::NotFound);
        }

        debug!("Updated credential for user {}", id);
        Ok(User {
            hashed_password: hashed,
            ..user.clone()
        })
    }

    /// Delete the user. The store drops every message they sent or received.
    /// Returns the user with its id cleared.
    pub fn delete(&self, user: User) -> Result<User> {
        let id = user.id.ok_or(DbError::NotPersisted)?;

        let changed = self
            .db
            .with_conn(|conn| Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id.0])?))?;
        if changed == 0 {
            return Err(DbError::NotFound);
        }

        info!("Deleted user {} ({})", user.username, id);
        Ok(User { id: None, ..user })
    }
}

fn query_user<P: rusqlite::ToSql>(conn: &Connection, filter: &str, key: P) -> Result<Option<User>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, filter))?;
    stmt.query_row([key], user_from_row).optional()
}
