use courier_db::Database;
use courier_types::User;
use tracing::info;

use crate::auth::authenticate;
use crate::{AppError, Result};

/// Shortest password accepted, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too short, it needs at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(AppError::validation("username must not be empty"));
    }
    Ok(())
}

/// Register a new user.
pub fn create_user(db: &Database, username: &str, password: &str) -> Result<User> {
    validate_username(username)?;
    validate_password(password)?;

    Ok(db.users().create(username, password)?)
}

/// Change a user's password after checking the current one.
pub fn edit_user(db: &Database, username: &str, password: &str, new_password: &str) -> Result<User> {
    let user = authenticate(db, username, password)?;
    validate_password(new_password)?;

    let user = db.users().update_credential(&user, new_password)?;
    info!("Password changed for {}", user.username);
    Ok(user)
}

/// Delete a user, and with them every message they sent or received.
pub fn delete_user(db: &Database, username: &str, password: &str) -> Result<User> {
    let user = authenticate(db, username, password)?;
    Ok(db.users().delete(user)?)
}

pub fn list_users(db: &Database) -> Result<Vec<User>> {
    Ok(db.users().list_all()?)
}
