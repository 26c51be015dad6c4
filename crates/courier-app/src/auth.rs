use courier_db::Database;
use courier_types::User;
use tracing::{debug, warn};

use crate::{AppError, Result};

/// Check `password` against the stored hash for `username`.
///
/// Both an unknown user and a wrong password give
/// [`AppError::AuthenticationFailed`]. On success the returned user is the
/// acting identity for the rest of the invocation; no token is issued.
pub fn authenticate(db: &Database, username: &str, password: &str) -> Result<User> {
    let user = db.users().find_by_username(username)?;
    let credentials = db.credentials();

    let verified = match &user {
        Some(user) => credentials.verify(password, &user.hashed_password),
        None => {
            // Spend the same hashing work as a real check.
            let _ = credentials.hash(password);
            false
        }
    };

    match user {
        Some(user) if verified => {
            debug!("Authenticated {}", user.username);
            Ok(user)
        }
        _ => {
            warn!("Authentication failed for {}", username);
            Err(AppError::AuthenticationFailed)
        }
    }
}
