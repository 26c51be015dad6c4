/// User-facing operations on top of the courier store: registration,
/// authentication, password changes, account removal and messaging.
pub mod auth;
pub mod error;
pub mod messages;
pub mod users;

pub use auth::authenticate;
pub use error::{AppError, Result};
pub use messages::{list_messages, send_message};
pub use users::{MIN_PASSWORD_LEN, create_user, delete_user, edit_user, list_users};
