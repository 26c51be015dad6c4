/// Courier credential hashing.
///
/// Argon2id over (password, salt), stored as PHC strings. Stateless apart
/// from the cost parameters; password length policy is left to callers.
pub mod password;

pub use password::{CredentialError, CredentialService, HashParams};
