pub mod error;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod users;

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use courier_crypto::{CredentialService, HashParams};
use rusqlite::Connection;
use tracing::info;

pub use error::{DbError, Result};
pub use messages::Messages;
pub use users::Users;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the store lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `None` opens a private in-memory store.
    pub path: Option<PathBuf>,
    pub busy_timeout: Duration,
    pub hash_params: HashParams,
}

impl DbConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::in_memory()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            hash_params: HashParams::default(),
        }
    }

    pub fn with_hash_params(mut self, params: HashParams) -> Self {
        self.hash_params = params;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

/// One open connection to the store. Dropping it closes the connection.
pub struct Database {
    conn: Mutex<Connection>,
    credentials: CredentialService,
}

impl Database {
    pub fn open(config: &DbConfig) -> Result<Self> {
        let mut conn = match &config.path {
            Some(path) => Connection::open(path),
            None => Connection::open_in_memory(),
        }
        .map_err(DbError::connection)?;

        // Set before anything that takes a lock, so concurrent openers wait.
        conn.busy_timeout(config.busy_timeout)?;
        if config.path.is_some() {
            // WAL mode for concurrent readers from other processes
            conn.pragma_update(None, "journal_mode", "WAL")?;
        }
        // Cascading deletes depend on this; SQLite leaves it off by default.
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&mut conn)?;

        let credentials = CredentialService::new(config.hash_params)?;

        match &config.path {
            Some(path) => info!("Database opened at {}", path.display()),
            None => info!("In-memory database opened"),
        }
        Ok(Self {
            conn: Mutex::new(conn),
            credentials,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(&DbConfig::in_memory())
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DbError::ConnectionFailure(format!("DB lock poisoned: {}", e)))?;
        f(&conn)
    }
}
