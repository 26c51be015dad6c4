use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use courier_crypto::HashParams;
use courier_db::DbConfig;

/// Store settings from the environment. The database path comes from the
/// command line (which itself falls back to `COURIER_DB_PATH`).
pub fn db_config(db_path: &Path) -> Result<DbConfig> {
    let defaults = HashParams::default();

    let busy_timeout_ms: u64 = env_or("COURIER_BUSY_TIMEOUT_MS", 5000)?;
    let hash_params = HashParams::new(
        env_or("COURIER_ARGON2_MEMORY_KIB", defaults.memory_kib)?,
        env_or("COURIER_ARGON2_ITERATIONS", defaults.iterations)?,
        env_or("COURIER_ARGON2_PARALLELISM", defaults.parallelism)?,
    );

    Ok(DbConfig::file(db_path)
        .with_busy_timeout(Duration::from_millis(busy_timeout_ms))
        .with_hash_params(hash_params))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}
