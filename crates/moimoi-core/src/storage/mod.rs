mod config;
pub mod database;
mod memory;

pub use config::{Config, HappinessConfig, RewardsConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StoreError;

/// String-keyed persistence backend.
///
/// Values are UTF-8 text: decimal strings for integers, ISO dates for days,
/// JSON for structured values. No transactional guarantee is assumed.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys starting with `prefix`, in ascending order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).keys_with_prefix(prefix)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `MOIMOI_DATA_DIR` overrides the location outright. Otherwise the
/// directory is `~/.config/moimoi[-dev]/`, with `MOIMOI_ENV=dev` selecting
/// the development variant.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("MOIMOI_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MOIMOI_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("moimoi-dev")
            } else {
                base_dir.join("moimoi")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
