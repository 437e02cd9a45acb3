//! String-keyed blob storage behind the gamification engine.
//!
//! Writers go through [`KeyValueStore::compare_and_swap`] when they need a
//! read-modify-write cycle. Plain [`KeyValueStore::set_item`] is last write
//! wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

pub const PROGRESS_KEY_PREFIX: &str = "futuropal_progress_";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;

    /// Writes `new` only if the current value equals `expected` (`None` meaning
    /// absent). Returns whether the write happened.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError>;
}

pub fn progress_key(user_id: &str) -> String {
    format!("{PROGRESS_KEY_PREFIX}{user_id}")
}
