use std::path::PathBuf;

const DEFAULT_USER_ID: &str = "local";
const STORAGE_SUBDIR: &str = "futuropal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub user_id: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        let storage = match std::env::var("FUTUROPAL_STORAGE_DIR") {
            Ok(value) if value.eq_ignore_ascii_case("memory") => StorageBackend::Memory,
            Ok(value) if !value.trim().is_empty() => StorageBackend::File(PathBuf::from(value)),
            _ => dirs::data_dir()
                .map(|dir| StorageBackend::File(dir.join(STORAGE_SUBDIR)))
                .unwrap_or(StorageBackend::Memory),
        };

        let user_id = std::env::var("FUTUROPAL_USER_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            storage,
            user_id,
            log_level,
        }
    }
}
