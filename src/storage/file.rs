use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{KeyValueStore, StorageError};

const EXTENSION: &str = "json";

/// One file per key inside a directory.
///
/// Writes are atomic per file (temp file + rename). `compare_and_swap` is
/// serialised by an in-process lock only, so a directory must have a single
/// writer process.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{EXTENSION}", file_stem(key))))
    }

    fn read(&self, path: &Path) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, path: &Path, value: &str) -> Result<(), StorageError> {
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9_-]`. `%` is itself
/// escaped, so distinct keys never share a file and no key can name a path
/// outside the store directory.
fn file_stem(key: &str) -> String {
    urlencoding::encode(key).replace('.', "%2E").replace('~', "%7E")
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        self.read(&path)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock();
        self.write(&path, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock();
        if self.read(&path)?.as_deref() != expected {
            return Ok(false);
        }
        self.write(&path, new)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get_item("futuropal_progress_a").unwrap(), None);
        store.set_item("futuropal_progress_a", "{}").unwrap();
        assert_eq!(store.get_item("futuropal_progress_a").unwrap().as_deref(), Some("{}"));
        assert!(dir.path().join("futuropal_progress_a.json").exists());
    }

    #[test]
    fn test_only_empty_key_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(store.get_item(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.set_item("", "x"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_path_separators_stay_inside_dir() {
        let outer = tempfile::tempdir().unwrap();
        let inner = outer.path().join("store");
        let store = FileStore::open(&inner).unwrap();
        store.set_item("../escape", "x").unwrap();
        store.set_item("a/b\\c", "y").unwrap();
        assert!(!outer.path().join("escape.json").exists());
        assert_eq!(std::fs::read_dir(outer.path()).unwrap().count(), 1);
        assert_eq!(std::fs::read_dir(&inner).unwrap().count(), 2);
        assert_eq!(store.get_item("../escape").unwrap().as_deref(), Some("x"));
        assert_eq!(store.get_item("a/b\\c").unwrap().as_deref(), Some("y"));
    }

    #[test]
    fn test_file_stems_are_one_to_one() {
        assert_eq!(file_stem("futuropal_progress_a-1"), "futuropal_progress_a-1");
        assert_eq!(file_stem("jane doe"), "jane%20doe");
        assert_eq!(file_stem("a+b@x.com"), "a%2Bb%40x%2Ecom");
        assert_eq!(file_stem("José"), "Jos%C3%A9");
        assert_ne!(file_stem("a b"), file_stem("a%20b"));
        assert_ne!(file_stem("a.b"), file_stem("a%2Eb"));
        assert_eq!(file_stem(".."), "%2E%2E");
    }

    #[test]
    fn test_distinct_keys_keep_distinct_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set_item("a b", "1").unwrap();
        store.set_item("a%20b", "2").unwrap();
        store.set_item("a_b", "3").unwrap();
        assert_eq!(store.get_item("a b").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get_item("a%20b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get_item("a_b").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();
        store.remove_item("a").unwrap();
        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a").unwrap(), None);
        store.clear().unwrap();
        assert_eq!(store.get_item("b").unwrap(), None);
    }

    #[test]
    fn test_compare_and_swap() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.compare_and_swap("k", None, "1").unwrap());
        assert!(!store.compare_and_swap("k", Some("0"), "2").unwrap());
        assert!(store.compare_and_swap("k", Some("1"), "2").unwrap());
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("2"));
    }
}
