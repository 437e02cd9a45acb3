#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use futuropal_engine::gamification::FixedClock;
use futuropal_engine::storage::{KeyValueStore, MemoryStore, StorageError};
use futuropal_engine::GamificationEngine;

pub fn noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn engine_at(store: Arc<dyn KeyValueStore>, now: NaiveDateTime) -> GamificationEngine {
    GamificationEngine::with_clock(store, Arc::new(FixedClock(now)))
}

pub fn memory_engine() -> (Arc<MemoryStore>, GamificationEngine) {
    let store = Arc::new(MemoryStore::new());
    let engine = engine_at(store.clone(), noon(2024, 3, 1));
    (store, engine)
}

/// Every call fails, like browser storage with quota or privacy errors.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn compare_and_swap(
        &self,
        _key: &str,
        _expected: Option<&str>,
        _new: &str,
    ) -> Result<bool, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }
}
