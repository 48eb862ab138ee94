//! Client-held session state.
//!
//! The store holds at most one value per [`StoreKey`]. Writes replace the whole
//! value; reads return the last value written or nothing.

use crate::error::{StoreError, StoreResult};
use crate::models::{Draft, QrRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Draft,
    QrRecord,
    User,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Draft => "draft",
            StoreKey::QrRecord => "qr_record",
            StoreKey::User => "user",
        }
    }
}

pub trait SessionStore: Send + Sync {
    fn get(&self, key: StoreKey) -> StoreResult<Option<String>>;

    fn set(&self, key: StoreKey, value: &str) -> StoreResult<()>;

    fn clear(&self, key: StoreKey) -> StoreResult<()>;

    /// Writes `value` under `set` and removes `clear` as a single step.
    fn replace(&self, set: StoreKey, value: &str, clear: StoreKey) -> StoreResult<()>;
}

/// Typed access on top of the raw string slots.
pub trait SessionStoreExt: SessionStore {
    /// Values that no longer decode are reported as absent.
    fn load<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(
                    key = key.as_str(),
                    error = %err,
                    "discarding undecodable stored value"
                );
                Ok(None)
            }
        }
    }

    fn save<T: Serialize>(&self, key: StoreKey, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }

    fn draft(&self) -> StoreResult<Option<Draft>> {
        self.load(StoreKey::Draft)
    }

    fn receipt(&self) -> StoreResult<Option<QrRecord>> {
        self.load(StoreKey::QrRecord)
    }

    /// Stores the receipt and drops the draft it was issued for.
    fn settle(&self, receipt: &QrRecord) -> StoreResult<()> {
        let raw = serde_json::to_string(receipt)?;
        self.replace(StoreKey::QrRecord, &raw, StoreKey::Draft)
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

/// In-process store, used when nothing has to survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<StoreKey, String>>> {
        self.values
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: StoreKey) -> StoreResult<Option<String>> {
        Ok(self.values()?.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) -> StoreResult<()> {
        self.values()?.insert(key, value.to_string());
        Ok(())
    }

    fn clear(&self, key: StoreKey) -> StoreResult<()> {
        self.values()?.remove(&key);
        Ok(())
    }

    fn replace(&self, set: StoreKey, value: &str, clear: StoreKey) -> StoreResult<()> {
        let mut values = self.values()?;
        values.insert(set, value.to_string());
        values.remove(&clear);
        Ok(())
    }
}
