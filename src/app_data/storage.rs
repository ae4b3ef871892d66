//! Namespaced JSON access over a raw key-value backend.
//!
//! Reads are fail-soft: a backend error or a record that does not decode into
//! the requested type is logged and reported as absent. Writes report failures
//! through `StoreResult` so callers decide whether a lost write matters.

use log::{error, info, warn};
use serde::{de::DeserializeOwned, Serialize};

use super::kv_db::KvDbOps;
use super::schemas::{SchemaType, RECORD_KEYS};
use crate::error::{StoreError, StoreResult};

/// Prefix applied to every key unless a namespace is given explicitly.
pub const DEFAULT_NAMESPACE: &str = "automatup_";

pub struct StorageGateway<Db> {
    db: Db,
    namespace: String,
}

impl<Db> StorageGateway<Db>
where
    Db: KvDbOps,
{
    #[cfg(test)]
    pub fn new(db: Db) -> Self {
        Self::with_namespace(db, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(db: Db, namespace: &str) -> Self {
        Self { db, namespace: namespace.to_string() }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    /// Reads and decodes the value stored under `key`.
    ///
    /// Returns `None` when the key is absent, when the backend fails, or when
    /// the stored text does not decode into `T`.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let full_key = self.full_key(key);

        let data = match self.db.get_raw(&full_key) {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(source) => {
                let err = StoreError::Backend { key: full_key, source };
                error!("Error reading from storage: {}", err);
                return None;
            }
        };

        match serde_json::from_slice::<T>(&data) {
            Ok(value) => Some(value),
            Err(source) => {
                let err = StoreError::Decode { key: full_key, source };
                error!("Error reading from storage: {}", err);
                None
            }
        }
    }

    /// Encodes `value` as JSON and stores it under `key`.
    pub fn set<T>(&self, key: &str, value: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let full_key = self.full_key(key);

        let data = serde_json::to_vec(value).map_err(|source| {
            let err = StoreError::Encode { key: full_key.clone(), source };
            error!("Error writing to storage: {}", err);
            err
        })?;

        self.db.set_raw(&full_key, &data).map_err(|source| {
            let err = StoreError::Backend { key: full_key.clone(), source };
            error!("Error writing to storage: {}", err);
            err
        })
    }

    pub fn remove(&self, key: &str) -> StoreResult<()> {
        let full_key = self.full_key(key);
        self.db.remove_raw(&full_key).map_err(|source| {
            let err = StoreError::Backend { key: full_key.clone(), source };
            error!("Error removing from storage: {}", err);
            err
        })
    }

    pub fn load<T>(&self) -> Option<T>
    where
        T: DeserializeOwned + SchemaType,
    {
        self.get(T::STORAGE_KEY)
    }

    pub fn store<T>(&self, value: &T) -> StoreResult<()>
    where
        T: Serialize + SchemaType,
    {
        self.set(T::STORAGE_KEY, value)
    }

    /// Removes every dashboard record stored under this gateway's namespace.
    /// Keys outside `RECORD_KEYS` are left as they are.
    pub fn clear(&self) -> StoreResult<()> {
        for key in RECORD_KEYS {
            if let Err(e) = self.remove(key) {
                warn!("Stopped clearing namespace {}: {}", self.namespace, e);
                return Err(e);
            }
        }

        info!("Cleared records from namespace: {}", self.namespace);
        Ok(())
    }
}
