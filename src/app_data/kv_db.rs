//! This module provides the raw key-value backends the dashboard state lives in.
//!
//! The backends know nothing about namespaces or JSON: they move opaque byte
//! blobs under string keys. Namespacing and encoding live one level up, in the
//! storage gateway.
//!
//! # Traits
//!
//! - `KvDbOps`: Defines operations for a key-value backend.
//!
//! # Structs
//!
//! - `DiskBasedDb`: A `sled` database on disk, survives restarts.
//! - `MemoryDb`: A map held in memory, used for ephemeral sessions and tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::app_data::kv_db::{DiskBasedDb, KvDbOps};
//!
//! fn main() -> anyhow::Result<()> {
//!     let db = DiskBasedDb::open_from("my_db_path")?;
//!     db.set_raw("automatup_cameras", b"[]")?;
//!     if let Some(data) = db.get_raw("automatup_cameras")? {
//!         println!("Read {} bytes", data.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use log::{debug, info};

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

/// A trait defining operations for a key-value backend.
#[cfg_attr(test, automock)]
pub trait KvDbOps: Send + Sync + 'static {
    /// Reads the bytes stored under `key`.
    ///
    /// # Returns
    ///
    /// An `Option` containing the bytes if found, or `None` if not found.
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `data` under `key`, replacing any previous value.
    fn set_raw(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_raw(&self, key: &str) -> Result<()>;
}

/// Lets several gateways share one backend.
impl<Db: KvDbOps> KvDbOps for Arc<Db> {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.as_ref().get_raw(key)
    }

    fn set_raw(&self, key: &str, data: &[u8]) -> Result<()> {
        self.as_ref().set_raw(key, data)
    }

    fn remove_raw(&self, key: &str) -> Result<()> {
        self.as_ref().remove_raw(key)
    }
}

/// A struct representing a disk-based key-value database.
pub struct DiskBasedDb {
    db: sled::Db,
}

impl DiskBasedDb {
    /// Opens a disk-based database from the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the path where the database is located.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `DiskBasedDb` instance if successful.
    pub fn open_from<P: AsRef<Path>>(path: P) -> Result<DiskBasedDb> {
        let db = sled::open(path)?;
        info!("Database opened");
        Ok(DiskBasedDb { db })
    }
}

impl KvDbOps for DiskBasedDb {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let data = self.db.get(key)?;
        debug!("Read key: {} (found: {})", key, data.is_some());
        Ok(data.map(|ivec| ivec.to_vec()))
    }

    fn set_raw(&self, key: &str, data: &[u8]) -> Result<()> {
        self.db.insert(key, data)?;
        self.db.flush()?;
        debug!("Stored {} bytes under key: {}", data.len(), key);
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<()> {
        self.db.remove(key)?;
        self.db.flush()?;
        debug!("Removed key: {}", key);
        Ok(())
    }
}

/// A key-value backend kept in process memory.
#[derive(Default)]
pub struct MemoryDb {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self, f: impl FnOnce(&mut BTreeMap<String, Vec<u8>>) -> T,
    ) -> Result<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| anyhow!("Memory store lock poisoned: {}", e))?;
        Ok(f(&mut entries))
    }
}

impl KvDbOps for MemoryDb {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, data: &[u8]) -> Result<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), data.to_vec());
        })
    }

    fn remove_raw(&self, key: &str) -> Result<()> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}
