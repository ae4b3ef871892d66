//! Runtime settings, resolved once at startup from the environment.
//!
//! * `AUTOMATUP_DATA_DIR` - where the state database lives. Defaults to the
//!   platform data directory. `:memory:` keeps state in memory for the
//!   session only.
//! * `AUTOMATUP_NAMESPACE` - prefix for every stored key.

use std::env;
use std::path::PathBuf;

use anyhow::anyhow;
use directories::ProjectDirs;
use log::info;

use crate::app_data::DEFAULT_NAMESPACE;
use crate::error::Result;

pub const DATA_DIR_VAR: &str = "AUTOMATUP_DATA_DIR";
pub const NAMESPACE_VAR: &str = "AUTOMATUP_NAMESPACE";

const DB_DIR_NAME: &str = "dashboard-state";
const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Disk(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreLocation,
    pub namespace: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::resolve(env::var(DATA_DIR_VAR).ok(), env::var(NAMESPACE_VAR).ok())
    }

    fn resolve(
        data_dir: Option<String>, namespace: Option<String>,
    ) -> Result<Self> {
        let store = match data_dir.filter(|dir| !dir.trim().is_empty()) {
            Some(dir) if dir == IN_MEMORY => StoreLocation::Memory,
            Some(dir) => StoreLocation::Disk(PathBuf::from(dir).join(DB_DIR_NAME)),
            None => StoreLocation::Disk(
                ProjectDirs::from("com", "automatup", "dashboard")
                    .ok_or_else(|| anyhow!("No home directory to store state in"))?
                    .data_dir()
                    .join(DB_DIR_NAME),
            ),
        };

        let namespace = namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let settings = Settings { store, namespace };
        info!("Settings resolved: {:?}", settings);
        Ok(settings)
    }
}
