//! This module defines the `AppStateStore` trait and the `AppState` struct, the single
//! context object the rest of the dashboard reads and updates state through. It covers
//! the monitoring configuration, the user profile, the camera inventory, the event
//! board and the master taxonomy lists.

pub mod kv_db;
mod schemas;
mod storage;

use anyhow::anyhow;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};

pub use kv_db::{DiskBasedDb, KvDbOps, MemoryDb};
pub use schemas::{
    AppConfig, AppConfigPatch, BillingInfo, BusinessInfo, Camera, CameraId,
    CameraList, CameraStatus, Event, EventId, EventList, MasterCategory,
    MasterData, NewCamera, Rules, SchemaType, Severity, UserInfo, UserProfile,
    UserProfilePatch,
};
pub use storage::{StorageGateway, DEFAULT_NAMESPACE};

use crate::error::Result;
use crate::mock_data;

#[cfg(test)]
use mockall::automock;

/// A trait that defines the operations for reading and updating dashboard state.
#[cfg_attr(test, automock)]
pub trait AppStateStore: Send + Sync + 'static {
    /// Returns the monitoring configuration, recreating the default if absent.
    fn config(&self) -> AppConfig;

    /// Shallow-merges `patch` into the stored configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged record cannot be written.
    fn update_config(&mut self, patch: AppConfigPatch) -> Result<AppConfig>;

    /// Returns the user profile, recreating the default if absent.
    fn profile(&self) -> UserProfile;

    /// Merges `patch` at the top level; included groups replace stored ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged record cannot be written.
    fn update_profile(&mut self, patch: UserProfilePatch)
        -> Result<UserProfile>;

    fn cameras(&self) -> Vec<Camera>;

    fn camera(&self, id: CameraId) -> Option<Camera>;

    /// Appends a camera with id `max(existing ids, 0) + 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated inventory cannot be written.
    fn add_camera(&mut self, camera: NewCamera) -> Result<Camera>;

    fn events(&self) -> Vec<Event>;

    fn event(&self, id: EventId) -> Option<Event>;

    fn pinned_events(&self) -> Vec<Event>;

    /// Flips the pinned flag of event `id`.
    ///
    /// Returns `Ok(None)` without writing anything when no event has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated event list cannot be written.
    fn toggle_event_pin(&mut self, id: EventId) -> Result<Option<Event>>;

    /// Returns the taxonomy lists, recreating the default if absent.
    fn master_data(&self) -> MasterData;

    /// Replaces the whole label list of `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated master data cannot be written.
    fn update_master_data(
        &mut self, category: MasterCategory, items: Vec<String>,
    ) -> Result<()>;

    /// Removes every record in the namespace and seeds fresh defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace cannot be cleared.
    fn reset(&mut self) -> Result<()>;
}

/// A struct that holds the dashboard state on top of a storage gateway.
pub struct AppState<Db> {
    storage: StorageGateway<Db>,
}

impl<Db> AppState<Db>
where
    Db: KvDbOps,
{
    /// Creates a new `AppState`, seeding every record missing from storage.
    pub fn new(storage: StorageGateway<Db>) -> Self {
        Self::with_rng(storage, &mut rand::rng())
    }

    /// Same as `new`, with the random source used for the event batch.
    pub fn with_rng<R: Rng + ?Sized>(
        storage: StorageGateway<Db>, rng: &mut R,
    ) -> Self {
        let state = AppState { storage };
        state.init(rng, Local::now().date_naive());
        state
    }

    /// Same as `reset`, with the random source used for the event batch.
    pub fn reset_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        info!("Resetting state in namespace: {}", self.storage.namespace());
        self.storage.clear()?;
        self.init(rng, Local::now().date_naive());
        Ok(())
    }

    fn init<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) {
        self.load_or_seed(mock_data::default_config);
        self.load_or_seed(mock_data::default_profile);
        self.load_or_seed(|| CameraList(mock_data::default_cameras()));
        self.load_or_seed(|| {
            EventList(mock_data::generate_events(rng, today))
        });
        self.load_or_seed(mock_data::default_master_data);
    }

    /// Returns the stored `T`, or writes and returns `default()` when no
    /// decodable `T` is stored. Best effort: a failed write is logged and the
    /// default is still returned.
    fn load_or_seed<T>(&self, default: impl FnOnce() -> T) -> T
    where
        T: Serialize + DeserializeOwned + SchemaType,
    {
        if let Some(value) = self.storage.load::<T>() {
            return value;
        }

        info!("{} not found in storage. Writing default.", T::STORAGE_KEY);
        let value = default();
        if let Err(e) = self.storage.store(&value) {
            warn!("Failed to seed {}: {}", T::STORAGE_KEY, e);
        }
        value
    }

    fn camera_list(&self) -> CameraList {
        self.storage.load().unwrap_or_default()
    }

    fn event_list(&self) -> EventList {
        self.storage.load().unwrap_or_default()
    }
}

impl<Db> AppStateStore for AppState<Db>
where
    Db: KvDbOps,
{
    fn config(&self) -> AppConfig {
        self.load_or_seed(mock_data::default_config)
    }

    fn update_config(&mut self, patch: AppConfigPatch) -> Result<AppConfig> {
        let mut config = self.config();
        config.merge(patch);
        self.storage.store(&config)?;
        info!("Config updated.");
        Ok(config)
    }

    fn profile(&self) -> UserProfile {
        self.load_or_seed(mock_data::default_profile)
    }

    fn update_profile(
        &mut self, patch: UserProfilePatch,
    ) -> Result<UserProfile> {
        let mut profile = self.profile();
        profile.merge(patch);
        self.storage.store(&profile)?;
        info!("Profile updated.");
        Ok(profile)
    }

    fn cameras(&self) -> Vec<Camera> {
        self.camera_list().0
    }

    fn camera(&self, id: CameraId) -> Option<Camera> {
        self.camera_list().0.into_iter().find(|camera| camera.id == id)
    }

    fn add_camera(&mut self, camera: NewCamera) -> Result<Camera> {
        let mut cameras = self.camera_list();
        let id = cameras
            .next_id()
            .ok_or_else(|| anyhow!("No camera id left after {}", CameraId::MAX))?;
        let camera = camera.with_id(id);
        cameras.0.push(camera.clone());
        self.storage.store(&cameras)?;
        info!("Camera {} added with id {}.", camera.name, camera.id);
        Ok(camera)
    }

    fn events(&self) -> Vec<Event> {
        self.event_list().0
    }

    fn event(&self, id: EventId) -> Option<Event> {
        self.event_list().0.into_iter().find(|event| event.id == id)
    }

    fn pinned_events(&self) -> Vec<Event> {
        self.event_list().0.into_iter().filter(|event| event.pinned).collect()
    }

    fn toggle_event_pin(&mut self, id: EventId) -> Result<Option<Event>> {
        let mut events = self.event_list();

        let Some(event) = events.0.iter_mut().find(|event| event.id == id)
        else {
            info!("Event {} not found, nothing to toggle.", id);
            return Ok(None);
        };

        event.pinned = !event.pinned;
        let toggled = event.clone();
        self.storage.store(&events)?;
        info!("Event {} pinned: {}.", id, toggled.pinned);
        Ok(Some(toggled))
    }

    fn master_data(&self) -> MasterData {
        self.load_or_seed(mock_data::default_master_data)
    }

    fn update_master_data(
        &mut self, category: MasterCategory, items: Vec<String>,
    ) -> Result<()> {
        let mut master = self.master_data();
        master.replace(category, items);
        self.storage.store(&master)?;
        info!("Master data category {} replaced.", category);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.reset_with_rng(&mut rand::rng())
    }
}
