// SPDX-License-Identifier: GPL-3.0-only

//! `UDisksClient`: the entry point tying a property store to the drive and
//! block device operations.

use storage_types::{BlockDevice, Drive};

use crate::config::UDisksConfig;
use crate::dbus::DBusPropertyStore;
use crate::disk::{self, BlockDevices};
use crate::error::Result;
use crate::store::{CallOptions, PropertyStore};

impl From<&UDisksConfig> for CallOptions {
    fn from(config: &UDisksConfig) -> Self {
        Self {
            no_user_interaction: !config.allow_user_interaction,
        }
    }
}

/// Queries and drive teardown against one property store.
///
/// Nothing is cached; every call re-reads the service.
pub struct UDisksClient<S = DBusPropertyStore> {
    store: S,
    options: CallOptions,
}

impl UDisksClient<DBusPropertyStore> {
    /// Connect to UDisks2 on the system bus with default options.
    pub async fn new() -> Result<Self> {
        Self::connect(&UDisksConfig::default()).await
    }

    pub async fn connect(config: &UDisksConfig) -> Result<Self> {
        let store = DBusPropertyStore::connect(config.bus).await?;
        tracing::debug!("connected to UDisks2 on the {:?} bus", config.bus);
        Ok(Self::with_store(store, CallOptions::from(config)))
    }
}

impl<S: PropertyStore> UDisksClient<S> {
    pub fn with_store(store: S, options: CallOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn call_options(&self) -> &CallOptions {
        &self.options
    }

    pub async fn block_devices(&self) -> Result<BlockDevices> {
        disk::list_block_devices(&self.store).await
    }

    pub async fn drives(&self) -> Result<Vec<Drive>> {
        disk::drives(&self.store).await
    }

    pub async fn drive_by_id(&self, id: &str) -> Result<Drive> {
        disk::drive_by_id(&self.store, id).await
    }

    pub async fn build_drive(&self, drive_object: &str) -> Result<Drive> {
        disk::build_drive(&self.store, drive_object).await
    }

    pub async fn block_devices_on_drive(&self, drive_id: &str) -> Result<Vec<BlockDevice>> {
        disk::block_devices_on_drive(&self.store, drive_id).await
    }

    pub async fn power_off(&self, drive: &Drive) -> Result<()> {
        disk::power_off(&self.store, drive, &self.options).await
    }

    pub async fn unmount_block_device(&self, object: &str) -> Result<()> {
        disk::unmount_block_device(&self.store, object, &self.options).await
    }

    pub async fn lock_crypto_device(&self, object: &str) -> Result<()> {
        disk::lock_crypto_device(&self.store, object, &self.options).await
    }
}
