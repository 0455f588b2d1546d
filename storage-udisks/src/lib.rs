// SPDX-License-Identifier: GPL-3.0-only

//! Drive and block device access over UDisks2, with safe drive power off.

pub mod client;
pub mod config;
pub mod dbus;
pub mod disk;
pub mod error;
pub mod smart;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export storage-types models
pub use storage_types;
pub use storage_types::{
    Ata, BlockDevice, CryptoBackingDevice, Drive, DriveHealth, Filesystem, NvmeController,
};

pub use client::UDisksClient;
pub use config::{BusKind, UDisksConfig};
pub use dbus::DBusPropertyStore;
pub use disk::{
    BlockDevices, block_devices_on_drive, build_drive, drive_by_id, drive_object_path, drives,
    list_block_devices, lock_crypto_device, power_off, unmount_block_device,
};
pub use error::{Result, UDisksError};
pub use store::{CallOptions, PropertyStore, PropertyValue};
