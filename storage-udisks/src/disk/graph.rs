// SPDX-License-Identifier: GPL-3.0-only

//! Block device graph built from one enumeration of the service.

use std::collections::HashMap;

use storage_types::{BlockDevice, CryptoBackingDevice, Drive, Filesystem};

use super::drive::{build_drive, drive_ref};
use crate::dbus::bytestring::{decode_bytestring, decode_bytestring_list};
use crate::dbus::{
    BLOCK_INTERFACE, ENCRYPTED_INTERFACE, FILESYSTEM_INTERFACE, is_valid_object_path,
};
use crate::error::Result;
use crate::store::{
    PropertyStore, PropertyValue, is_no_object, read_object_ref, read_or_default, take,
};

/// Block devices in enumeration order, indexed by object path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockDevices {
    devices: Vec<BlockDevice>,
    by_device: HashMap<String, usize>,
}

impl BlockDevices {
    pub fn new(devices: Vec<BlockDevice>) -> Self {
        let mut by_device = HashMap::with_capacity(devices.len());
        for (idx, dev) in devices.iter().enumerate() {
            by_device.entry(dev.device.clone()).or_insert(idx);
        }
        Self { devices, by_device }
    }

    /// Exact, case-sensitive lookup by object path.
    pub fn by_device(&self, device: &str) -> Option<&BlockDevice> {
        self.by_device.get(device).map(|&idx| &self.devices[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockDevice> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn into_vec(self) -> Vec<BlockDevice> {
        self.devices
    }

    /// Identifier of the drive `block` lives on, following the crypto
    /// backing link for unlocked cleartext devices.
    pub fn owning_drive_id<'a>(&'a self, block: &'a BlockDevice) -> Option<&'a str> {
        match &block.crypto_backing_device {
            Some(backing) => self.by_device(&backing.path)?.drive_id(),
            None => block.drive_id(),
        }
    }
}

impl IntoIterator for BlockDevices {
    type Item = BlockDevice;
    type IntoIter = std::vec::IntoIter<BlockDevice>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.into_iter()
    }
}

impl<'a> IntoIterator for &'a BlockDevices {
    type Item = &'a BlockDevice;
    type IntoIter = std::slice::Iter<'a, BlockDevice>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

/// Enumerate every block device and resolve its drive, crypto backing and
/// filesystem.
///
/// A failing enumeration call or a drive that fails to build is an error;
/// other unreadable fields are left empty. Drives shared by several block
/// devices are built once per call.
pub async fn list_block_devices<S>(store: &S) -> Result<BlockDevices>
where
    S: PropertyStore + ?Sized,
{
    let objects = store.block_devices().await?;
    tracing::debug!("enumerated {} block devices", objects.len());

    let mut drives: HashMap<String, Drive> = HashMap::new();
    let mut devices = Vec::with_capacity(objects.len());
    for object in &objects {
        devices.push(load_block_device(store, object, &mut drives).await?);
    }

    Ok(BlockDevices::new(devices))
}

async fn load_block_device<S>(
    store: &S,
    object: &str,
    drives: &mut HashMap<String, Drive>,
) -> Result<BlockDevice>
where
    S: PropertyStore + ?Sized,
{
    let i = BLOCK_INTERFACE;
    let symlinks: Vec<Vec<u8>> = read_or_default(store, object, i, "Symlinks").await;

    Ok(BlockDevice {
        device: object.to_string(),
        device_file: device_file(store, object).await,
        uuid: read_or_default(store, object, i, "IdUUID").await,
        id: read_or_default(store, object, i, "Id").await,
        id_usage: read_or_default(store, object, i, "IdUsage").await,
        id_label: read_or_default(store, object, i, "IdLabel").await,
        id_type: read_or_default(store, object, i, "IdType").await,
        size: read_or_default(store, object, i, "Size").await,
        symlinks: decode_bytestring_list(&symlinks),
        crypto_backing_device: crypto_backing_device(store, object).await,
        drive: owning_drive(store, object, drives).await?,
        filesystems: filesystem(store, object).await.into_iter().collect(),
    })
}

async fn device_file<S>(store: &S, object: &str) -> String
where
    S: PropertyStore + ?Sized,
{
    let preferred: Vec<u8> =
        read_or_default(store, object, BLOCK_INTERFACE, "PreferredDevice").await;
    let preferred = decode_bytestring(&preferred);
    if !preferred.is_empty() {
        return preferred;
    }
    let device: Vec<u8> = read_or_default(store, object, BLOCK_INTERFACE, "Device").await;
    decode_bytestring(&device)
}

async fn crypto_backing_device<S>(store: &S, object: &str) -> Option<CryptoBackingDevice>
where
    S: PropertyStore + ?Sized,
{
    let path = match read_object_ref(store, object, BLOCK_INTERFACE, "CryptoBackingDevice").await {
        Ok(Some(path)) => path,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!("{}: no crypto backing device: {}", object, e);
            return None;
        }
    };

    let mut props = match store.all_properties(&path, ENCRYPTED_INTERFACE).await {
        Ok(props) if !props.is_empty() => props,
        Ok(_) => return None,
        Err(e) => {
            tracing::warn!("{}: backing device {} is not readable: {}", object, path, e);
            return None;
        }
    };

    let cleartext_device_path = match props.remove("CleartextDevice") {
        Some(PropertyValue::ObjectPath(p)) if is_valid_object_path(&p) && !is_no_object(&p) => p,
        _ => String::new(),
    };
    let hint_encryption_type = take(&mut props, ENCRYPTED_INTERFACE, "HintEncryptionType")
        .unwrap_or_else(|e| {
            tracing::debug!("{}: {}", path, e);
            String::new()
        });
    let metadata_size = take(&mut props, ENCRYPTED_INTERFACE, "MetadataSize").unwrap_or_else(|e| {
        tracing::debug!("{}: {}", path, e);
        0
    });

    Some(CryptoBackingDevice {
        path,
        cleartext_device_path,
        hint_encryption_type,
        metadata_size,
    })
}

async fn owning_drive<S>(
    store: &S,
    object: &str,
    drives: &mut HashMap<String, Drive>,
) -> Result<Option<Drive>>
where
    S: PropertyStore + ?Sized,
{
    // No reference, or "/": not attached to a drive.
    let Some(drive_object) = drive_ref(store, object).await.ok().flatten() else {
        return Ok(None);
    };

    if let Some(cached) = drives.get(&drive_object) {
        return Ok(Some(cached.clone()));
    }

    let drive = build_drive(store, &drive_object).await.inspect_err(|e| {
        tracing::warn!("{}: could not build drive {}: {}", object, drive_object, e);
    })?;
    drives.insert(drive_object, drive.clone());
    Ok(Some(drive))
}

async fn filesystem<S>(store: &S, object: &str) -> Option<Filesystem>
where
    S: PropertyStore + ?Sized,
{
    let mut props = match store.all_properties(object, FILESYSTEM_INTERFACE).await {
        Ok(props) if !props.is_empty() => props,
        _ => return None,
    };

    let mount_points: Vec<Vec<u8>> = take(&mut props, FILESYSTEM_INTERFACE, "MountPoints")
        .unwrap_or_else(|e| {
            tracing::debug!("{}: {}", object, e);
            Vec::new()
        });
    let size = take(&mut props, FILESYSTEM_INTERFACE, "Size").unwrap_or_else(|e| {
        tracing::debug!("{}: {}", object, e);
        0
    });

    Some(Filesystem {
        mount_points: decode_bytestring_list(&mount_points),
        size,
    })
}
