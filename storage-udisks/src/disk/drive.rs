// SPDX-License-Identifier: GPL-3.0-only

//! Drive objects and their health snapshots

use storage_types::{Drive, DriveHealth};

use crate::dbus::{ATA_INTERFACE, BLOCK_INTERFACE, DRIVE_INTERFACE, DRIVES_PATH};
use crate::error::{Result, UDisksError};
use crate::smart::{load_ata, load_nvme_controller};
use crate::store::{PropertyStore, read, read_object_ref, read_or_default};

/// Object path of the drive with the given stable identifier.
///
/// UDisks2 escapes `-` as `_` in drive object names.
pub fn drive_object_path(id: &str) -> String {
    format!("{}/{}", DRIVES_PATH, id.replace('-', "_"))
}

/// Build a drive from its object.
///
/// Descriptive fields that cannot be read are left empty. With ATA SMART
/// supported the ATA snapshot is loaded and any failure there is returned;
/// otherwise an NVMe controller snapshot is attached only if it loads
/// completely.
pub async fn build_drive<S>(store: &S, drive_object: &str) -> Result<Drive>
where
    S: PropertyStore + ?Sized,
{
    let o = drive_object;
    let i = DRIVE_INTERFACE;

    let mut drive = Drive {
        object_path: o.to_string(),
        id: read_or_default(store, o, i, "Id").await,
        vendor: read_or_default(store, o, i, "Vendor").await,
        model: read_or_default(store, o, i, "Model").await,
        serial: read_or_default(store, o, i, "Serial").await,
        connection_bus: read_or_default(store, o, i, "ConnectionBus").await,
        seat: read_or_default(store, o, i, "Seat").await,
        sibling_id: read_or_default(store, o, i, "SiblingId").await,
        removable: read_or_default(store, o, i, "Removable").await,
        media_removable: read_or_default(store, o, i, "MediaRemovable").await,
        media_available: read_or_default(store, o, i, "MediaAvailable").await,
        ejectable: read_or_default(store, o, i, "Ejectable").await,
        size: read_or_default(store, o, i, "Size").await,
        can_power_off: read_or_default(store, o, i, "CanPowerOff").await,
        health: DriveHealth::None,
    };

    let ata_supported = read::<bool, _>(store, o, ATA_INTERFACE, "SmartSupported")
        .await
        .unwrap_or(false);

    drive.health = if ata_supported {
        DriveHealth::Ata(load_ata(store, o).await?)
    } else {
        match load_nvme_controller(store, o).await {
            Ok(nvme) => DriveHealth::Nvme(nvme),
            Err(e) => {
                tracing::debug!("{}: no NVMe controller snapshot: {}", o, e);
                DriveHealth::None
            }
        }
    };

    Ok(drive)
}

/// Build the drive a block device points at through `Block.Drive`.
///
/// Fails with `InvalidDrive` when the reference is missing or names no
/// object, which is normal for locked containers and virtual devices.
pub async fn resolve_block_drive<S>(store: &S, block_object: &str) -> Result<Drive>
where
    S: PropertyStore + ?Sized,
{
    let drive_object = drive_ref(store, block_object)
        .await?
        .ok_or(UDisksError::InvalidDrive)?;
    build_drive(store, &drive_object).await
}

pub(crate) async fn drive_ref<S>(store: &S, block_object: &str) -> Result<Option<String>>
where
    S: PropertyStore + ?Sized,
{
    read_object_ref(store, block_object, BLOCK_INTERFACE, "Drive")
        .await
        .map_err(|e| {
            tracing::debug!("{}: could not read Block.Drive: {}", block_object, e);
            UDisksError::InvalidDrive
        })
}

/// Look a drive up by its stable identifier.
pub async fn drive_by_id<S>(store: &S, id: &str) -> Result<Drive>
where
    S: PropertyStore + ?Sized,
{
    let drive = build_drive(store, &drive_object_path(id)).await?;
    if !drive.exists() {
        return Err(UDisksError::DriveNotFound(id.to_string()));
    }
    Ok(drive)
}

/// Every drive the service knows about, in object path order.
///
/// The first drive that fails to build aborts the enumeration.
pub async fn drives<S>(store: &S) -> Result<Vec<Drive>>
where
    S: PropertyStore + ?Sized,
{
    let objects = store.drive_objects().await?;
    let mut drives = Vec::with_capacity(objects.len());
    for object in objects {
        drives.push(build_drive(store, &object).await?);
    }
    Ok(drives)
}
