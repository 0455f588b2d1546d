// SPDX-License-Identifier: GPL-3.0-only

//! Drive teardown and power off

use storage_types::{BlockDevice, Drive};

use super::drive::drive_object_path;
use super::graph::{BlockDevices, list_block_devices};
use crate::error::{Result, UDisksError};
use crate::store::{CallOptions, PropertyStore};

/// How a block device belongs to a drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership<'a> {
    /// Unlocked cleartext device whose backing container lives on the drive.
    CryptoLayered { container: &'a str },
    /// Device that references the drive itself.
    Direct,
}

/// Classify `block` against the drive with identifier `drive_id`.
///
/// Returns `None` for devices on other drives, locked cleartext records
/// and devices whose backing container is not in `blocks`.
pub fn classify<'a>(
    blocks: &'a BlockDevices,
    block: &'a BlockDevice,
    drive_id: &str,
) -> Option<Ownership<'a>> {
    if drive_id.is_empty() {
        return None;
    }

    match &block.crypto_backing_device {
        Some(backing) => {
            if !backing.is_unlocked() {
                return None;
            }
            let container = blocks.by_device(&backing.path)?;
            (container.drive_id() == Some(drive_id)).then_some(Ownership::CryptoLayered {
                container: backing.path.as_str(),
            })
        }
        None => (block.drive_id() == Some(drive_id)).then_some(Ownership::Direct),
    }
}

/// Every block device on the drive with identifier `drive_id`, directly or
/// through an unlocked encryption layer, in enumeration order.
pub async fn block_devices_on_drive<S>(store: &S, drive_id: &str) -> Result<Vec<BlockDevice>>
where
    S: PropertyStore + ?Sized,
{
    let blocks = list_block_devices(store).await?;
    Ok(blocks
        .iter()
        .filter(|b| classify(&blocks, b, drive_id).is_some())
        .cloned()
        .collect())
}

/// Unmount the filesystem on a block device object.
pub async fn unmount_block_device<S>(store: &S, object: &str, options: &CallOptions) -> Result<()>
where
    S: PropertyStore + ?Sized,
{
    tracing::info!("unmounting {}", object);
    store.unmount(object, options).await.inspect_err(|e| {
        tracing::warn!("unmount of {} failed: {}", object, e);
    })
}

/// Lock an encrypted container object.
pub async fn lock_crypto_device<S>(store: &S, object: &str, options: &CallOptions) -> Result<()>
where
    S: PropertyStore + ?Sized,
{
    tracing::info!("locking {}", object);
    store.lock(object, options).await.inspect_err(|e| {
        tracing::warn!("lock of {} failed: {}", object, e);
    })
}

/// Unmount and lock everything on `drive`, then power it off.
///
/// Stops at the first failing step. Steps already done are not undone, so
/// a retry simply skips devices that are no longer mounted or unlocked.
pub async fn power_off<S>(store: &S, drive: &Drive, options: &CallOptions) -> Result<()>
where
    S: PropertyStore + ?Sized,
{
    if !drive.can_power_off {
        return Err(UDisksError::PowerOffNotSupported(drive.id.clone()));
    }

    let blocks = list_block_devices(store).await?;

    for block in &blocks {
        match classify(&blocks, block, &drive.id) {
            Some(Ownership::CryptoLayered { container }) => {
                if block.is_mounted() {
                    unmount_block_device(store, &block.device, options)
                        .await
                        .map_err(|e| UDisksError::unmount_failed(&block.device, e))?;
                }
                lock_crypto_device(store, container, options)
                    .await
                    .map_err(|e| UDisksError::locking_failed(container, e))?;
            }
            Some(Ownership::Direct) => {
                if block.is_mounted() {
                    unmount_block_device(store, &block.device, options)
                        .await
                        .map_err(|e| UDisksError::unmount_failed(&block.device, e))?;
                }
            }
            None => {}
        }
    }

    let object = if drive.object_path.is_empty() {
        drive_object_path(&drive.id)
    } else {
        drive.object_path.clone()
    };
    tracing::info!("powering off drive {} ({})", drive.id, object);
    store.power_off(&object, options).await
}
