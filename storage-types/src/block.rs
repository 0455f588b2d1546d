// SPDX-License-Identifier: GPL-3.0-only

//! Block device models
//!
//! A `BlockDevice` either points at its `Drive` directly, or sits on top of
//! an encrypted container (`CryptoBackingDevice`) whose own block device
//! carries the drive. Resolving ownership through the second link is the
//! caller's job; these types only hold what the service reported.

use serde::{Deserialize, Serialize};

use crate::drive::Drive;

/// Mount state of a block device (`org.freedesktop.UDisks2.Filesystem`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filesystem {
    /// Mount points, in the order the service reports them
    pub mount_points: Vec<String>,

    /// Filesystem size in bytes, 0 if unknown
    pub size: u64,
}

impl Filesystem {
    pub fn is_mounted(&self) -> bool {
        !self.mount_points.is_empty()
    }
}

/// Link from a cleartext device to the encrypted container it was unlocked from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CryptoBackingDevice {
    /// Object path of the encrypted (backing) block device
    pub path: String,

    /// Object path of the cleartext device, empty while the container is locked
    pub cleartext_device_path: String,

    /// Encryption type hint, e.g. "LUKS2"
    pub hint_encryption_type: String,

    pub metadata_size: u64,
}

impl CryptoBackingDevice {
    pub fn is_unlocked(&self) -> bool {
        !self.cleartext_device_path.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockDevice {
    /// UDisks2 object path (e.g. "/org/freedesktop/UDisks2/block_devices/sda1").
    /// Lookups by device compare against this value exactly.
    pub device: String,

    /// Device node (e.g. "/dev/sda1"), empty if not reported
    #[serde(default)]
    pub device_file: String,

    pub uuid: String,

    /// Stable block identifier (e.g. "by-id-ata-...-part1")
    pub id: String,

    /// Usage class: "filesystem", "crypto", "raid", "other" or empty
    pub id_usage: String,
    pub id_label: String,

    /// Detected content type (e.g. "ext4", "crypto_LUKS")
    pub id_type: String,

    #[serde(default)]
    pub size: u64,

    /// Owning drive; absent for devices without a direct drive link
    /// (cleartext devices, loop devices, ...)
    pub drive: Option<Drive>,

    /// Zero or one record
    pub filesystems: Vec<Filesystem>,

    pub symlinks: Vec<String>,

    pub crypto_backing_device: Option<CryptoBackingDevice>,
}

impl BlockDevice {
    pub fn is_mounted(&self) -> bool {
        self.filesystems.iter().any(Filesystem::is_mounted)
    }

    pub fn has_filesystem(&self) -> bool {
        !self.filesystems.is_empty()
    }

    /// Identifier of the directly attached drive, if any.
    pub fn drive_id(&self) -> Option<&str> {
        self.drive.as_ref().map(|d| d.id.as_str())
    }

    pub fn is_crypto_container(&self) -> bool {
        self.id_usage == "crypto"
    }

    pub fn mount_points(&self) -> impl Iterator<Item = &str> {
        self.filesystems
            .iter()
            .flat_map(|fs| fs.mount_points.iter().map(String::as_str))
    }
}
