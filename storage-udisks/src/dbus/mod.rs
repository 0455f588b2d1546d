// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2 over D-Bus: names, wire helpers and the zbus-backed property store

pub mod bytestring;
mod proxies;
mod store;

pub use store::DBusPropertyStore;

pub const UDISKS2_SERVICE: &str = "org.freedesktop.UDisks2";
pub const DRIVES_PATH: &str = "/org/freedesktop/UDisks2/drives";

pub const BLOCK_INTERFACE: &str = "org.freedesktop.UDisks2.Block";
pub const DRIVE_INTERFACE: &str = "org.freedesktop.UDisks2.Drive";
pub const ATA_INTERFACE: &str = "org.freedesktop.UDisks2.Drive.Ata";
pub const NVME_CONTROLLER_INTERFACE: &str = "org.freedesktop.UDisks2.NVMe.Controller";
pub const ENCRYPTED_INTERFACE: &str = "org.freedesktop.UDisks2.Encrypted";
pub const FILESYSTEM_INTERFACE: &str = "org.freedesktop.UDisks2.Filesystem";

pub(crate) const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Whether `path` is a syntactically valid D-Bus object path.
pub fn is_valid_object_path(path: &str) -> bool {
    zbus::zvariant::ObjectPath::try_from(path).is_ok()
}
