// SPDX-License-Identifier: GPL-3.0-only

//! Drive model
//!
//! A `Drive` is identified by its stable UDisks2 identifier (`id`), which is
//! unique among drives. It is built fresh on every query and never mutated.

use serde::{Deserialize, Serialize};

use crate::smart::{Ata, NvmeController};

/// Health reporting attached to a drive.
///
/// ATA SMART takes priority: a drive that reports ATA SMART support never
/// carries an NVMe snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "snapshot", rename_all = "snake_case")]
pub enum DriveHealth {
    #[default]
    None,
    Ata(Ata),
    Nvme(NvmeController),
}

impl DriveHealth {
    pub fn ata(&self) -> Option<&Ata> {
        match self {
            Self::Ata(ata) => Some(ata),
            _ => None,
        }
    }

    pub fn nvme(&self) -> Option<&NvmeController> {
        match self {
            Self::Nvme(nvme) => Some(nvme),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short label for the reporting subsystem ("ATA", "NVMe"), if any.
    pub fn kind_label(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Ata(_) => Some("ATA"),
            Self::Nvme(_) => Some("NVMe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Drive {
    /// UDisks2 object the drive was read from
    /// (e.g. "/org/freedesktop/UDisks2/drives/Samsung_SSD_970_S4EWNX0N")
    pub object_path: String,

    // === Identity ===
    /// Stable drive identifier (e.g. "Samsung-SSD-970-S4EWNX0N")
    pub id: String,
    pub vendor: String,
    pub model: String,
    pub serial: String,

    // === Topology ===
    /// Connection bus (e.g. "usb", "sdio", empty if unknown)
    pub connection_bus: String,
    pub seat: String,
    /// Shared by drives that are part of the same physical device
    pub sibling_id: String,

    // === Media ===
    pub removable: bool,
    pub media_removable: bool,
    pub media_available: bool,
    pub ejectable: bool,

    /// Size in bytes, 0 if no media
    pub size: u64,

    pub can_power_off: bool,

    #[serde(default)]
    pub health: DriveHealth,
}

impl Drive {
    /// Human-readable name: model, else vendor, else the identifier.
    pub fn display_name(&self) -> String {
        if !self.model.is_empty() {
            self.model.clone()
        } else if !self.vendor.is_empty() {
            format!("{} Drive", self.vendor)
        } else {
            self.id.clone()
        }
    }

    /// An object that does not exist reads back with an empty identifier.
    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}
