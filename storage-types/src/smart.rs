// SPDX-License-Identifier: GPL-3.0-only

//! Point-in-time health snapshots
//!
//! A snapshot is copied off the drive object once, when the `Drive` is built.
//! Rebuild the drive to observe fresh values.

use serde::{Deserialize, Serialize};

use crate::common::kelvin_to_celsius;

/// ATA SMART state of a drive (`org.freedesktop.UDisks2.Drive.Ata`)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ata {
    pub smart_supported: bool,
    pub smart_enabled: bool,
    /// Seconds since the epoch of the last SMART refresh, 0 if never.
    pub smart_updated: u64,
    pub smart_failing: bool,
    pub smart_power_on_seconds: u64,
    /// Kelvin, 0 if unknown.
    pub smart_temperature: f64,
    pub smart_num_attributes_failing: i32,
    pub smart_num_attributes_failed_in_the_past: i32,
    pub smart_num_bad_sectors: i64,
    pub smart_selftest_status: String,
    pub smart_selftest_percent_remaining: i32,
    pub pm_supported: bool,
    pub pm_enabled: bool,
    pub apm_supported: bool,
    pub apm_enabled: bool,
    pub aam_supported: bool,
    pub aam_enabled: bool,
    pub aam_vendor_recommended_value: i32,
    pub write_cache_supported: bool,
    pub write_cache_enabled: bool,
    pub read_lookahead_supported: bool,
    pub read_lookahead_enabled: bool,
    pub security_erase_unit_minutes: i32,
    pub security_enhanced_erase_unit_minutes: i32,
    pub security_frozen: bool,
}

impl Ata {
    pub fn temperature_celsius(&self) -> Option<f64> {
        kelvin_to_celsius(self.smart_temperature)
    }

    pub fn power_on_hours(&self) -> u64 {
        self.smart_power_on_seconds / 3600
    }
}

/// NVMe controller state (`org.freedesktop.UDisks2.NVMe.Controller`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NvmeController {
    /// Controller state, e.g. "live", "resetting".
    pub state: String,
    pub controller_id: u16,
    /// NVMe Qualified Name of the subsystem, as raw bytes.
    pub subsystem_nqn: Vec<u8>,
    pub fguid: String,
    pub nvme_revision: String,
    pub unallocated_capacity: u64,
    pub smart_updated: u64,
    pub smart_critical_warning: Vec<String>,
    pub smart_power_on_hours: u64,
    /// Kelvin, 0 if unknown.
    pub smart_temperature: u16,
    pub smart_selftest_status: String,
    pub smart_selftest_percent_remaining: i32,
    pub sanitize_status: String,
    pub sanitize_percent_remaining: i32,
}

impl NvmeController {
    pub fn temperature_celsius(&self) -> Option<f64> {
        kelvin_to_celsius(f64::from(self.smart_temperature))
    }

    /// The subsystem NQN as text, without the trailing NUL.
    pub fn subsystem_nqn_string(&self) -> String {
        let raw = self
            .subsystem_nqn
            .split(|b| *b == 0)
            .next()
            .unwrap_or(&self.subsystem_nqn);
        String::from_utf8_lossy(raw).to_string()
    }

    /// True when the controller reports any critical warning.
    pub fn has_critical_warning(&self) -> bool {
        !self.smart_critical_warning.is_empty()
    }
}
