// SPDX-License-Identifier: GPL-3.0-only

//! NVMe controller snapshot

use storage_types::NvmeController;

use crate::dbus::NVME_CONTROLLER_INTERFACE;
use crate::error::Result;
use crate::store::{PropertyStore, read};

/// Read the full NVMe controller snapshot off a drive object.
///
/// Drives without the controller interface fail here; the drive loader
/// treats that as "no NVMe health", not as an error.
pub async fn load_nvme_controller<S>(store: &S, drive_object: &str) -> Result<NvmeController>
where
    S: PropertyStore + ?Sized,
{
    let o = drive_object;
    let i = NVME_CONTROLLER_INTERFACE;

    Ok(NvmeController {
        state: read(store, o, i, "State").await?,
        controller_id: read(store, o, i, "ControllerID").await?,
        subsystem_nqn: read(store, o, i, "SubsystemNQN").await?,
        fguid: read(store, o, i, "FGUID").await?,
        nvme_revision: read(store, o, i, "NVMeRevision").await?,
        unallocated_capacity: read(store, o, i, "UnallocatedCapacity").await?,
        smart_updated: read(store, o, i, "SmartUpdated").await?,
        smart_critical_warning: read(store, o, i, "SmartCriticalWarning").await?,
        smart_power_on_hours: read(store, o, i, "SmartPowerOnHours").await?,
        smart_temperature: read(store, o, i, "SmartTemperature").await?,
        smart_selftest_status: read(store, o, i, "SmartSelftestStatus").await?,
        smart_selftest_percent_remaining: read(store, o, i, "SmartSelftestPercentRemaining")
            .await?,
        sanitize_status: read(store, o, i, "SanitizeStatus").await?,
        sanitize_percent_remaining: read(store, o, i, "SanitizePercentRemaining").await?,
    })
}
