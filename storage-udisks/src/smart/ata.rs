// SPDX-License-Identifier: GPL-3.0-only

//! ATA SMART snapshot

use storage_types::Ata;

use crate::dbus::ATA_INTERFACE;
use crate::error::Result;
use crate::store::{PropertyStore, read};

/// Read the full ATA snapshot off a drive object.
///
/// Any unreadable field fails the whole load; a partial snapshot is never
/// returned.
pub async fn load_ata<S>(store: &S, drive_object: &str) -> Result<Ata>
where
    S: PropertyStore + ?Sized,
{
    let o = drive_object;
    let i = ATA_INTERFACE;

    Ok(Ata {
        smart_supported: read(store, o, i, "SmartSupported").await?,
        smart_enabled: read(store, o, i, "SmartEnabled").await?,
        smart_updated: read(store, o, i, "SmartUpdated").await?,
        smart_failing: read(store, o, i, "SmartFailing").await?,
        smart_power_on_seconds: read(store, o, i, "SmartPowerOnSeconds").await?,
        smart_temperature: read(store, o, i, "SmartTemperature").await?,
        smart_num_attributes_failing: read(store, o, i, "SmartNumAttributesFailing").await?,
        smart_num_attributes_failed_in_the_past: read(
            store,
            o,
            i,
            "SmartNumAttributesFailedInThePast",
        )
        .await?,
        smart_num_bad_sectors: read(store, o, i, "SmartNumBadSectors").await?,
        smart_selftest_status: read(store, o, i, "SmartSelftestStatus").await?,
        smart_selftest_percent_remaining: read(store, o, i, "SmartSelftestPercentRemaining")
            .await?,
        pm_supported: read(store, o, i, "PmSupported").await?,
        pm_enabled: read(store, o, i, "PmEnabled").await?,
        apm_supported: read(store, o, i, "ApmSupported").await?,
        apm_enabled: read(store, o, i, "ApmEnabled").await?,
        aam_supported: read(store, o, i, "AamSupported").await?,
        aam_enabled: read(store, o, i, "AamEnabled").await?,
        aam_vendor_recommended_value: read(store, o, i, "AamVendorRecommendedValue").await?,
        write_cache_supported: read(store, o, i, "WriteCacheSupported").await?,
        write_cache_enabled: read(store, o, i, "WriteCacheEnabled").await?,
        read_lookahead_supported: read(store, o, i, "ReadLookaheadSupported").await?,
        read_lookahead_enabled: read(store, o, i, "ReadLookaheadEnabled").await?,
        security_erase_unit_minutes: read(store, o, i, "SecurityEraseUnitMinutes").await?,
        security_enhanced_erase_unit_minutes: read(
            store,
            o,
            i,
            "SecurityEnhancedEraseUnitMinutes",
        )
        .await?,
        security_frozen: read(store, o, i, "SecurityFrozen").await?,
    })
}
