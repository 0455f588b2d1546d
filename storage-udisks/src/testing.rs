// SPDX-License-Identifier: GPL-3.0-only

//! In-memory `PropertyStore` for unit tests
//!
//! Objects are maps of interface → property → value. Mutating calls are
//! recorded and applied (unmount clears mount points, lock tears down the
//! cleartext device), so repeated teardown can be observed.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::dbus::{
    ATA_INTERFACE, BLOCK_INTERFACE, DRIVE_INTERFACE, ENCRYPTED_INTERFACE, FILESYSTEM_INTERFACE,
};
use crate::error::{Result, UDisksError};
use crate::store::{CallOptions, NO_OBJECT_PATH, PropertyStore, PropertyValue};

type Props = HashMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Unmount(String, CallOptions),
    Lock(String, CallOptions),
    PowerOff(String, CallOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CallKind {
    Unmount,
    Lock,
    PowerOff,
}

#[derive(Default)]
pub(crate) struct FakeStore {
    block_devices: Mutex<Vec<String>>,
    drives: Mutex<Vec<String>>,
    objects: Mutex<HashMap<String, HashMap<String, Props>>>,
    calls: Mutex<Vec<Call>>,
    reads: Mutex<Vec<(String, String)>>,
    failures: Mutex<HashMap<(CallKind, String), String>>,
    enumeration_error: Mutex<Option<String>>,
}

/// NUL-terminated `ay`, the way UDisks2 sends paths.
pub(crate) fn encode_bytestring(value: &str) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn str_value(s: &str) -> PropertyValue {
    PropertyValue::Str(s.to_string())
}

fn path_value(s: &str) -> PropertyValue {
    PropertyValue::ObjectPath(s.to_string())
}

pub(crate) fn drive_props(id: &str, can_power_off: bool) -> Props {
    HashMap::from([
        ("Id".to_string(), str_value(id)),
        ("Vendor".to_string(), str_value("Crucial")),
        ("Model".to_string(), str_value("CT2000P3SSD8")),
        ("Serial".to_string(), str_value("2236E64F1A2B")),
        ("ConnectionBus".to_string(), str_value("usb")),
        ("Seat".to_string(), str_value("seat0")),
        ("SiblingId".to_string(), str_value("")),
        ("Removable".to_string(), PropertyValue::Bool(true)),
        ("MediaRemovable".to_string(), PropertyValue::Bool(false)),
        ("MediaAvailable".to_string(), PropertyValue::Bool(true)),
        ("Ejectable".to_string(), PropertyValue::Bool(false)),
        ("Size".to_string(), PropertyValue::U64(2_000_398_934_016)),
        ("CanPowerOff".to_string(), PropertyValue::Bool(can_power_off)),
    ])
}

pub(crate) fn ata_drive_props() -> Props {
    HashMap::from([
        ("SmartSupported".to_string(), PropertyValue::Bool(true)),
        ("SmartEnabled".to_string(), PropertyValue::Bool(true)),
        ("SmartUpdated".to_string(), PropertyValue::U64(1_700_000_000)),
        ("SmartFailing".to_string(), PropertyValue::Bool(false)),
        ("SmartPowerOnSeconds".to_string(), PropertyValue::U64(36_000)),
        ("SmartTemperature".to_string(), PropertyValue::F64(308.15)),
        ("SmartNumAttributesFailing".to_string(), PropertyValue::I32(0)),
        ("SmartNumAttributesFailedInThePast".to_string(), PropertyValue::I32(1)),
        ("SmartNumBadSectors".to_string(), PropertyValue::I64(2)),
        ("SmartSelftestStatus".to_string(), str_value("success")),
        ("SmartSelftestPercentRemaining".to_string(), PropertyValue::I32(-1)),
        ("PmSupported".to_string(), PropertyValue::Bool(true)),
        ("PmEnabled".to_string(), PropertyValue::Bool(true)),
        ("ApmSupported".to_string(), PropertyValue::Bool(false)),
        ("ApmEnabled".to_string(), PropertyValue::Bool(false)),
        ("AamSupported".to_string(), PropertyValue::Bool(true)),
        ("AamEnabled".to_string(), PropertyValue::Bool(false)),
        ("AamVendorRecommendedValue".to_string(), PropertyValue::I32(254)),
        ("WriteCacheSupported".to_string(), PropertyValue::Bool(true)),
        ("WriteCacheEnabled".to_string(), PropertyValue::Bool(true)),
        ("ReadLookaheadSupported".to_string(), PropertyValue::Bool(true)),
        ("ReadLookaheadEnabled".to_string(), PropertyValue::Bool(true)),
        ("SecurityEraseUnitMinutes".to_string(), PropertyValue::I32(500)),
        ("SecurityEnhancedEraseUnitMinutes".to_string(), PropertyValue::I32(0)),
        ("SecurityFrozen".to_string(), PropertyValue::Bool(false)),
    ])
}

pub(crate) fn nvme_drive_props() -> Props {
    HashMap::from([
        ("State".to_string(), str_value("live")),
        ("ControllerID".to_string(), PropertyValue::U16(1)),
        (
            "SubsystemNQN".to_string(),
            PropertyValue::Bytes(encode_bytestring("nqn.2014.08.org.nvmexpress:c0a9")),
        ),
        ("FGUID".to_string(), str_value("")),
        ("NVMeRevision".to_string(), str_value("1.4")),
        ("UnallocatedCapacity".to_string(), PropertyValue::U64(0)),
        ("SmartUpdated".to_string(), PropertyValue::U64(1_700_000_000)),
        (
            "SmartCriticalWarning".to_string(),
            PropertyValue::Strings(vec!["temperature".to_string()]),
        ),
        ("SmartPowerOnHours".to_string(), PropertyValue::U64(1200)),
        ("SmartTemperature".to_string(), PropertyValue::U16(310)),
        ("SmartSelftestStatus".to_string(), str_value("success")),
        ("SmartSelftestPercentRemaining".to_string(), PropertyValue::I32(-1)),
        ("SanitizeStatus".to_string(), str_value("")),
        ("SanitizePercentRemaining".to_string(), PropertyValue::I32(-1)),
    ])
}

impl FakeStore {
    pub(crate) fn set_props(&self, object: &str, interface: &str, props: Props) {
        self.objects
            .lock()
            .unwrap()
            .entry(object.to_string())
            .or_default()
            .insert(interface.to_string(), props);
    }

    pub(crate) fn set_prop(&self, object: &str, interface: &str, name: &str, value: PropertyValue) {
        self.objects
            .lock()
            .unwrap()
            .entry(object.to_string())
            .or_default()
            .entry(interface.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    pub(crate) fn remove_prop(&self, object: &str, interface: &str, name: &str) {
        if let Some(props) = self
            .objects
            .lock()
            .unwrap()
            .get_mut(object)
            .and_then(|o| o.get_mut(interface))
        {
            props.remove(name);
        }
    }

    /// Drive object listed under the drives container; no health interface.
    pub(crate) fn add_drive(&self, object: &str, id: &str, can_power_off: bool) {
        self.set_props(object, DRIVE_INTERFACE, drive_props(id, can_power_off));
        self.drives.lock().unwrap().push(object.to_string());
    }

    pub(crate) fn add_ata(&self, drive_object: &str) {
        self.set_props(drive_object, ATA_INTERFACE, ata_drive_props());
    }

    /// Block device at the end of the enumeration, optionally linked to a drive.
    pub(crate) fn add_block(&self, object: &str, drive_object: Option<&str>) {
        let name = name_of(object);
        let dev = format!("/dev/{}", name);
        self.set_props(
            object,
            BLOCK_INTERFACE,
            HashMap::from([
                ("Device".to_string(), PropertyValue::Bytes(encode_bytestring(&dev))),
                (
                    "PreferredDevice".to_string(),
                    PropertyValue::Bytes(encode_bytestring(&dev)),
                ),
                ("IdUUID".to_string(), str_value(&format!("uuid-{}", name))),
                ("Id".to_string(), str_value(&format!("by-id-{}", name))),
                ("IdUsage".to_string(), str_value("")),
                ("IdLabel".to_string(), str_value("")),
                ("IdType".to_string(), str_value("")),
                ("Size".to_string(), PropertyValue::U64(1024 * 1024)),
                (
                    "Symlinks".to_string(),
                    PropertyValue::ByteArrays(vec![encode_bytestring(&format!(
                        "/dev/disk/by-id/{}",
                        name
                    ))]),
                ),
                (
                    "Drive".to_string(),
                    path_value(drive_object.unwrap_or(NO_OBJECT_PATH)),
                ),
                ("CryptoBackingDevice".to_string(), path_value(NO_OBJECT_PATH)),
            ]),
        );
        self.block_devices.lock().unwrap().push(object.to_string());
    }

    pub(crate) fn add_filesystem(&self, object: &str, mount_points: &[&str]) {
        self.set_props(
            object,
            FILESYSTEM_INTERFACE,
            HashMap::from([
                (
                    "MountPoints".to_string(),
                    PropertyValue::ByteArrays(
                        mount_points.iter().map(|m| encode_bytestring(m)).collect(),
                    ),
                ),
                ("Size".to_string(), PropertyValue::U64(512 * 1024)),
            ]),
        );
        self.set_prop(object, BLOCK_INTERFACE, "IdUsage", str_value("filesystem"));
        self.set_prop(object, BLOCK_INTERFACE, "IdType", str_value("ext4"));
    }

    /// Mark `container` as a LUKS container, unlocked into `cleartext` if given.
    pub(crate) fn add_encrypted(&self, container: &str, cleartext: Option<&str>) {
        self.set_props(
            container,
            ENCRYPTED_INTERFACE,
            HashMap::from([
                ("HintEncryptionType".to_string(), str_value("LUKS2")),
                ("MetadataSize".to_string(), PropertyValue::U64(16 * 1024 * 1024)),
                (
                    "CleartextDevice".to_string(),
                    path_value(cleartext.unwrap_or(NO_OBJECT_PATH)),
                ),
            ]),
        );
        self.set_prop(container, BLOCK_INTERFACE, "IdUsage", str_value("crypto"));
        self.set_prop(container, BLOCK_INTERFACE, "IdType", str_value("crypto_LUKS"));
        if let Some(cleartext) = cleartext {
            self.set_prop(
                cleartext,
                BLOCK_INTERFACE,
                "CryptoBackingDevice",
                path_value(container),
            );
        }
    }

    pub(crate) fn fail_call(&self, kind: CallKind, object: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert((kind, object.to_string()), message.to_string());
    }

    pub(crate) fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub(crate) fn fail_enumeration(&self, message: &str) {
        *self.enumeration_error.lock().unwrap() = Some(message.to_string());
    }

    pub(crate) fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    /// Interfaces read on `object`, in order, including repeats.
    pub(crate) fn interfaces_read(&self, object: &str) -> Vec<String> {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, _)| o == object)
            .map(|(_, i)| i.clone())
            .collect()
    }

    fn record(&self, call: Call, kind: CallKind, object: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(&(kind, object.to_string())) {
            Some(message) => Err(UDisksError::DBusError(message.clone())),
            None => Ok(()),
        }
    }

    fn interface(&self, object: &str, interface: &str) -> Result<Props> {
        self.reads
            .lock()
            .unwrap()
            .push((object.to_string(), interface.to_string()));
        let objects = self.objects.lock().unwrap();
        let Some(obj) = objects.get(object) else {
            return Err(UDisksError::DBusError(format!(
                "org.freedesktop.DBus.Error.UnknownObject: {}",
                object
            )));
        };
        obj.get(interface).cloned().ok_or_else(|| {
            UDisksError::DBusError(format!(
                "org.freedesktop.DBus.Error.InvalidArgs: No such interface '{}'",
                interface
            ))
        })
    }
}

#[async_trait]
impl PropertyStore for FakeStore {
    async fn block_devices(&self) -> Result<Vec<String>> {
        if let Some(message) = self.enumeration_error.lock().unwrap().clone() {
            return Err(UDisksError::DBusError(message));
        }
        Ok(self.block_devices.lock().unwrap().clone())
    }

    async fn drive_objects(&self) -> Result<Vec<String>> {
        let mut drives = self.drives.lock().unwrap().clone();
        drives.sort();
        Ok(drives)
    }

    async fn property(&self, object: &str, interface: &str, name: &str) -> Result<PropertyValue> {
        let props = self.interface(object, interface)?;
        props.get(name).cloned().ok_or_else(|| {
            UDisksError::DBusError(format!(
                "org.freedesktop.DBus.Error.InvalidArgs: No such property '{}'",
                name
            ))
        })
    }

    async fn all_properties(&self, object: &str, interface: &str) -> Result<Props> {
        self.interface(object, interface)
    }

    async fn unmount(&self, object: &str, options: &CallOptions) -> Result<()> {
        self.record(Call::Unmount(object.to_string(), *options), CallKind::Unmount, object)?;
        self.set_prop(
            object,
            FILESYSTEM_INTERFACE,
            "MountPoints",
            PropertyValue::ByteArrays(Vec::new()),
        );
        Ok(())
    }

    async fn lock(&self, object: &str, options: &CallOptions) -> Result<()> {
        self.record(Call::Lock(object.to_string(), *options), CallKind::Lock, object)?;

        // The cleartext device disappears once its container is locked.
        let cleartext = {
            let objects = self.objects.lock().unwrap();
            objects
                .iter()
                .filter(|(_, ifaces)| {
                    ifaces
                        .get(BLOCK_INTERFACE)
                        .and_then(|p| p.get("CryptoBackingDevice"))
                        == Some(&path_value(object))
                })
                .map(|(path, _)| path.clone())
                .collect::<Vec<_>>()
        };
        {
            let mut objects = self.objects.lock().unwrap();
            for path in &cleartext {
                objects.remove(path);
            }
        }
        self.block_devices
            .lock()
            .unwrap()
            .retain(|p| !cleartext.contains(p));
        self.set_prop(
            object,
            ENCRYPTED_INTERFACE,
            "CleartextDevice",
            path_value(NO_OBJECT_PATH),
        );
        Ok(())
    }

    async fn power_off(&self, object: &str, options: &CallOptions) -> Result<()> {
        self.record(
            Call::PowerOff(object.to_string(), *options),
            CallKind::PowerOff,
            object,
        )
    }
}
