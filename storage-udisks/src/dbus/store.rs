// SPDX-License-Identifier: GPL-3.0-only

//! zbus-backed `PropertyStore`
//!
//! Properties are read with explicit `Properties.Get`/`GetAll` calls rather
//! than through caching proxies, so every query sees the service's current
//! state.

use std::collections::HashMap;

use async_trait::async_trait;
use udisks2::{drive::DriveProxy, encrypted::EncryptedProxy, filesystem::FilesystemProxy};
use zbus::Connection;
use zbus::zvariant::{OwnedValue, Value};

use super::proxies::{UDisks2ManagerProxy, UDisks2ObjectManagerProxy};
use super::{DRIVES_PATH, PROPERTIES_INTERFACE, UDISKS2_SERVICE};
use crate::config::BusKind;
use crate::error::{Result, UDisksError};
use crate::store::{CallOptions, PropertyStore, PropertyValue};

pub struct DBusPropertyStore {
    connection: Connection,
}

impl DBusPropertyStore {
    pub async fn connect(bus: BusKind) -> Result<Self> {
        let connection = match bus {
            BusKind::System => Connection::system().await,
            BusKind::Session => Connection::session().await,
        }
        .map_err(|e| UDisksError::ConnectionFailed(e.to_string()))?;

        Ok(Self::new(connection))
    }

    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

fn options_map(options: &CallOptions) -> HashMap<&'static str, Value<'static>> {
    HashMap::from([(
        "auth.no_user_interaction",
        Value::from(options.no_user_interaction),
    )])
}

fn call_failed(method: &str, object: &str, e: impl std::fmt::Display) -> UDisksError {
    UDisksError::DBusError(format!("{} on {} failed: {}", method, object, e))
}

/// Direct children of the drives container, e.g. `.../drives/Foo` but not
/// `.../drives/Foo/bar`.
fn is_drive_object(path: &str) -> bool {
    path.strip_prefix(DRIVES_PATH)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|name| !name.is_empty() && !name.contains('/'))
}

fn bytes_of(array: &zbus::zvariant::Array<'_>) -> Vec<u8> {
    array
        .iter()
        .filter_map(|v| match v {
            Value::U8(b) => Some(*b),
            _ => None,
        })
        .collect()
}

impl From<&Value<'_>> for PropertyValue {
    fn from(value: &Value<'_>) -> Self {
        match value {
            Value::Bool(v) => Self::Bool(*v),
            Value::U8(v) => Self::Byte(*v),
            Value::I16(v) => Self::I16(*v),
            Value::U16(v) => Self::U16(*v),
            Value::I32(v) => Self::I32(*v),
            Value::U32(v) => Self::U32(*v),
            Value::I64(v) => Self::I64(*v),
            Value::U64(v) => Self::U64(*v),
            Value::F64(v) => Self::F64(*v),
            Value::Str(s) => Self::Str(s.to_string()),
            Value::ObjectPath(p) => Self::ObjectPath(p.to_string()),
            Value::Value(inner) => Self::from(&**inner),
            Value::Array(array) => {
                // Element type decides the shape, so empty arrays keep theirs.
                let signature = value.value_signature().to_string();
                match signature.as_str() {
                    "ay" => Self::Bytes(bytes_of(array)),
                    "aay" => Self::ByteArrays(
                        array
                            .iter()
                            .filter_map(|v| match v {
                                Value::Array(inner) => Some(bytes_of(inner)),
                                _ => None,
                            })
                            .collect(),
                    ),
                    "as" => Self::Strings(
                        array
                            .iter()
                            .filter_map(|v| match v {
                                Value::Str(s) => Some(s.to_string()),
                                _ => None,
                            })
                            .collect(),
                    ),
                    _ => Self::Unsupported(signature),
                }
            }
            other => Self::Unsupported(other.value_signature().to_string()),
        }
    }
}

#[async_trait]
impl PropertyStore for DBusPropertyStore {
    async fn block_devices(&self) -> Result<Vec<String>> {
        let manager_proxy = UDisks2ManagerProxy::new(&self.connection).await?;
        let block_paths = manager_proxy.get_block_devices(HashMap::new()).await?;
        Ok(block_paths
            .iter()
            .map(|p| p.as_str().to_string())
            .collect())
    }

    async fn drive_objects(&self) -> Result<Vec<String>> {
        let object_manager = UDisks2ObjectManagerProxy::new(&self.connection).await?;
        let objects = object_manager.get_managed_objects().await?;
        let mut drives: Vec<String> = objects
            .keys()
            .map(|p| p.as_str())
            .filter(|p| is_drive_object(p))
            .map(ToString::to_string)
            .collect();
        drives.sort();
        Ok(drives)
    }

    async fn property(&self, object: &str, interface: &str, name: &str) -> Result<PropertyValue> {
        let proxy = zbus::Proxy::new(
            &self.connection,
            UDISKS2_SERVICE,
            object,
            PROPERTIES_INTERFACE,
        )
        .await?;

        tracing::debug!("Get {}.{} on {}", interface, name, object);
        let value: OwnedValue = proxy.call("Get", &(interface, name)).await?;
        Ok(PropertyValue::from(&*value))
    }

    async fn all_properties(
        &self,
        object: &str,
        interface: &str,
    ) -> Result<HashMap<String, PropertyValue>> {
        let proxy = zbus::Proxy::new(
            &self.connection,
            UDISKS2_SERVICE,
            object,
            PROPERTIES_INTERFACE,
        )
        .await?;

        tracing::debug!("GetAll {} on {}", interface, object);
        let values: HashMap<String, OwnedValue> = proxy.call("GetAll", &(interface,)).await?;
        Ok(values
            .iter()
            .map(|(k, v)| (k.clone(), PropertyValue::from(&**v)))
            .collect())
    }

    async fn unmount(&self, object: &str, options: &CallOptions) -> Result<()> {
        let proxy = FilesystemProxy::builder(&self.connection)
            .path(object)?
            .build()
            .await?;
        proxy
            .unmount(options_map(options))
            .await
            .map_err(|e| call_failed("Unmount", object, e))
    }

    async fn lock(&self, object: &str, options: &CallOptions) -> Result<()> {
        let proxy = EncryptedProxy::builder(&self.connection)
            .path(object)?
            .build()
            .await?;
        proxy
            .lock(options_map(options))
            .await
            .map_err(|e| call_failed("Lock", object, e))
    }

    async fn power_off(&self, object: &str, options: &CallOptions) -> Result<()> {
        let proxy = DriveProxy::builder(&self.connection)
            .path(object)?
            .build()
            .await?;
        proxy
            .power_off(options_map(options))
            .await
            .map_err(|e| call_failed("PowerOff", object, e))
    }
}
