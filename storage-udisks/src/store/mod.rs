// SPDX-License-Identifier: GPL-3.0-only

//! The property store seam
//!
//! Everything the core needs from UDisks2 goes through `PropertyStore`:
//! enumerating objects, reading properties by interface and name, and the
//! three mutating calls used by drive teardown. `crate::dbus` provides the
//! real implementation; tests use an in-memory one.

mod value;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Result, UDisksError};

pub use value::{FromPropertyValue, PropertyValue};

/// Object path the service uses for "no object".
pub const NO_OBJECT_PATH: &str = "/";

pub fn is_no_object(path: &str) -> bool {
    path.is_empty() || path == NO_OBJECT_PATH
}

/// Options passed with every mutating call (`a{sv}` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Sent as `auth.no_user_interaction`.
    pub no_user_interaction: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            no_user_interaction: true,
        }
    }
}

#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Object paths of every block device, in the service's order.
    async fn block_devices(&self) -> Result<Vec<String>>;

    /// Object paths of every drive, sorted.
    async fn drive_objects(&self) -> Result<Vec<String>>;

    async fn property(&self, object: &str, interface: &str, name: &str) -> Result<PropertyValue>;

    /// All properties of `interface` on `object`. An object without the
    /// interface may answer with an error or with an empty map.
    async fn all_properties(
        &self,
        object: &str,
        interface: &str,
    ) -> Result<HashMap<String, PropertyValue>>;

    async fn unmount(&self, object: &str, options: &CallOptions) -> Result<()>;

    async fn lock(&self, object: &str, options: &CallOptions) -> Result<()>;

    async fn power_off(&self, object: &str, options: &CallOptions) -> Result<()>;
}

/// Read a property and check its shape.
pub async fn read<T, S>(store: &S, object: &str, interface: &str, name: &str) -> Result<T>
where
    T: FromPropertyValue,
    S: PropertyStore + ?Sized,
{
    let value = store.property(object, interface, name).await?;
    T::from_property_value(value).ok_or_else(|| UDisksError::InvalidPropertyFormat {
        interface: interface.to_string(),
        name: name.to_string(),
        expected: T::EXPECTED,
    })
}

/// Like `read`, but a failed read leaves `T::default()` behind.
///
/// Used for descriptive fields where one unreadable property must not stop
/// the rest of the object from loading.
pub async fn read_or_default<T, S>(store: &S, object: &str, interface: &str, name: &str) -> T
where
    T: FromPropertyValue + Default,
    S: PropertyStore + ?Sized,
{
    match read(store, object, interface, name).await {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("{}: could not read {}.{}: {}", object, interface, name, e);
            T::default()
        }
    }
}

/// Read an object reference; `None` when the property names no object.
pub async fn read_object_ref<S>(
    store: &S,
    object: &str,
    interface: &str,
    name: &str,
) -> Result<Option<String>>
where
    S: PropertyStore + ?Sized,
{
    let path = match store.property(object, interface, name).await? {
        PropertyValue::ObjectPath(path) => path,
        _ => {
            return Err(UDisksError::InvalidPropertyFormat {
                interface: interface.to_string(),
                name: name.to_string(),
                expected: "an object path",
            });
        }
    };
    Ok((!is_no_object(&path)).then_some(path))
}

/// Take a typed value out of a `GetAll` map.
pub fn take<T: FromPropertyValue>(
    props: &mut HashMap<String, PropertyValue>,
    interface: &str,
    name: &str,
) -> Result<T> {
    props
        .remove(name)
        .and_then(T::from_property_value)
        .ok_or_else(|| UDisksError::InvalidPropertyFormat {
            interface: interface.to_string(),
            name: name.to_string(),
            expected: T::EXPECTED,
        })
}
