// SPDX-License-Identifier: GPL-3.0-only

//! Error types for UDisks2 queries and drive teardown

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UDisksError {
    /// The object does not resolve to a real drive.
    #[error("invalid drive")]
    InvalidDrive,

    #[error("drive not found: {0}")]
    DriveNotFound(String),

    #[error("unmount failed for {device}: {source}")]
    UnmountFailed {
        device: String,
        #[source]
        source: Box<UDisksError>,
    },

    #[error("locking failed for {device}: {source}")]
    LockingFailed {
        device: String,
        #[source]
        source: Box<UDisksError>,
    },

    #[error("power off not supported for drive {0}")]
    PowerOffNotSupported(String),

    #[error("invalid property format: {interface}.{name} is not {expected}")]
    InvalidPropertyFormat {
        interface: String,
        name: String,
        expected: &'static str,
    },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("D-Bus error: {0}")]
    DBusError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Zbus error: {0}")]
    ZbusError(#[from] zbus::Error),
}

impl UDisksError {
    pub(crate) fn unmount_failed(device: &str, source: UDisksError) -> Self {
        Self::UnmountFailed {
            device: device.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn locking_failed(device: &str, source: UDisksError) -> Self {
        Self::LockingFailed {
            device: device.to_string(),
            source: Box::new(source),
        }
    }

    /// True for either teardown stage (unmount or lock).
    ///
    /// Callers that only care whether the drive was left partially torn down
    /// can match on this instead of the individual variants.
    pub fn is_teardown_failure(&self) -> bool {
        matches!(self, Self::UnmountFailed { .. } | Self::LockingFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, UDisksError>;
