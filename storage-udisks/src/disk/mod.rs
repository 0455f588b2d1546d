//! Drive and block device operations
//!
//! - Block device graph enumeration
//! - Drive lookup and health snapshots
//! - Teardown and power off

pub mod drive;
pub mod graph;
pub mod power;

pub use drive::{build_drive, drive_by_id, drive_object_path, drives, resolve_block_drive};
pub use graph::{BlockDevices, list_block_devices};
pub use power::{
    Ownership, block_devices_on_drive, classify, lock_crypto_device, power_off,
    unmount_block_device,
};
