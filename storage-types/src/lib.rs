// SPDX-License-Identifier: GPL-3.0-only

//! Canonical models for drives and block devices exposed by UDisks2
//!
//! These are plain snapshots: every query against the service builds them
//! fresh, and nothing here talks to the bus.
//!
//! - `Drive` → a physical storage unit, with an optional health snapshot
//! - `BlockDevice` → a logical node (whole disk, partition, cleartext volume)
//! - `CryptoBackingDevice` → the encrypted container under a cleartext node
//! - `Filesystem` → mount state of a block device

pub mod block;
pub mod common;
pub mod drive;
pub mod smart;

pub use block::{BlockDevice, CryptoBackingDevice, Filesystem};
pub use common::{bytes_to_pretty, kelvin_to_celsius};
pub use drive::{Drive, DriveHealth};
pub use smart::{Ata, NvmeController};
