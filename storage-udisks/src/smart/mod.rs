//! Health snapshots
//!
//! Loaders for the two mutually exclusive health subsystems a drive object
//! may expose:
//! - ATA SMART (`org.freedesktop.UDisks2.Drive.Ata`)
//! - NVMe controller (`org.freedesktop.UDisks2.NVMe.Controller`)

mod ata;
mod nvme;

pub use ata::load_ata;
pub use nvme::load_nvme_controller;
