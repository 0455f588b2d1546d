// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use storage_types::{BlockDevice, Drive, DriveHealth, bytes_to_pretty};
use storage_udisks::{UDisksClient, UDisksConfig};
use tracing_subscriber::EnvFilter;

/// Inspect drives and block devices through UDisks2
#[derive(Parser)]
#[command(name = "storage-cli")]
#[command(about = "List drives and block devices, read SMART data, power off drives")]
#[command(long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all drives
    Drives {
        #[arg(long)]
        json: bool,
    },
    /// List the block devices on a drive
    Devices {
        /// Stable drive identifier, e.g. CT2000P3-10SSD2-DD564198842D5
        drive_id: String,
        /// Include unlabeled devices
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print ATA or NVMe health for every drive
    Smart {
        #[arg(long)]
        json: bool,
    },
    /// Unmount and lock everything on a drive, then power it off
    PowerOff {
        /// Stable drive identifier
        drive_id: String,
    },
}

#[derive(Debug, Serialize)]
struct HealthOutput<'a> {
    id: &'a str,
    #[serde(flatten)]
    health: &'a DriveHealth,
}

/// Devices worth showing by default: labeled ones and crypto containers.
fn is_interesting(block: &BlockDevice) -> bool {
    !block.id_label.is_empty() || block.is_crypto_container()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn drive_line(drive: &Drive) -> String {
    format!(
        "{}  {}  {}  bus={}  health={}{}",
        drive.id,
        drive.display_name(),
        bytes_to_pretty(&drive.size, false),
        if drive.connection_bus.is_empty() {
            "-"
        } else {
            drive.connection_bus.as_str()
        },
        drive.health.kind_label().unwrap_or("none"),
        if drive.can_power_off { "  [can power off]" } else { "" },
    )
}

fn device_line(block: &BlockDevice) -> String {
    let mounts: Vec<&str> = block.mount_points().collect();
    format!(
        "{} => {}  device {}  type {}  fs [{}]  label {}",
        block.id,
        block.uuid,
        if block.device_file.is_empty() {
            &block.device
        } else {
            &block.device_file
        },
        block.id_usage,
        mounts.join(", "),
        block.id_label,
    )
}

fn health_lines(drive: &Drive) -> Vec<String> {
    let celsius = |t: Option<f64>| t.map_or("-".to_string(), |c| format!("{:.0}°C", c));
    match &drive.health {
        DriveHealth::None => Vec::new(),
        DriveHealth::Ata(ata) => vec![format!(
            "{} ATA SMART  enabled={} failing={} temp={} power_on={}h bad_sectors={} selftest={}",
            drive.id,
            ata.smart_enabled,
            ata.smart_failing,
            celsius(ata.temperature_celsius()),
            ata.power_on_hours(),
            ata.smart_num_bad_sectors,
            ata.smart_selftest_status,
        )],
        DriveHealth::Nvme(nvme) => vec![format!(
            "{} NVME SMART  state={} temp={} power_on={}h warnings=[{}] selftest={} nqn={}",
            drive.id,
            nvme.state,
            celsius(nvme.temperature_celsius()),
            nvme.smart_power_on_hours,
            nvme.smart_critical_warning.join(", "),
            nvme.smart_selftest_status,
            nvme.subsystem_nqn_string(),
        )],
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storage_udisks=info,warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = UDisksConfig::resolve(cli.config.as_deref()).context("loading configuration")?;
    let client = UDisksClient::connect(&config)
        .await
        .context("connecting to UDisks2")?;

    match cli.command {
        Commands::Drives { json } => {
            let drives = client.drives().await?;
            if json {
                print_json(&drives)?;
            } else {
                for drive in &drives {
                    println!("{}", drive_line(drive));
                }
            }
        }
        Commands::Devices {
            drive_id,
            all,
            json,
        } => {
            let drive = client.drive_by_id(&drive_id).await?;
            let mut blocks = client.block_devices_on_drive(&drive.id).await?;
            if !all {
                blocks.retain(is_interesting);
            }
            if json {
                print_json(&blocks)?;
            } else {
                for block in &blocks {
                    println!("{}", device_line(block));
                }
            }
        }
        Commands::Smart { json } => {
            let drives = client.drives().await?;
            if json {
                let health: Vec<_> = drives
                    .iter()
                    .filter(|d| !d.health.is_none())
                    .map(|d| HealthOutput {
                        id: &d.id,
                        health: &d.health,
                    })
                    .collect();
                print_json(&health)?;
            } else {
                for line in drives.iter().flat_map(health_lines) {
                    println!("{}", line);
                }
            }
        }
        Commands::PowerOff { drive_id } => {
            let drive = client.drive_by_id(&drive_id).await?;
            client.power_off(&drive).await.map_err(|e| {
                tracing::error!("Failed to power off {}: {}", drive_id, e);
                e
            })?;
            println!("{} powered off", drive.display_name());
        }
    }

    Ok(())
}
