// SPDX-License-Identifier: GPL-3.0-only

//! Client configuration
//!
//! Read from an optional TOML file, then overridden from the environment:
//!
//! ```toml
//! bus = "system"
//! allow_user_interaction = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UDisksError};

pub const ENV_BUS: &str = "STORAGE_UDISKS_BUS";
pub const ENV_ALLOW_INTERACTION: &str = "STORAGE_UDISKS_ALLOW_INTERACTION";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusKind {
    #[default]
    System,
    Session,
}

impl BusKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "system" => Some(Self::System),
            "session" => Some(Self::Session),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UDisksConfig {
    pub bus: BusKind,

    /// Let polkit prompt the user during mutating calls. When false every
    /// call carries `auth.no_user_interaction = true`.
    pub allow_user_interaction: bool,
}

impl UDisksConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| UDisksError::InvalidConfig(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            UDisksError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load `path` if given (defaults otherwise), then apply environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(
            std::env::var(ENV_BUS).ok().as_deref(),
            std::env::var(ENV_ALLOW_INTERACTION).ok().as_deref(),
        )?;
        Ok(config)
    }

    fn apply_overrides(&mut self, bus: Option<&str>, allow: Option<&str>) -> Result<()> {
        if let Some(bus) = bus {
            self.bus = BusKind::parse(bus)
                .ok_or_else(|| UDisksError::InvalidConfig(format!("{ENV_BUS}={bus}")))?;
        }
        if let Some(allow) = allow {
            self.allow_user_interaction = match allow.trim() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => {
                    return Err(UDisksError::InvalidConfig(format!(
                        "{ENV_ALLOW_INTERACTION}={other}"
                    )));
                }
            };
        }
        Ok(())
    }
}
