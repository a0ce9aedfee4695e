/*!
 * Local Adapter Registry
 * Rebuilt from `hciconfig` output on every query
 */

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::status;
use crate::config::BluetoothConfig;
use crate::error::{BluetoothError, Result};
use crate::system::CommandRunner;

/// A local bluetooth controller as reported by `hciconfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adapter {
    pub name: String,
    pub device_path: String,
    /// Local BD address, when `hciconfig` printed one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<PowerMode>,
}

impl Adapter {
    pub fn new(name: &str, sysfs_root: &str) -> Self {
        Self {
            name: name.to_string(),
            device_path: format!("{}/{}", sysfs_root.trim_end_matches('/'), name),
            address: None,
            power: None,
        }
    }
}

/// Radio power, either requested or as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerMode {
    On,
    Off,
}

impl PowerMode {
    /// Argument understood by `hciconfig <dev> up|down`.
    pub fn hciconfig_state(self) -> &'static str {
        match self {
            Self::On => "up",
            Self::Off => "down",
        }
    }
}

impl FromStr for PowerMode {
    type Err = BluetoothError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(BluetoothError::InvalidPowerMode(other.to_string())),
        }
    }
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// Resolves adapter names against a fresh `hciconfig` listing.
#[derive(Clone, Copy)]
pub struct AdapterRegistry<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a BluetoothConfig,
}

impl<'a> AdapterRegistry<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a BluetoothConfig) -> Self {
        Self { runner, config }
    }

    /// Snapshot of every adapter currently listed, keyed by name.
    pub fn list_adapters(&self) -> Result<BTreeMap<String, Adapter>> {
        let output = self.runner.run(&self.config.hciconfig)?;
        let adapters = status::parse_adapters(&output, &self.config.sysfs_root);
        tracing::debug!("Found {} adapter(s)", adapters.len());
        Ok(adapters)
    }

    pub fn resolve(&self, name: &str) -> Result<Adapter> {
        self.list_adapters()?
            .remove(name)
            .ok_or_else(|| BluetoothError::AdapterNotFound(name.to_string()))
    }

    /// Adapter lookup used by pairing: by name first, then by BD address.
    pub fn resolve_for_peer(&self, address: &str) -> Result<Adapter> {
        let mut adapters = self.list_adapters()?;
        if let Some(adapter) = adapters.remove(address) {
            return Ok(adapter);
        }
        adapters
            .into_values()
            .find(|adapter| {
                adapter
                    .address
                    .as_deref()
                    .is_some_and(|bd| bd.eq_ignore_ascii_case(address))
            })
            .ok_or_else(|| BluetoothError::AdapterNotFound(address.to_string()))
    }
}
