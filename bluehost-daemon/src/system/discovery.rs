/*!
 * Peer Device Discovery
 * Inquiry scans through hcitool
 */

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::runner::CommandRunner;
use super::validate::is_valid_hardware_address;
use crate::error::Result;

/// A nearby device reported by an inquiry scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    pub address: String,
    pub name: String,
    pub device_class: Option<String>,
}

impl DiscoveredDevice {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            device_class: None,
        }
    }
}

/// Finds nearby devices, optionally resolving their friendly names.
pub trait DeviceDiscovery: Send + Sync {
    fn discover_devices(&self, lookup_names: bool) -> Result<Vec<DiscoveredDevice>>;
}

/// Discovery backed by `hcitool scan` / `hcitool inq`.
pub struct HcitoolScanner {
    runner: Arc<dyn CommandRunner>,
    hcitool: String,
}

impl HcitoolScanner {
    pub fn new(runner: Arc<dyn CommandRunner>, hcitool: impl Into<String>) -> Self {
        Self {
            runner,
            hcitool: hcitool.into(),
        }
    }
}

impl DeviceDiscovery for HcitoolScanner {
    fn discover_devices(&self, lookup_names: bool) -> Result<Vec<DiscoveredDevice>> {
        let subcommand = if lookup_names { "scan" } else { "inq" };
        let output = self.runner.run(&format!("{} {}", self.hcitool, subcommand))?;
        let devices = parse_inquiry(&output);
        tracing::debug!("Inquiry found {} device(s)", devices.len());
        Ok(devices)
    }
}

/// Parse `hcitool scan` or `hcitool inq` output.
///
/// `scan` lines look like `\tAA:BB:CC:DD:EE:FF\tPhone`, `inq` lines like
/// `\tAA:BB:CC:DD:EE:FF\tclock offset: 0x1234\tclass: 0x5a020c`. Header lines
/// (`Scanning ...`, `Inquiring ...`) do not start with an address and are skipped.
pub fn parse_inquiry(output: &str) -> Vec<DiscoveredDevice> {
    let mut devices = Vec::new();

    for line in output.lines() {
        let mut fields = line.trim().split('\t');
        let address = match fields.next() {
            Some(address) if is_valid_hardware_address(address.trim()) => address.trim(),
            _ => continue,
        };

        let mut device = DiscoveredDevice::new(address, "");
        for field in fields {
            let field = field.trim();
            if let Some(class) = field.strip_prefix("class:") {
                device.device_class = Some(class.trim().to_string());
            } else if field.starts_with("clock offset:") {
                continue;
            } else if device.name.is_empty() {
                device.name = field.to_string();
            }
        }
        devices.push(device);
    }

    devices
}
