/*!
 * Adapter Control
 * Power, discoverability and scan mode through hciconfig
 */

use serde::{Deserialize, Serialize};
use tracing::info;

use super::adapter::{AdapterRegistry, PowerMode};
use super::status;
use crate::config::BluetoothConfig;
use crate::error::Result;
use crate::system::runner::{shell_quote, CommandRunner};

/// Fixed descriptor for this client library.
pub const CLIENT_LIBRARY_VERSION: &str = concat!("bluehost ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    pub client_library_version: String,
    /// BlueZ version as reported by `bluetoothctl -v`.
    pub daemon_version: String,
}

pub struct AdapterController<'a> {
    runner: &'a dyn CommandRunner,
    registry: AdapterRegistry<'a>,
    config: &'a BluetoothConfig,
}

impl<'a> AdapterController<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a BluetoothConfig) -> Self {
        Self {
            runner,
            registry: AdapterRegistry::new(runner, config),
            config,
        }
    }

    pub fn get_versions(&self) -> Result<Versions> {
        let output = self
            .runner
            .run(&format!("{} -v", self.config.bluetoothctl))?;
        Ok(Versions {
            client_library_version: CLIENT_LIBRARY_VERSION.to_string(),
            daemon_version: status::parse_version(&output),
        })
    }

    /// Switch the radio on or off.
    ///
    /// The result mirrors the requested mode; the adapter is not re-read.
    pub fn set_power(&self, adapter_name: &str, mode: PowerMode) -> Result<bool> {
        let adapter = self.registry.resolve(adapter_name)?;
        self.hciconfig(&adapter.name, mode.hciconfig_state())?;
        info!("Adapter {} powered {}", adapter.name, mode);
        Ok(mode == PowerMode::On)
    }

    /// Enable inquiry scan, then report whether the flags confirm it.
    pub fn set_discoverable(&self, adapter_name: &str) -> Result<bool> {
        let adapter = self.registry.resolve(adapter_name)?;
        self.hciconfig(&adapter.name, "iscan")?;
        let discoverable = status::is_discoverable(&self.flags(&adapter.name)?);
        info!("Adapter {} discoverable: {}", adapter.name, discoverable);
        Ok(discoverable)
    }

    /// Disable inquiry and page scan, then report whether the flags confirm it.
    pub fn set_non_discoverable(&self, adapter_name: &str) -> Result<bool> {
        let adapter = self.registry.resolve(adapter_name)?;
        self.hciconfig(&adapter.name, "noscan")?;
        let quiet = status::is_non_discoverable(&self.flags(&adapter.name)?);
        info!("Adapter {} scanning disabled: {}", adapter.name, quiet);
        Ok(quiet)
    }

    fn hciconfig(&self, device: &str, argument: &str) -> Result<String> {
        self.runner.run(&format!(
            "{} {} {}",
            self.config.hciconfig,
            shell_quote(device),
            argument
        ))
    }

    fn flags(&self, device: &str) -> Result<String> {
        self.runner
            .run(&format!("{} {}", self.config.hciconfig, shell_quote(device)))
    }
}
