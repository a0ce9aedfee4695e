/*!
 * Bluetooth Adapter Management
 * hciconfig and BlueZ tool orchestration behind injectable collaborators
 */

pub mod adapter;
pub mod controller;
pub mod device;
pub mod service;
pub mod status;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::BluetoothConfig;
use crate::error::Result;
use crate::system::{
    AddressValidator, CommandRunner, DeviceDiscovery, HcitoolScanner, MacAddressValidator,
    ServiceManager, ShellRunner, Systemctl,
};

pub use adapter::{Adapter, AdapterRegistry, PowerMode};
pub use controller::{AdapterController, Versions, CLIENT_LIBRARY_VERSION};
pub use device::{DeviceOperations, HardwareAddress, Passkey};
pub use service::ServiceControl;

/// Entry point for every adapter and device operation.
///
/// Holds no state between calls beyond its collaborators; each operation
/// re-reads whatever it needs from the system.
pub struct BluetoothManager {
    config: BluetoothConfig,
    runner: Arc<dyn CommandRunner>,
    discovery: Arc<dyn DeviceDiscovery>,
    services: Arc<dyn ServiceManager>,
    validator: Arc<dyn AddressValidator>,
}

impl BluetoothManager {
    /// Manager wired to the given runner, with hcitool discovery, systemctl
    /// service control and the standard address validator.
    pub fn new(config: BluetoothConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            discovery: Arc::new(HcitoolScanner::new(runner.clone(), config.hcitool.clone())),
            services: Arc::new(Systemctl::new(runner.clone())),
            validator: Arc::new(MacAddressValidator),
            config,
            runner,
        }
    }

    /// Manager that shells out on the local host.
    pub fn system(config: BluetoothConfig) -> Self {
        let runner = Arc::new(ShellRunner::new(config.fail_on_nonzero_exit));
        Self::new(config, runner)
    }

    pub fn with_discovery(mut self, discovery: Arc<dyn DeviceDiscovery>) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn with_service_manager(mut self, services: Arc<dyn ServiceManager>) -> Self {
        self.services = services;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn AddressValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &BluetoothConfig {
        &self.config
    }

    fn registry(&self) -> AdapterRegistry<'_> {
        AdapterRegistry::new(self.runner.as_ref(), &self.config)
    }

    fn controller(&self) -> AdapterController<'_> {
        AdapterController::new(self.runner.as_ref(), &self.config)
    }

    fn devices(&self) -> DeviceOperations<'_> {
        DeviceOperations::new(
            self.runner.as_ref(),
            self.discovery.as_ref(),
            self.validator.as_ref(),
            &self.config,
        )
    }

    fn service(&self) -> ServiceControl<'_> {
        ServiceControl::new(self.services.as_ref(), &self.config.service_name)
    }

    pub fn versions(&self) -> Result<Versions> {
        self.controller().get_versions()
    }

    pub fn list_adapters(&self) -> Result<BTreeMap<String, Adapter>> {
        self.registry().list_adapters()
    }

    pub fn set_power(&self, adapter: &str, mode: PowerMode) -> Result<bool> {
        self.controller().set_power(adapter, mode)
    }

    pub fn set_discoverable(&self, adapter: &str) -> Result<bool> {
        self.controller().set_discoverable(adapter)
    }

    pub fn set_non_discoverable(&self, adapter: &str) -> Result<bool> {
        self.controller().set_non_discoverable(adapter)
    }

    pub fn discover(&self) -> Result<Vec<BTreeMap<String, String>>> {
        self.devices().discover()
    }

    pub fn block(&self, address: &str) -> Result<()> {
        self.devices().block(address)
    }

    pub fn unblock(&self, address: &str) -> Result<()> {
        self.devices().unblock(address)
    }

    pub fn pair(&self, address: &str, passkey: &str) -> Result<Vec<String>> {
        self.devices().pair(address, passkey)
    }

    pub fn unpair(&self, address: &str) -> Result<Vec<String>> {
        self.devices().unpair(address)
    }

    pub fn start(&self) -> Result<String> {
        self.service().start()
    }

    pub fn stop(&self) -> Result<String> {
        self.service().stop()
    }
}
