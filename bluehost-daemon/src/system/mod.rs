pub mod discovery;
pub mod runner;
pub mod services;
pub mod validate;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

pub use discovery::{DeviceDiscovery, DiscoveredDevice, HcitoolScanner};
pub use runner::{CommandRunner, ShellRunner};
pub use services::{ServiceManager, Systemctl};
pub use validate::{AddressValidator, MacAddressValidator};
