/*!
 * Peer Device Operations
 * Discovery, blocking and pairing against remote hardware addresses
 */

use std::collections::BTreeMap;
use std::fmt;

use tracing::info;

use super::adapter::AdapterRegistry;
use super::status;
use crate::config::BluetoothConfig;
use crate::error::{BluetoothError, Result};
use crate::system::runner::{shell_quote, CommandRunner};
use crate::system::{AddressValidator, DeviceDiscovery};

/// A peer address that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HardwareAddress(String);

impl HardwareAddress {
    pub fn parse(address: &str, validator: &dyn AddressValidator) -> Result<Self> {
        if validator.is_valid(address) {
            Ok(Self(address.to_string()))
        } else {
            Err(BluetoothError::InvalidHardwareAddress(address.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pairing passkey made of decimal digits only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passkey(String);

impl Passkey {
    pub fn parse(passkey: &str) -> Result<Self> {
        if !passkey.is_empty() && passkey.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(passkey.to_string()))
        } else {
            Err(BluetoothError::InvalidPasskey(passkey.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct DeviceOperations<'a> {
    runner: &'a dyn CommandRunner,
    discovery: &'a dyn DeviceDiscovery,
    validator: &'a dyn AddressValidator,
    registry: AdapterRegistry<'a>,
    config: &'a BluetoothConfig,
}

impl<'a> DeviceOperations<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        discovery: &'a dyn DeviceDiscovery,
        validator: &'a dyn AddressValidator,
        config: &'a BluetoothConfig,
    ) -> Self {
        Self {
            runner,
            discovery,
            validator,
            registry: AdapterRegistry::new(runner, config),
            config,
        }
    }

    /// Nearby devices as `{address: name}` records, in discovery order.
    pub fn discover(&self) -> Result<Vec<BTreeMap<String, String>>> {
        let devices = self.discovery.discover_devices(true)?;
        Ok(devices
            .into_iter()
            .map(|device| BTreeMap::from([(device.address, device.name)]))
            .collect())
    }

    pub fn block(&self, address: &str) -> Result<()> {
        let address = HardwareAddress::parse(address, self.validator)?;
        self.runner.run(&format!(
            "{} {} block {}",
            self.config.hciconfig,
            shell_quote(&self.config.default_adapter),
            shell_quote(address.as_str())
        ))?;
        info!("Blocked {}", address);
        Ok(())
    }

    pub fn unblock(&self, address: &str) -> Result<()> {
        let address = HardwareAddress::parse(address, self.validator)?;
        self.runner.run(&format!(
            "{} {} unblock {}",
            self.config.hciconfig,
            shell_quote(&self.config.default_adapter),
            shell_quote(address.as_str())
        ))?;
        info!("Unblocked {}", address);
        Ok(())
    }

    /// Pair through the BlueZ agent, feeding it the passkey on stdin.
    ///
    /// Both arguments are checked before anything runs.
    pub fn pair(&self, address: &str, passkey: &str) -> Result<Vec<String>> {
        let address = HardwareAddress::parse(address, self.validator)?;
        let passkey = Passkey::parse(passkey)?;
        let adapter = self.registry.resolve_for_peer(address.as_str())?;

        info!("Pairing {} via {}", address, adapter.name);
        let output = self.runner.run(&format!(
            "echo {} | {} {} {}",
            shell_quote(passkey.as_str()),
            self.config.pair_agent,
            shell_quote(&adapter.name),
            shell_quote(address.as_str())
        ))?;
        Ok(status::non_empty_lines(&output))
    }

    pub fn unpair(&self, address: &str) -> Result<Vec<String>> {
        let address = HardwareAddress::parse(address, self.validator)?;
        info!("Removing {}", address);
        let output = self.runner.run(&format!(
            "{} remove {}",
            self.config.device_tool,
            shell_quote(address.as_str())
        ))?;
        Ok(status::transcript(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::discovery::DiscoveredDevice;
    use crate::system::mocks::{MockDiscovery, MockRunner};
    use crate::system::MacAddressValidator;

    const GOOD: &str = "DE:AD:BE:EF:CA:FE";
    const BAD: &str = "DE:AD:BE:EF:CA:ZE";
    const HCI0: &str = "hci0:\tType: Primary\n\tBD Address: DE:AD:BE:EF:CA:FE  ACL MTU: 1021:8\n";

    struct AcceptAll;

    impl AddressValidator for AcceptAll {
        fn is_valid(&self, _address: &str) -> bool {
            true
        }
    }

    fn invalid_address<T>(result: Result<T>) -> bool {
        matches!(result, Err(BluetoothError::InvalidHardwareAddress(_)))
    }

    #[test]
    fn passkey_must_be_digits() {
        assert!(Passkey::parse("1234").is_ok());
        assert!(Passkey::parse("000000").is_ok());
        for bad in ["abcd", "", "12 34", "-1234", "１２３"] {
            assert!(
                matches!(Passkey::parse(bad), Err(BluetoothError::InvalidPasskey(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn address_is_checked_before_any_command() {
        let runner = MockRunner::new();
        let discovery = MockDiscovery::default();
        let config = BluetoothConfig::default();
        let ops = DeviceOperations::new(&runner, &discovery, &MacAddressValidator, &config);

        assert!(invalid_address(ops.block(BAD)));
        assert!(invalid_address(ops.unblock(BAD)));
        assert!(invalid_address(ops.pair(BAD, "1234")));
        assert!(invalid_address(ops.unpair(BAD)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn block_and_unblock_target_default_adapter() {
        let runner = MockRunner::new();
        let discovery = MockDiscovery::default();
        let config = BluetoothConfig::default();
        let ops = DeviceOperations::new(&runner, &discovery, &MacAddressValidator, &config);

        ops.block(GOOD).unwrap();
        ops.unblock(GOOD).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "hciconfig hci0 block DE:AD:BE:EF:CA:FE",
                "hciconfig hci0 unblock DE:AD:BE:EF:CA:FE",
            ]
        );
    }

    #[test]
    fn addresses_are_shell_quoted_whatever_the_validator() {
        let hostile = "x;reboot";
        let runner =
            MockRunner::new().on("hciconfig", "hci0:\tType: Primary\n\tBD Address: x;reboot\n");
        let discovery = MockDiscovery::default();
        let config = BluetoothConfig::default();
        let ops = DeviceOperations::new(&runner, &discovery, &AcceptAll, &config);

        ops.block(hostile).unwrap();
        ops.unblock(hostile).unwrap();
        ops.pair(hostile, "1234").unwrap();
        ops.unpair(hostile).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "hciconfig hci0 block 'x;reboot'",
                "hciconfig hci0 unblock 'x;reboot'",
                "hciconfig",
                "echo 1234 | bluez-simple-agent hci0 'x;reboot'",
                "bluez-test-device remove 'x;reboot'",
            ]
        );
    }

    #[test]
    fn pair_builds_agent_pipeline() {
        let runner = MockRunner::new().on("hciconfig", HCI0).on(
            "echo 1234 | bluez-simple-agent hci0 DE:AD:BE:EF:CA:FE",
            "Ok\n\nRelease\n",
        );
        let discovery = MockDiscovery::default();
        let config = BluetoothConfig::default();
        let ops = DeviceOperations::new(&runner, &discovery, &MacAddressValidator, &config);

        assert_eq!(ops.pair(GOOD, "1234").unwrap(), vec!["Ok", "Release"]);
    }

    #[test]
    fn pair_rejects_passkey_before_lookup() {
        let runner = MockRunner::new();
        let discovery = MockDiscovery::default();
        let config = BluetoothConfig::default();
        let ops = DeviceOperations::new(&runner, &discovery, &MacAddressValidator, &config);

        assert!(matches!(
            ops.pair(GOOD, "abcd"),
            Err(BluetoothError::InvalidPasskey(_))
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn pair_without_matching_adapter_fails() {
        let runner = MockRunner::new();
        let discovery = MockDiscovery::default();
        let config = BluetoothConfig::default();
        let ops = DeviceOperations::new(&runner, &discovery, &MacAddressValidator, &config);

        assert!(matches!(
            ops.pair(GOOD, "1234"),
            Err(BluetoothError::AdapterNotFound(_))
        ));
        assert_eq!(runner.calls(), vec!["hciconfig"]);
    }

    #[test]
    fn unpair_keeps_every_line() {
        let runner =
            MockRunner::new().on("bluez-test-device remove DE:AD:BE:EF:CA:FE", "Ok\n\nDone");
        let discovery = MockDiscovery::default();
        let config = BluetoothConfig::default();
        let ops = DeviceOperations::new(&runner, &discovery, &MacAddressValidator, &config);

        assert_eq!(ops.unpair(GOOD).unwrap(), vec!["Ok", "", "Done"]);
    }

    #[test]
    fn discover_keeps_order_and_duplicates() {
        let runner = MockRunner::new();
        let discovery = MockDiscovery::new(vec![
            DiscoveredDevice::new("d", "e"),
            DiscoveredDevice::new("a", "b"),
            DiscoveredDevice::new("d", "e"),
        ]);
        let config = BluetoothConfig::default();
        let ops = DeviceOperations::new(&runner, &discovery, &MacAddressValidator, &config);

        let found = ops.discover().unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0]["d"], "e");
        assert_eq!(found[1]["a"], "b");
        assert_eq!(found[2]["d"], "e");
        assert_eq!(discovery.lookups(), vec![true]);
    }
}
