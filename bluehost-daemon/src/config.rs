use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub socket_path: String,
    pub bluetooth: BluetoothConfig,
}

/// Tool names and defaults used when building command lines.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BluetoothConfig {
    /// System service started and stopped by `start`/`stop`.
    pub service_name: String,
    /// Adapter that receives device-level `block`/`unblock` commands.
    pub default_adapter: String,
    pub sysfs_root: String,
    pub hciconfig: String,
    pub bluetoothctl: String,
    pub hcitool: String,
    pub pair_agent: String,
    pub device_tool: String,
    /// Turn a non-zero exit status into an error instead of a warning.
    pub fail_on_nonzero_exit: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: "/run/bluehost/bluehost.sock".to_string(),
            bluetooth: BluetoothConfig::default(),
        }
    }
}

impl Default for BluetoothConfig {
    fn default() -> Self {
        Self {
            service_name: "bluetooth".to_string(),
            default_adapter: "hci0".to_string(),
            sysfs_root: "/sys/class/bluetooth".to_string(),
            hciconfig: "hciconfig".to_string(),
            bluetoothctl: "bluetoothctl".to_string(),
            hcitool: "hcitool".to_string(),
            pair_agent: "bluez-simple-agent".to_string(),
            device_tool: "bluez-test-device".to_string(),
            fail_on_nonzero_exit: false,
        }
    }
}

impl DaemonConfig {
    pub fn load(path: &str) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(_) => {
                // Create default config if not found
                let config = Self::default();
                if let Err(e) = fs::write(path, toml::to_string_pretty(&config)?) {
                    tracing::debug!("Could not write default config to {}: {}", path, e);
                }
                Ok(config)
            }
        }
    }

    /// Like [`DaemonConfig::load`], but never touches the filesystem beyond reading.
    pub fn read(path: &str) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: DaemonConfig = toml::from_str(
            r#"
            socket_path = "/tmp/bh.sock"

            [bluetooth]
            default_adapter = "hci1"
            fail_on_nonzero_exit = true
            "#,
        )
        .unwrap();

        assert_eq!(config.socket_path, "/tmp/bh.sock");
        assert_eq!(config.bluetooth.default_adapter, "hci1");
        assert!(config.bluetooth.fail_on_nonzero_exit);
        assert_eq!(config.bluetooth.service_name, "bluetooth");
        assert_eq!(config.bluetooth.hciconfig, "hciconfig");
    }

    #[test]
    fn missing_file_writes_defaults() {
        let path = std::env::temp_dir().join(format!("bluehostd-{}.toml", uuid::Uuid::new_v4()));
        let path = path.to_string_lossy().to_string();

        let config = DaemonConfig::load(&path).unwrap();
        assert_eq!(config.socket_path, "/run/bluehost/bluehost.sock");

        let reloaded = DaemonConfig::load(&path).unwrap();
        assert_eq!(reloaded.bluetooth, config.bluetooth);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn read_missing_file_leaves_no_trace() {
        let path = std::env::temp_dir().join(format!("bluehost-{}.toml", uuid::Uuid::new_v4()));
        let path = path.to_string_lossy().to_string();

        let config = DaemonConfig::read(&path).unwrap();
        assert_eq!(config.bluetooth, BluetoothConfig::default());
        assert!(!std::path::Path::new(&path).exists());
    }
}
