/*!
 * Bluetooth Error Types
 * Failures of adapter and device operations
 */

use thiserror::Error;

/// Failures raised by the bluetooth control surface.
#[derive(Error, Debug)]
pub enum BluetoothError {
    /// Adapter name is absent from the current registry snapshot.
    #[error("Bluetooth adapter not found: {0}")]
    AdapterNotFound(String),

    /// Address does not have the six-octet `XX:XX:XX:XX:XX:XX` shape.
    #[error("Invalid hardware address: {0}")]
    InvalidHardwareAddress(String),

    /// Pairing passkey contains something other than decimal digits.
    #[error("Pairing requires a numerical passkey, got: {0:?}")]
    InvalidPasskey(String),

    /// Power mode is neither `on` nor `off`.
    #[error("Invalid power mode: {0:?} (expected \"on\" or \"off\")")]
    InvalidPowerMode(String),

    /// External command exited unsuccessfully.
    #[error("Command `{command}` failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// I/O error while spawning or talking to a process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BluetoothError {
    /// Stable identifier used in IPC error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AdapterNotFound(_) => "AdapterNotFound",
            Self::InvalidHardwareAddress(_) => "InvalidHardwareAddress",
            Self::InvalidPasskey(_) => "InvalidPasskey",
            Self::InvalidPowerMode(_) => "InvalidPowerMode",
            Self::CommandFailed { .. } => "CommandFailed",
            Self::Io(_) => "Io",
        }
    }
}

/// Convenience Result type for bluetooth operations.
pub type Result<T> = std::result::Result<T, BluetoothError>;
