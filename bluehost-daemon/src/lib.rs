/*!
 * BLUEHOST Bluetooth Adapter Control
 * Drives hciconfig and the BlueZ tools, parses what they print
 * Onyx Digital Intelligence Development LLC
 */

pub mod bluetooth;
pub mod config;
pub mod error;
pub mod ipc;
pub mod system;

pub use bluetooth::BluetoothManager;
pub use error::{BluetoothError, Result};
