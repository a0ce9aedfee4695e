/*!
 * Test Collaborators
 * In-memory runner, discovery and service manager
 *
 * Enabled under `cfg(test)` and by the `test-mocks` feature so integration
 * tests can drive `BluetoothManager` without touching the host.
 */

use std::collections::HashMap;
use std::sync::Mutex;

use super::discovery::{DeviceDiscovery, DiscoveredDevice};
use super::runner::CommandRunner;
use super::services::ServiceManager;
use crate::error::Result;

/// Answers command lines from a fixed table and records every call.
///
/// Lines without a scripted answer produce empty output.
#[derive(Default)]
pub struct MockRunner {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the stdout for an exact command line.
    pub fn on(mut self, command_line: &str, stdout: &str) -> Self {
        self.responses
            .insert(command_line.to_string(), stdout.to_string());
        self
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command_line: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command_line.to_string());
        }
        Ok(self
            .responses
            .get(command_line)
            .cloned()
            .unwrap_or_default())
    }
}

/// Returns a fixed device list and remembers the `lookup_names` flag it saw.
#[derive(Default)]
pub struct MockDiscovery {
    pub devices: Vec<DiscoveredDevice>,
    lookups: Mutex<Vec<bool>>,
}

impl MockDiscovery {
    pub fn new(devices: Vec<DiscoveredDevice>) -> Self {
        Self {
            devices,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<bool> {
        self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl DeviceDiscovery for MockDiscovery {
    fn discover_devices(&self, lookup_names: bool) -> Result<Vec<DiscoveredDevice>> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(lookup_names);
        }
        Ok(self.devices.clone())
    }
}

/// Echoes a fixed result for start/stop and records `(action, service)` pairs.
pub struct MockServiceManager {
    pub result: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockServiceManager {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, action: &str, name: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((action.to_string(), name.to_string()));
        }
    }
}

impl ServiceManager for MockServiceManager {
    fn start(&self, name: &str) -> Result<String> {
        self.record("start", name);
        Ok(self.result.clone())
    }

    fn stop(&self, name: &str) -> Result<String> {
        self.record("stop", name);
        Ok(self.result.clone())
    }
}
