/*!
 * Bluetooth Service Control
 * Start and stop pass-through
 */

use crate::error::Result;
use crate::system::ServiceManager;

/// Starts and stops the bluetooth system service. Results pass through untouched.
pub struct ServiceControl<'a> {
    services: &'a dyn ServiceManager,
    service_name: &'a str,
}

impl<'a> ServiceControl<'a> {
    pub fn new(services: &'a dyn ServiceManager, service_name: &'a str) -> Self {
        Self {
            services,
            service_name,
        }
    }

    pub fn start(&self) -> Result<String> {
        tracing::info!("Starting service {}", self.service_name);
        self.services.start(self.service_name)
    }

    pub fn stop(&self) -> Result<String> {
        tracing::info!("Stopping service {}", self.service_name);
        self.services.stop(self.service_name)
    }
}
