/*!
 * System Service Control
 * Service lifecycle via systemctl
 */

use std::sync::Arc;

use super::runner::{shell_quote, CommandRunner};
use crate::error::Result;

/// Starts and stops a named system service.
pub trait ServiceManager: Send + Sync {
    fn start(&self, name: &str) -> Result<String>;
    fn stop(&self, name: &str) -> Result<String>;
}

pub struct Systemctl {
    runner: Arc<dyn CommandRunner>,
}

impl Systemctl {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl ServiceManager for Systemctl {
    fn start(&self, name: &str) -> Result<String> {
        self.runner.run(&format!("systemctl start {}", shell_quote(name)))
    }

    fn stop(&self, name: &str) -> Result<String> {
        self.runner.run(&format!("systemctl stop {}", shell_quote(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mocks::MockRunner;

    #[test]
    fn start_and_stop_run_systemctl() {
        let runner = Arc::new(MockRunner::new().on("systemctl stop bluetooth", "stopped\n"));
        let systemctl = Systemctl::new(Arc::clone(&runner) as Arc<dyn CommandRunner>);

        assert_eq!(systemctl.start("bluetooth").unwrap(), "");
        assert_eq!(systemctl.stop("bluetooth").unwrap(), "stopped\n");
        assert_eq!(
            runner.calls(),
            vec!["systemctl start bluetooth", "systemctl stop bluetooth"]
        );
    }

    #[test]
    fn service_name_is_quoted() {
        let runner = Arc::new(MockRunner::new());
        let systemctl = Systemctl::new(Arc::clone(&runner) as Arc<dyn CommandRunner>);

        systemctl.start("blue tooth").unwrap();
        assert_eq!(runner.calls(), vec!["systemctl start 'blue tooth'"]);
    }
}
